//! Update messages carried from the game feed to the multiplexer

/// Number of segment units on the board
pub const UNIT_COUNT: usize = 3;

/// A dual-digit segment unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unit {
    Home,
    Away,
    Inning,
}

impl Unit {
    /// All units in index order
    pub const ALL: [Unit; UNIT_COUNT] = [Unit::Home, Unit::Away, Unit::Inning];

    /// Array index of this unit
    pub const fn index(self) -> usize {
        match self {
            Unit::Home => 0,
            Unit::Away => 1,
            Unit::Inning => 2,
        }
    }
}

/// Half of the current inning
///
/// The home unit's indicator marks the top half, the away unit's the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InningHalf {
    Top,
    Bottom,
    /// Middle/end of inning, or no game in progress
    Other,
}

impl InningHalf {
    /// Indicator state for (home, away)
    pub const fn indicators(self) -> (bool, bool) {
        match self {
            InningHalf::Top => (true, false),
            InningHalf::Bottom => (false, true),
            InningHalf::Other => (false, false),
        }
    }
}

/// A single field change for the multiplexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateMessage {
    HomeScore(u8),
    AwayScore(u8),
    Inning(u8),
    InningHalf(InningHalf),
    /// Blank every unit and stop multiplexing
    DisplaysOff,
}
