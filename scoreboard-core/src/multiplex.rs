//! Multiplex sequencing
//!
//! The three segment units share two digit-enable lines, so only one digit
//! position can be lit at a time. When no unit shows a tens digit the ones
//! position stays lit permanently; otherwise the positions alternate every
//! dwell period, fast enough to look steady.
//!
//! [`Multiplexer`] is pure: it applies update batches and, once per tick,
//! tells the hardware layer what to write via [`Step`]. It never touches a
//! bus, so every timing and ordering rule is testable on the host.

use crate::config::MultiplexTiming;
use crate::segment::{DigitPosition, DisplayMode, SegmentDisplayState};
use crate::update::{Unit, UpdateMessage, UNIT_COUNT};

/// Cached state of every unit on the board
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scoreboard {
    units: [SegmentDisplayState; UNIT_COUNT],
}

impl Scoreboard {
    pub const fn new() -> Self {
        Self {
            units: [SegmentDisplayState::new(); UNIT_COUNT],
        }
    }

    pub fn unit(&self, unit: Unit) -> &SegmentDisplayState {
        &self.units[unit.index()]
    }

    pub fn unit_mut(&mut self, unit: Unit) -> &mut SegmentDisplayState {
        &mut self.units[unit.index()]
    }

    pub fn units(&self) -> &[SegmentDisplayState; UNIT_COUNT] {
        &self.units
    }

    /// Apply one message. Returns true if it was `DisplaysOff`.
    pub fn apply(&mut self, message: UpdateMessage) -> bool {
        match message {
            UpdateMessage::HomeScore(n) => self.unit_mut(Unit::Home).set_number(Some(n)),
            UpdateMessage::AwayScore(n) => self.unit_mut(Unit::Away).set_number(Some(n)),
            UpdateMessage::Inning(n) => self.unit_mut(Unit::Inning).set_number(Some(n)),
            UpdateMessage::InningHalf(half) => {
                let (home, away) = half.indicators();
                self.unit_mut(Unit::Home).set_extra_indicator(home);
                self.unit_mut(Unit::Away).set_extra_indicator(away);
            }
            UpdateMessage::DisplaysOff => {
                self.turn_off_all();
                return true;
            }
        }
        false
    }

    pub fn turn_off_all(&mut self) {
        for unit in &mut self.units {
            unit.turn_off();
        }
    }

    /// Single iff no unit shows a tens digit
    pub fn mode(&self) -> DisplayMode {
        if self.units.iter().any(SegmentDisplayState::needs_double) {
            DisplayMode::Double
        } else {
            DisplayMode::Single
        }
    }
}

/// Multiplexer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MultiplexState {
    /// Displays off, nothing lit
    Idle,
    /// Ones position lit permanently
    SingleDigitShow,
    /// Positions alternate every dwell period
    DoubleDigitBlink,
}

/// What the hardware layer must do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Nothing to write
    Hold,
    /// Write the blank pattern to every unit and release both enable lines
    Off,
    /// Assert the right line only and write every unit's ones digit
    Refresh,
    /// Blank every unit, switch the enable lines to `position`, then write
    /// that position of every unit
    Phase(DigitPosition),
}

/// Result of applying one batch of messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatchOutcome {
    /// Number of messages applied
    pub applied: usize,
    /// The batch contained `DisplaysOff`
    pub turned_off: bool,
}

/// Tick-driven multiplex sequencer
#[derive(Debug, Clone)]
pub struct Multiplexer {
    board: Scoreboard,
    state: MultiplexState,
    phase: DigitPosition,
    ticks_in_phase: u32,
    dwell_ticks: u32,
    /// A batch changed what is shown; render from the start of the cycle
    restart: bool,
    /// A write failed; render the current state again
    redraw: bool,
}

impl Multiplexer {
    /// Start idle with every unit blank
    pub fn new(timing: &MultiplexTiming) -> Self {
        Self {
            board: Scoreboard::new(),
            state: MultiplexState::Idle,
            phase: DigitPosition::First,
            ticks_in_phase: 0,
            dwell_ticks: timing.dwell_ticks(),
            restart: false,
            redraw: false,
        }
    }

    pub fn board(&self) -> &Scoreboard {
        &self.board
    }

    pub fn state(&self) -> MultiplexState {
        self.state
    }

    pub fn mode(&self) -> DisplayMode {
        self.board.mode()
    }

    /// Position currently lit in double mode
    pub fn phase(&self) -> DigitPosition {
        self.phase
    }

    /// Apply every message of a batch, then pick the next state
    ///
    /// Nothing is rendered in between, so a batch is never partially shown.
    /// A batch containing `DisplaysOff` always ends idle.
    pub fn apply_batch<I>(&mut self, batch: I) -> BatchOutcome
    where
        I: IntoIterator<Item = UpdateMessage>,
    {
        let mut outcome = BatchOutcome::default();
        for message in batch {
            outcome.applied += 1;
            if self.board.apply(message) {
                outcome.turned_off = true;
            }
        }

        if outcome.applied == 0 {
            return outcome;
        }

        let next = if outcome.turned_off {
            MultiplexState::Idle
        } else {
            match self.board.mode() {
                DisplayMode::Single => MultiplexState::SingleDigitShow,
                DisplayMode::Double => MultiplexState::DoubleDigitBlink,
            }
        };
        self.enter(next);
        outcome
    }

    /// Re-render on the next tick after a failed write
    ///
    /// Double mode re-renders every phase anyway and ignores this.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Advance one tick
    pub fn next_step(&mut self) -> Step {
        let restart = core::mem::take(&mut self.restart);
        let redraw = core::mem::take(&mut self.redraw);

        match self.state {
            MultiplexState::Idle if restart || redraw => Step::Off,
            MultiplexState::SingleDigitShow if restart || redraw => Step::Refresh,
            MultiplexState::Idle | MultiplexState::SingleDigitShow => Step::Hold,
            MultiplexState::DoubleDigitBlink => {
                if restart {
                    self.phase = DigitPosition::First;
                    self.ticks_in_phase = 0;
                    return Step::Phase(DigitPosition::First);
                }
                self.ticks_in_phase += 1;
                if self.ticks_in_phase >= self.dwell_ticks {
                    self.ticks_in_phase = 0;
                    self.phase = self.phase.other();
                    Step::Phase(self.phase)
                } else {
                    Step::Hold
                }
            }
        }
    }

    fn enter(&mut self, state: MultiplexState) {
        self.state = state;
        self.phase = DigitPosition::First;
        self.ticks_in_phase = 0;
        self.restart = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digit::Digit;
    use crate::update::InningHalf;
    use proptest::prelude::*;

    fn timing(dwell_ticks: u32) -> MultiplexTiming {
        MultiplexTiming {
            tick_us: 1_000,
            dwell_us: 1_000 * dwell_ticks,
            ..MultiplexTiming::default()
        }
    }

    #[test]
    fn test_starts_idle_and_holds() {
        let mut mux = Multiplexer::new(&timing(5));
        assert_eq!(mux.state(), MultiplexState::Idle);
        assert_eq!(mux.next_step(), Step::Hold);
    }

    #[test]
    fn test_single_digit_scores_stay_single() {
        let mut mux = Multiplexer::new(&timing(5));
        mux.apply_batch([UpdateMessage::HomeScore(3), UpdateMessage::Inning(4)]);
        assert_eq!(mux.mode(), DisplayMode::Single);
        assert_eq!(mux.state(), MultiplexState::SingleDigitShow);
        assert_eq!(mux.next_step(), Step::Refresh);
        for _ in 0..20 {
            assert_eq!(mux.next_step(), Step::Hold);
        }
    }

    #[test]
    fn test_single_mode_refreshes_on_change() {
        let mut mux = Multiplexer::new(&timing(5));
        mux.apply_batch([UpdateMessage::HomeScore(3)]);
        assert_eq!(mux.next_step(), Step::Refresh);
        mux.apply_batch([UpdateMessage::HomeScore(4)]);
        assert_eq!(mux.next_step(), Step::Refresh);
        assert_eq!(mux.next_step(), Step::Hold);
    }

    #[test]
    fn test_double_mode_alternates_each_dwell() {
        let mut mux = Multiplexer::new(&timing(3));
        mux.apply_batch([
            UpdateMessage::HomeScore(7),
            UpdateMessage::AwayScore(7),
            UpdateMessage::Inning(23),
        ]);
        assert_eq!(mux.mode(), DisplayMode::Double);
        assert_eq!(mux.state(), MultiplexState::DoubleDigitBlink);

        assert_eq!(mux.next_step(), Step::Phase(DigitPosition::First));
        assert_eq!(mux.next_step(), Step::Hold);
        assert_eq!(mux.next_step(), Step::Hold);
        assert_eq!(mux.next_step(), Step::Phase(DigitPosition::Second));
        assert_eq!(mux.next_step(), Step::Hold);
        assert_eq!(mux.next_step(), Step::Hold);
        assert_eq!(mux.next_step(), Step::Phase(DigitPosition::First));
    }

    #[test]
    fn test_batch_restarts_cycle() {
        let mut mux = Multiplexer::new(&timing(2));
        mux.apply_batch([UpdateMessage::Inning(12)]);
        assert_eq!(mux.next_step(), Step::Phase(DigitPosition::First));
        assert_eq!(mux.next_step(), Step::Hold);
        assert_eq!(mux.next_step(), Step::Phase(DigitPosition::Second));
        mux.apply_batch([UpdateMessage::HomeScore(1)]);
        assert_eq!(mux.next_step(), Step::Phase(DigitPosition::First));
    }

    #[test]
    fn test_double_to_single_when_tens_disappear() {
        let mut mux = Multiplexer::new(&timing(2));
        mux.apply_batch([UpdateMessage::Inning(10)]);
        assert_eq!(mux.state(), MultiplexState::DoubleDigitBlink);
        mux.apply_batch([UpdateMessage::Inning(9)]);
        assert_eq!(mux.state(), MultiplexState::SingleDigitShow);
        assert_eq!(mux.next_step(), Step::Refresh);
    }

    #[test]
    fn test_inning_half_indicators() {
        let mut mux = Multiplexer::new(&timing(5));
        mux.apply_batch([UpdateMessage::InningHalf(InningHalf::Top)]);
        assert!(mux.board().unit(Unit::Home).extra_indicator());
        assert!(!mux.board().unit(Unit::Away).extra_indicator());

        mux.apply_batch([UpdateMessage::InningHalf(InningHalf::Bottom)]);
        assert!(!mux.board().unit(Unit::Home).extra_indicator());
        assert!(mux.board().unit(Unit::Away).extra_indicator());

        mux.apply_batch([UpdateMessage::InningHalf(InningHalf::Other)]);
        assert!(!mux.board().unit(Unit::Home).extra_indicator());
        assert!(!mux.board().unit(Unit::Away).extra_indicator());
        assert!(!mux.board().unit(Unit::Inning).extra_indicator());
    }

    #[test]
    fn test_displays_off_scenario() {
        let mut mux = Multiplexer::new(&timing(5));
        mux.apply_batch([UpdateMessage::InningHalf(InningHalf::Top)]);
        mux.apply_batch([UpdateMessage::HomeScore(3)]);
        let outcome = mux.apply_batch([UpdateMessage::DisplaysOff]);

        assert!(outcome.turned_off);
        assert_eq!(mux.state(), MultiplexState::Idle);
        assert_eq!(mux.next_step(), Step::Off);
        for unit in mux.board().units() {
            assert!(unit.digit_1().is_blank());
            assert!(unit.digit_2().is_blank());
            assert!(!unit.extra_indicator());
        }
        assert_eq!(mux.next_step(), Step::Hold);
    }

    #[test]
    fn test_displays_off_wins_over_rest_of_batch() {
        let mut mux = Multiplexer::new(&timing(5));
        mux.apply_batch([
            UpdateMessage::HomeScore(12),
            UpdateMessage::DisplaysOff,
            UpdateMessage::AwayScore(4),
        ]);
        assert_eq!(mux.state(), MultiplexState::Idle);
        assert_eq!(mux.next_step(), Step::Off);
    }

    #[test]
    fn test_batch_is_atomic() {
        let mut mux = Multiplexer::new(&timing(5));
        mux.apply_batch([UpdateMessage::HomeScore(1), UpdateMessage::AwayScore(2)]);
        // Both values are visible on the first render after the batch
        assert_eq!(mux.next_step(), Step::Refresh);
        assert_eq!(mux.board().unit(Unit::Home).digit_2(), Digit::new(1).unwrap());
        assert_eq!(mux.board().unit(Unit::Away).digit_2(), Digit::new(2).unwrap());
    }

    #[test]
    fn test_redraw_after_failure() {
        let mut mux = Multiplexer::new(&timing(5));
        mux.apply_batch([UpdateMessage::HomeScore(1)]);
        assert_eq!(mux.next_step(), Step::Refresh);
        mux.request_redraw();
        assert_eq!(mux.next_step(), Step::Refresh);
        assert_eq!(mux.next_step(), Step::Hold);
    }

    #[test]
    fn test_empty_batch_changes_nothing() {
        let mut mux = Multiplexer::new(&timing(5));
        let outcome = mux.apply_batch(core::iter::empty());
        assert_eq!(outcome, BatchOutcome::default());
        assert_eq!(mux.state(), MultiplexState::Idle);
        assert_eq!(mux.next_step(), Step::Hold);
    }

    fn message() -> impl Strategy<Value = UpdateMessage> {
        prop_oneof![
            (0u8..=120).prop_map(UpdateMessage::HomeScore),
            (0u8..=120).prop_map(UpdateMessage::AwayScore),
            (0u8..=20).prop_map(UpdateMessage::Inning),
            prop_oneof![
                Just(InningHalf::Top),
                Just(InningHalf::Bottom),
                Just(InningHalf::Other)
            ]
            .prop_map(UpdateMessage::InningHalf),
            Just(UpdateMessage::DisplaysOff),
        ]
    }

    proptest! {
        #[test]
        fn prop_mode_matches_tens_digits(
            batches in proptest::collection::vec(proptest::collection::vec(message(), 0..4), 1..10)
        ) {
            let mut mux = Multiplexer::new(&timing(4));
            for batch in batches {
                mux.apply_batch(batch);
                let any_tens = mux.board().units().iter().any(|u| !u.digit_1().is_blank());
                let expected = if any_tens { DisplayMode::Double } else { DisplayMode::Single };
                prop_assert_eq!(mux.mode(), expected);
                if mux.state() != MultiplexState::Idle {
                    let blink = mux.state() == MultiplexState::DoubleDigitBlink;
                    prop_assert_eq!(blink, any_tens);
                }
            }
        }

        #[test]
        fn prop_reapplying_message_is_idempotent(msg in message()) {
            let mut board = Scoreboard::new();
            board.apply(msg);
            let once = board.clone();
            board.apply(msg);
            prop_assert_eq!(board, once);
        }
    }
}
