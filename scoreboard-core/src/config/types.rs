//! Scoreboard configuration types

use crate::update::{Unit, UNIT_COUNT};

/// Lowest MCP23008 address (A2..A0 = 000)
pub const MCP23008_ADDRESS_MIN: u8 = 0x20;

/// Highest MCP23008 address (A2..A0 = 111)
pub const MCP23008_ADDRESS_MAX: u8 = 0x27;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Expander address outside 0x20-0x27
    InvalidAddress(u8),
    /// Two units share an expander address
    DuplicateAddress(u8),
    /// Multiplex tick of zero
    ZeroTick,
    /// Dwell shorter than one tick
    DwellShorterThanTick,
    /// Ramp resolution of zero
    ZeroResolution,
    /// Duty above 100 %
    InvalidDuty(u8),
    /// PWM frequency or baud rate of zero
    ZeroFrequency,
}

/// Segment unit wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentConfig {
    pub home_address: u8,
    pub away_address: u8,
    pub inning_address: u8,
    /// Digit-enable lines light their digit when driven low
    pub enable_active_low: bool,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            home_address: 0x20,
            away_address: 0x21,
            inning_address: 0x22,
            enable_active_low: false,
        }
    }
}

impl SegmentConfig {
    pub fn address(&self, unit: Unit) -> u8 {
        match unit {
            Unit::Home => self.home_address,
            Unit::Away => self.away_address,
            Unit::Inning => self.inning_address,
        }
    }

    /// Addresses in unit index order
    pub fn addresses(&self) -> [u8; UNIT_COUNT] {
        Unit::ALL.map(|unit| self.address(unit))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let addresses = self.addresses();
        for (i, &address) in addresses.iter().enumerate() {
            if !(MCP23008_ADDRESS_MIN..=MCP23008_ADDRESS_MAX).contains(&address) {
                return Err(ConfigError::InvalidAddress(address));
            }
            if addresses[..i].contains(&address) {
                return Err(ConfigError::DuplicateAddress(address));
            }
        }
        Ok(())
    }
}

/// Multiplex loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MultiplexTiming {
    /// Loop period; the update queue is checked every tick
    pub tick_us: u32,
    /// How long one digit position stays lit in double mode
    pub dwell_us: u32,
    /// Most update messages applied in one tick
    pub batch_limit: usize,
}

impl Default for MultiplexTiming {
    fn default() -> Self {
        Self {
            tick_us: 1_000,
            dwell_us: 5_000,
            batch_limit: 8,
        }
    }
}

impl MultiplexTiming {
    /// Dwell expressed in ticks (at least one)
    pub fn dwell_ticks(&self) -> u32 {
        (self.dwell_us / self.tick_us.max(1)).max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_us == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.dwell_us < self.tick_us {
            return Err(ConfigError::DwellShorterThanTick);
        }
        Ok(())
    }
}

/// Backlight PWM ramp settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampConfig {
    /// Ramp loop period
    pub tick_ms: u32,
    /// Duty change per tick, in percent
    pub resolution: u8,
    /// Duty written at start-up
    pub initial_duty: u8,
    /// PWM carrier frequency
    pub frequency_hz: u32,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            resolution: 1,
            initial_duty: 0,
            frequency_hz: 2_000,
        }
    }
}

impl RampConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if self.initial_duty > 100 {
            return Err(ConfigError::InvalidDuty(self.initial_duty));
        }
        if self.frequency_hz == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        Ok(())
    }
}

/// Serial link to the game feed host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    pub baud: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { baud: 115_200 }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScoreboardConfig {
    pub segments: SegmentConfig,
    pub multiplex: MultiplexTiming,
    pub backlight: RampConfig,
    pub link: LinkConfig,
}

impl ScoreboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.segments.validate()?;
        self.multiplex.validate()?;
        self.backlight.validate()?;
        if self.link.baud == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        Ok(())
    }
}
