//! Seven-segment unit behind an MCP23008 I2C port expander
//!
//! The expander's eight outputs drive segments a-g and the unit's extra
//! indicator LED. Every segment update is one write of the `GPIO` register;
//! nothing is read back and nothing is retried here. The multiplex
//! controller decides what to do with a failed write.

use scoreboard_core::config::{MCP23008_ADDRESS_MAX, MCP23008_ADDRESS_MIN};
use scoreboard_core::digit::BLANK_PATTERN;
use scoreboard_core::segment::{DigitPosition, DisplayMode, SegmentDisplayState};
use scoreboard_hal::I2cBus;

/// I/O direction register (0 = output)
pub const REG_IODIR: u8 = 0x00;

/// Port register
pub const REG_GPIO: u8 = 0x09;

/// IODIR value configuring every pin as an output
const ALL_OUTPUTS: u8 = 0x00;

/// A single write to a segment unit failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusWriteError<E> {
    /// Expander that did not acknowledge
    pub address: u8,
    pub source: E,
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for BusWriteError<E> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "BusWriteError(address={=u8:#x})", self.address)
    }
}

/// Segment unit driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentDriver {
    address: u8,
}

impl SegmentDriver {
    /// Create a driver for the expander at `address` (0x20-0x27)
    ///
    /// Returns the address back if it is out of range.
    pub fn new(address: u8) -> Result<Self, u8> {
        if (MCP23008_ADDRESS_MIN..=MCP23008_ADDRESS_MAX).contains(&address) {
            Ok(Self { address })
        } else {
            Err(address)
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Configure every expander pin as an output and blank the unit
    pub fn init<B: I2cBus>(&self, bus: &mut B) -> Result<(), BusWriteError<B::Error>> {
        self.write_register(bus, REG_IODIR, ALL_OUTPUTS)?;
        self.write_pattern(bus, BLANK_PATTERN)
    }

    /// Write one digit position of `state`
    pub fn write_digit<B: I2cBus>(
        &self,
        bus: &mut B,
        state: &SegmentDisplayState,
        position: DigitPosition,
        mode: DisplayMode,
    ) -> Result<(), BusWriteError<B::Error>> {
        self.write_pattern(bus, state.pattern(position, mode))
    }

    /// Unlight the digit, keeping the indicator as `state` has it
    pub fn write_blank<B: I2cBus>(
        &self,
        bus: &mut B,
        state: &SegmentDisplayState,
    ) -> Result<(), BusWriteError<B::Error>> {
        self.write_pattern(bus, state.blank_pattern())
    }

    /// Unlight everything, indicator included
    pub fn turn_off<B: I2cBus>(&self, bus: &mut B) -> Result<(), BusWriteError<B::Error>> {
        self.write_pattern(bus, BLANK_PATTERN)
    }

    /// Write a raw segment pattern
    pub fn write_pattern<B: I2cBus>(
        &self,
        bus: &mut B,
        pattern: u8,
    ) -> Result<(), BusWriteError<B::Error>> {
        self.write_register(bus, REG_GPIO, pattern)
    }

    fn write_register<B: I2cBus>(
        &self,
        bus: &mut B,
        register: u8,
        value: u8,
    ) -> Result<(), BusWriteError<B::Error>> {
        bus.write_register(self.address, register, value)
            .map_err(|source| BusWriteError {
                address: self.address,
                source,
            })
    }
}
