//! Hardware driver implementations
//!
//! Drivers are generic over the `scoreboard-hal` traits and pair the pure
//! state machines of `scoreboard-core` with the hardware writes they call for:
//!
//! - MCP23008 segment units
//! - Multiplex controller (segment units + digit-enable lines)
//! - Backlight PWM controller

#![no_std]
#![deny(unsafe_code)]

pub mod backlight;
pub mod multiplex;
pub mod segment;

#[cfg(test)]
mod testing;

pub use backlight::BacklightController;
pub use multiplex::{MultiplexController, MultiplexError, MultiplexStats};
pub use segment::{BusWriteError, SegmentDriver};
