//! Scoreboard Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the scoreboard drivers are written
//! against. Chip-specific crates implement them; host tests implement them
//! with recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  scoreboard-drivers / firmware          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  scoreboard-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ scoreboard-hal-   │
//!           │     rp2040        │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - digit-enable lines
//! - [`i2c::I2cBus`] - port expander writes
//! - [`pwm::PwmOutput`] - backlight duty cycle

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod pwm;

pub use gpio::OutputPin;
pub use i2c::I2cBus;
pub use pwm::PwmOutput;
