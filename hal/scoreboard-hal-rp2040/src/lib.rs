//! RP2040-specific HAL for the scoreboard firmware
//!
//! Implements the shared `scoreboard-hal` traits on top of embassy-rp:
//!
//! - Digit-enable lines on plain GPIO outputs
//! - The segment bus on any blocking `embedded-hal` I2C master
//! - Backlights on PWM slice channel A

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod pwm;

pub use gpio::RpOutput;
pub use i2c::RpI2c;
pub use pwm::{PwmSetupError, RpPwm};
