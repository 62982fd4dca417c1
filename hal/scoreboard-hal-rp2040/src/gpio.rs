//! GPIO output wrapper

use embassy_rp::gpio::Output;
use scoreboard_hal::OutputPin;

/// Push-pull output driving one digit-enable line
pub struct RpOutput<'d>(Output<'d>);

impl<'d> RpOutput<'d> {
    pub fn new(output: Output<'d>) -> Self {
        Self(output)
    }

    /// Hand back the embassy pin
    pub fn into_inner(self) -> Output<'d> {
        self.0
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}
