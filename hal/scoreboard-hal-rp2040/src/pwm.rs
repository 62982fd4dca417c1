//! Backlight PWM on channel A of a PWM slice
//!
//! The counter wraps at `top`, chosen from the system clock so the slice
//! runs at the configured frequency with the default divider of 1.
//! Duty percent maps linearly onto the compare value.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use scoreboard_hal::pwm::{compare_for_percent, MAX_DUTY_PERCENT};
use scoreboard_hal::PwmOutput;

/// PWM frequency cannot be produced without a divider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmSetupError {
    /// Zero frequency requested
    ZeroFrequency,
    /// Frequency too low for a 16-bit counter at the system clock
    FrequencyTooLow(u32),
    /// Frequency above the system clock
    FrequencyTooHigh(u32),
}

/// Counter wrap value for `frequency_hz` at `clock_hz`
fn top_for(clock_hz: u32, frequency_hz: u32) -> Result<u16, PwmSetupError> {
    if frequency_hz == 0 {
        return Err(PwmSetupError::ZeroFrequency);
    }
    let period = clock_hz / frequency_hz;
    if period == 0 {
        return Err(PwmSetupError::FrequencyTooHigh(frequency_hz));
    }
    u16::try_from(period - 1).map_err(|_| PwmSetupError::FrequencyTooLow(frequency_hz))
}

pub struct RpPwm<'d> {
    pwm: Pwm<'d>,
    config: Config,
    duty: u8,
}

impl<'d> RpPwm<'d> {
    /// Take over `pwm` and start it at 0 % duty
    pub fn new(mut pwm: Pwm<'d>, frequency_hz: u32) -> Result<Self, PwmSetupError> {
        let mut config = Config::default();
        config.top = top_for(clk_sys_freq(), frequency_hz)?;
        config.compare_a = 0;
        pwm.set_config(&config);
        Ok(Self {
            pwm,
            config,
            duty: 0,
        })
    }
}

impl PwmOutput for RpPwm<'_> {
    fn set_duty_percent(&mut self, percent: u8) {
        let percent = percent.min(MAX_DUTY_PERCENT);
        self.config.compare_a = compare_for_percent(self.config.top, percent);
        self.pwm.set_config(&self.config);
        self.duty = percent;
    }

    fn duty_percent(&self) -> u8 {
        self.duty
    }
}
