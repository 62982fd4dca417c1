//! PWM output abstractions

/// Highest duty cycle, in percent
pub const MAX_DUTY_PERCENT: u8 = 100;

/// A single PWM channel driven by duty cycle percentage
pub trait PwmOutput {
    /// Set the duty cycle (0-100 %). Values above 100 are clamped.
    fn set_duty_percent(&mut self, percent: u8);

    /// Last duty cycle written, in percent
    fn duty_percent(&self) -> u8;
}

/// Compare value for `percent` of a counter that wraps at `top`
///
/// The counter runs `top + 1` steps per period. With `top == u16::MAX` the
/// full period does not fit in a compare register, so 100 % saturates one
/// step short of it.
pub fn compare_for_percent(top: u16, percent: u8) -> u16 {
    let percent = percent.min(MAX_DUTY_PERCENT) as u32;
    let compare = (top as u32 + 1) * percent / MAX_DUTY_PERCENT as u32;
    u16::try_from(compare).unwrap_or(u16::MAX)
}
