//! Backlight PWM controller
//!
//! Drives one PWM channel from a [`BrightnessRamp`]. Called once per tick:
//! a pending command takes the tick, otherwise the ramp takes one step.
//! At most one duty write happens per tick.

use embassy_sync::blocking_mutex::raw::RawMutex;

use scoreboard_core::brightness::BrightnessRamp;
use scoreboard_core::config::RampConfig;
use scoreboard_core::queue::BrightnessQueue;
use scoreboard_hal::PwmOutput;

/// Backlight controller for one PWM channel
pub struct BacklightController<P: PwmOutput> {
    pwm: P,
    ramp: BrightnessRamp,
}

impl<P: PwmOutput> BacklightController<P> {
    /// Create the controller and write the initial duty
    pub fn new(mut pwm: P, config: &RampConfig) -> Self {
        let ramp = BrightnessRamp::new(config);
        pwm.set_duty_percent(ramp.current());
        Self { pwm, ramp }
    }

    pub fn ramp(&self) -> &BrightnessRamp {
        &self.ramp
    }

    /// Run one tick. Returns the duty written, if any.
    pub fn tick<M: RawMutex, const N: usize>(
        &mut self,
        queue: &BrightnessQueue<M, N>,
    ) -> Option<u8> {
        let duty = match queue.try_pop() {
            Some(command) => Some(self.ramp.apply(command)),
            None => self.ramp.step(),
        };
        if let Some(duty) = duty {
            self.pwm.set_duty_percent(duty);
        }
        duty
    }

    /// Write the final duty and hand back the PWM channel
    pub fn exit(mut self) -> P {
        self.pwm.set_duty_percent(self.ramp.current());
        self.pwm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPwm;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use scoreboard_core::queue::BoundedQueue;

    fn controller(initial: u8) -> BacklightController<MockPwm> {
        BacklightController::new(
            MockPwm::new(),
            &RampConfig {
                initial_duty: initial,
                ..RampConfig::default()
            },
        )
    }

    #[test]
    fn test_initial_duty_written() {
        let controller = controller(30);
        assert_eq!(&controller.pwm.writes[..], &[30]);
    }

    #[test]
    fn test_snap_on_next_tick() {
        let mut controller = controller(0);
        let queue: BrightnessQueue<NoopRawMutex> = BoundedQueue::new();
        queue.command(50, 50, true).unwrap();

        assert_eq!(controller.tick(&queue), Some(50));
        assert_eq!(controller.pwm.duty_percent(), 50);
        assert_eq!(controller.tick(&queue), None);
    }

    #[test]
    fn test_command_takes_the_tick() {
        let mut controller = controller(0);
        let queue: BrightnessQueue<NoopRawMutex> = BoundedQueue::new();
        queue.command(10, 10, false).unwrap();

        // Command applied, no step yet
        assert_eq!(controller.tick(&queue), Some(0));
        assert_eq!(controller.tick(&queue), Some(1));
        assert_eq!(controller.tick(&queue), Some(2));
    }

    #[test]
    fn test_ramp_up_then_hold() {
        let mut controller = controller(0);
        let queue: BrightnessQueue<NoopRawMutex> = BoundedQueue::new();
        queue.command(100, 100, false).unwrap();
        controller.tick(&queue);

        for expected in 1..=100 {
            assert_eq!(controller.tick(&queue), Some(expected));
        }
        let writes = controller.pwm.writes.len();
        for _ in 0..5 {
            assert_eq!(controller.tick(&queue), None);
        }
        assert_eq!(controller.pwm.writes.len(), writes);
    }

    #[test]
    fn test_exit_writes_final_duty() {
        let mut controller = controller(0);
        let queue: BrightnessQueue<NoopRawMutex> = BoundedQueue::new();
        queue.command(0, 100, false).unwrap();
        for _ in 0..11 {
            controller.tick(&queue);
        }
        let pwm = controller.exit();
        assert_eq!(pwm.writes.last(), Some(&10));
        // The final duty is written even though it did not change
        assert_eq!(pwm.writes[pwm.writes.len() - 2], 10);
    }
}
