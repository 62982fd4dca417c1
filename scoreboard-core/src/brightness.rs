//! Backlight brightness ramp
//!
//! A ramp moves the PWM duty cycle one resolution step per tick toward the
//! bound matching its direction. With `lower == upper` it is a one-shot fade
//! that stops at the target; with `lower != upper` it reverses at each bound
//! and "breathes" between them until the next command.

use crate::config::RampConfig;

/// Highest duty cycle, in percent
pub const MAX_DUTY: u8 = 100;

/// Brightness command errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BrightnessError {
    /// `lower > upper` or a bound above 100 %
    InvalidBounds { lower: u8, upper: u8 },
    /// The command queue is full
    QueueFull,
}

/// Target band for a backlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BrightnessCommand {
    lower: u8,
    upper: u8,
    force_jump: bool,
}

impl BrightnessCommand {
    /// Create a command, checking `lower <= upper <= 100`
    pub const fn new(lower: u8, upper: u8, force_jump: bool) -> Result<Self, BrightnessError> {
        if lower > upper || upper > MAX_DUTY {
            return Err(BrightnessError::InvalidBounds { lower, upper });
        }
        Ok(Self {
            lower,
            upper,
            force_jump,
        })
    }

    /// Full brightness immediately
    pub const fn on() -> Self {
        Self {
            lower: MAX_DUTY,
            upper: MAX_DUTY,
            force_jump: true,
        }
    }

    /// Dark immediately
    pub const fn off() -> Self {
        Self {
            lower: 0,
            upper: 0,
            force_jump: true,
        }
    }

    /// Fade to `level` and stay there
    pub const fn fade_to(level: u8) -> Result<Self, BrightnessError> {
        Self::new(level, level, false)
    }

    /// Oscillate between `lower` and `upper`
    pub const fn breathe(lower: u8, upper: u8) -> Result<Self, BrightnessError> {
        Self::new(lower, upper, false)
    }

    pub const fn lower(&self) -> u8 {
        self.lower
    }

    pub const fn upper(&self) -> u8 {
        self.upper
    }

    pub const fn force_jump(&self) -> bool {
        self.force_jump
    }
}

/// Ramp direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampDirection {
    Increasing,
    Decreasing,
}

/// PWM channel ramp state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BrightnessRamp {
    current: u8,
    lower: u8,
    upper: u8,
    direction: RampDirection,
    resolution: u8,
}

impl BrightnessRamp {
    /// Ramp resting at the configured initial duty
    pub fn new(config: &RampConfig) -> Self {
        let initial = config.initial_duty.min(MAX_DUTY);
        Self {
            current: initial,
            lower: initial,
            upper: initial,
            direction: RampDirection::Increasing,
            resolution: config.resolution.max(1),
        }
    }

    /// Duty cycle the channel should be driven at
    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn bounds(&self) -> (u8, u8) {
        (self.lower, self.upper)
    }

    pub fn direction(&self) -> RampDirection {
        self.direction
    }

    /// True when a one-shot ramp has reached its target
    pub fn is_settled(&self) -> bool {
        self.lower == self.upper && self.current == self.upper
    }

    /// Take a new command. Returns the duty to write.
    ///
    /// With both bounds on one side of the current duty the ramp heads
    /// toward them; with the current duty inside the band it keeps going
    /// the way it was.
    pub fn apply(&mut self, command: BrightnessCommand) -> u8 {
        self.lower = command.lower;
        self.upper = command.upper;
        if command.force_jump {
            self.current = command.upper;
        }

        if self.lower >= self.current && self.upper >= self.current {
            self.direction = RampDirection::Increasing;
        } else if self.lower <= self.current && self.upper <= self.current {
            self.direction = RampDirection::Decreasing;
        }
        self.current
    }

    /// Advance one tick. Returns the new duty if it changed.
    pub fn step(&mut self) -> Option<u8> {
        let previous = self.current;

        if self.lower != self.upper || self.current != self.upper {
            match self.direction {
                RampDirection::Increasing if self.current < self.upper => {
                    self.current = self.current.saturating_add(self.resolution).min(self.upper);
                }
                RampDirection::Decreasing if self.current > self.lower => {
                    self.current = self.current.saturating_sub(self.resolution).max(self.lower);
                }
                _ => {}
            }
        }

        if self.lower != self.upper && (self.current == self.upper || self.current == self.lower) {
            self.direction = match (self.direction, self.current == self.upper) {
                (RampDirection::Increasing, true) => RampDirection::Decreasing,
                (RampDirection::Decreasing, false) => RampDirection::Increasing,
                (direction, _) => direction,
            };
        }

        (self.current != previous).then_some(self.current)
    }
}
