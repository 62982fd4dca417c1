//! Multiplex controller
//!
//! Owns the I2C bus, the three segment units and the two digit-enable lines,
//! and runs one [`Multiplexer`] tick per call to [`MultiplexController::tick`].
//! All units are written in the same phase of the same tick, so they blink in
//! lockstep.
//!
//! # Usage
//!
//! ```ignore
//! let mut controller = MultiplexController::new(bus, left, right, &segments, &timing)?;
//! loop {
//!     controller.tick(&UPDATE_QUEUE);
//!     ticker.next().await;
//! }
//! let (bus, left, right) = controller.shutdown();
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;

use scoreboard_core::config::{ConfigError, MultiplexTiming, SegmentConfig};
use scoreboard_core::multiplex::{MultiplexState, Multiplexer, Scoreboard, Step};
use scoreboard_core::queue::UpdateQueue;
use scoreboard_core::segment::{DigitPosition, SegmentDisplayState};
use scoreboard_core::update::{Unit, UpdateMessage, UNIT_COUNT};
use scoreboard_hal::{I2cBus, OutputPin};

use crate::segment::{BusWriteError, SegmentDriver};

/// Errors that prevent the controller from starting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplexError<E> {
    /// Segment configuration does not validate
    Config(ConfigError),
    /// An expander failed to initialise
    Init(BusWriteError<E>),
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for MultiplexError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            MultiplexError::Config(e) => defmt::write!(f, "Config({})", e),
            MultiplexError::Init(e) => defmt::write!(f, "Init({})", e),
        }
    }
}

/// Running counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MultiplexStats {
    pub ticks: u32,
    /// Update messages applied
    pub messages: u32,
    /// Segment writes that failed
    pub bus_errors: u32,
}

/// The two digit-enable lines shared by every unit
struct EnableLines<P> {
    left: P,
    right: P,
    active_low: bool,
    lit: Option<DigitPosition>,
}

impl<P: OutputPin> EnableLines<P> {
    /// Light `position`, or nothing for `None`
    ///
    /// The line going inactive is switched first so both positions are
    /// never lit together.
    fn select(&mut self, position: Option<DigitPosition>) {
        let (left, right) = match position {
            Some(DigitPosition::First) => (true, false),
            Some(DigitPosition::Second) => (false, true),
            None => (false, false),
        };
        let active_low = self.active_low;
        if left {
            self.right.set_state(right ^ active_low);
            self.left.set_state(left ^ active_low);
        } else {
            self.left.set_state(left ^ active_low);
            self.right.set_state(right ^ active_low);
        }
        self.lit = position;
    }
}

/// Multiplex controller for one group of units sharing enable lines
pub struct MultiplexController<B: I2cBus, P: OutputPin> {
    bus: B,
    drivers: [SegmentDriver; UNIT_COUNT],
    lines: EnableLines<P>,
    mux: Multiplexer,
    batch_limit: usize,
    stats: MultiplexStats,
}

impl<B: I2cBus, P: OutputPin> MultiplexController<B, P> {
    /// Initialise every expander, blank every unit and release both lines
    pub fn new(
        mut bus: B,
        left: P,
        right: P,
        segments: &SegmentConfig,
        timing: &MultiplexTiming,
    ) -> Result<Self, MultiplexError<B::Error>> {
        segments.validate().map_err(MultiplexError::Config)?;
        timing.validate().map_err(MultiplexError::Config)?;

        let drivers = match segments.addresses().map(SegmentDriver::new) {
            [Ok(home), Ok(away), Ok(inning)] => [home, away, inning],
            [Err(address), _, _] | [_, Err(address), _] | [_, _, Err(address)] => {
                return Err(MultiplexError::Config(ConfigError::InvalidAddress(address)))
            }
        };
        for driver in &drivers {
            driver.init(&mut bus).map_err(MultiplexError::Init)?;
        }

        let mut lines = EnableLines {
            left,
            right,
            active_low: segments.enable_active_low,
            lit: None,
        };
        lines.select(None);

        Ok(Self {
            bus,
            drivers,
            lines,
            mux: Multiplexer::new(timing),
            batch_limit: timing.batch_limit.max(1),
            stats: MultiplexStats::default(),
        })
    }

    pub fn state(&self) -> MultiplexState {
        self.mux.state()
    }

    pub fn board(&self) -> &Scoreboard {
        self.mux.board()
    }

    pub fn stats(&self) -> MultiplexStats {
        self.stats
    }

    /// Run one tick: apply every queued update as a batch, then render
    pub fn tick<M: RawMutex, const N: usize>(&mut self, queue: &UpdateQueue<M, N>) -> Step {
        self.stats.ticks = self.stats.ticks.wrapping_add(1);

        let outcome = self.mux.apply_batch(queue.drain(self.batch_limit));
        self.stats.messages = self.stats.messages.wrapping_add(outcome.applied as u32);

        let step = self.mux.next_step();
        let failed = self.render(step);
        if failed > 0 {
            self.mux.request_redraw();
        }
        step
    }

    /// Turn every unit off, release both lines and hand back the hardware
    pub fn shutdown(mut self) -> (B, P, P) {
        self.mux.apply_batch([UpdateMessage::DisplaysOff]);
        self.render(Step::Off);
        (self.bus, self.lines.left, self.lines.right)
    }

    /// Execute one step. Returns the number of failed writes.
    fn render(&mut self, step: Step) -> usize {
        let mode = self.mux.mode();
        match step {
            Step::Hold => 0,
            Step::Off => {
                self.lines.select(None);
                self.write_all(|_| scoreboard_core::digit::BLANK_PATTERN)
            }
            Step::Refresh => {
                // Units still latch tens patterns after a first-digit phase
                let mut failed = if self.lines.lit == Some(DigitPosition::First) {
                    self.write_all(SegmentDisplayState::blank_pattern)
                } else {
                    0
                };
                self.lines.select(Some(DigitPosition::Second));
                failed += self.write_all(|state| state.pattern(DigitPosition::Second, mode));
                failed
            }
            Step::Phase(position) => {
                let mut failed = self.write_all(SegmentDisplayState::blank_pattern);
                self.lines.select(Some(position));
                failed += self.write_all(|state| state.pattern(position, mode));
                failed
            }
        }
    }

    /// Write one pattern per unit. A failed unit is counted and skipped.
    fn write_all(&mut self, pattern: impl Fn(&SegmentDisplayState) -> u8) -> usize {
        let mut failed = 0;
        for unit in Unit::ALL {
            let value = pattern(self.mux.board().unit(unit));
            let driver = &self.drivers[unit.index()];
            if let Err(_e) = driver.write_pattern(&mut self.bus, value) {
                failed += 1;
                self.stats.bus_errors = self.stats.bus_errors.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("Segment write failed: {}", _e);
            }
        }
        failed
    }
}
