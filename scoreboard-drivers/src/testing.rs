//! Recording mocks shared by the driver tests
//!
//! Bus and pins log into one shared event list so tests can check the
//! order of writes and line changes across devices.

use core::cell::{Cell, RefCell};

use heapless::Vec;
use scoreboard_hal::{I2cBus, OutputPin, PwmOutput};

pub const LOG_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Write { address: u8, register: u8, value: u8 },
    Pin { name: &'static str, high: bool },
}

pub type Log = RefCell<Vec<Event, LOG_CAPACITY>>;

pub fn new_log() -> Log {
    RefCell::new(Vec::new())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

pub struct MockBus<'a> {
    log: &'a Log,
    /// Writes to this address fail
    pub fail_address: Option<u8>,
    /// Number of failing writes left (`u32::MAX` for always)
    pub failures_left: u32,
}

impl<'a> MockBus<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self {
            log,
            fail_address: None,
            failures_left: 0,
        }
    }

    pub fn failing(log: &'a Log, address: u8, times: u32) -> Self {
        Self {
            log,
            fail_address: Some(address),
            failures_left: times,
        }
    }
}

impl I2cBus for MockBus<'_> {
    type Error = MockBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_address == Some(address) && self.failures_left > 0 {
            self.failures_left = self.failures_left.saturating_sub(1);
            return Err(MockBusError);
        }
        assert_eq!(data.len(), 2, "expected a single register write");
        self.log
            .borrow_mut()
            .push(Event::Write {
                address,
                register: data[0],
                value: data[1],
            })
            .expect("log full");
        Ok(())
    }
}

pub struct MockPin<'a> {
    name: &'static str,
    log: &'a Log,
    high: Cell<bool>,
}

impl<'a> MockPin<'a> {
    pub fn new(name: &'static str, log: &'a Log) -> Self {
        Self {
            name,
            log,
            high: Cell::new(false),
        }
    }
}

impl OutputPin for MockPin<'_> {
    fn set_high(&mut self) {
        self.high.set(true);
        self.log
            .borrow_mut()
            .push(Event::Pin {
                name: self.name,
                high: true,
            })
            .expect("log full");
    }

    fn set_low(&mut self) {
        self.high.set(false);
        self.log
            .borrow_mut()
            .push(Event::Pin {
                name: self.name,
                high: false,
            })
            .expect("log full");
    }

    fn is_set_high(&self) -> bool {
        self.high.get()
    }
}

/// PWM output that keeps every duty written
pub struct MockPwm {
    pub writes: Vec<u8, LOG_CAPACITY>,
}

impl MockPwm {
    pub fn new() -> Self {
        Self { writes: Vec::new() }
    }
}

impl PwmOutput for MockPwm {
    fn set_duty_percent(&mut self, percent: u8) {
        self.writes.push(percent.min(100)).expect("log full");
    }

    fn duty_percent(&self) -> u8 {
        self.writes.last().copied().unwrap_or(0)
    }
}

/// Events logged since `start`
pub fn events_since(log: &Log, start: usize) -> Vec<Event, LOG_CAPACITY> {
    log.borrow().iter().skip(start).copied().collect()
}
