//! Inter-task communication channels
//!
//! The update and brightness queues are the only way into a controller
//! task. Each controller also owns a stop token, through which it hands its
//! hardware back to `main` on shutdown.

use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU32;

use scoreboard_core::lifecycle::StopToken;
use scoreboard_core::queue::{BoundedQueue, BrightnessQueue, UpdateQueue};
use scoreboard_hal_rp2040::{RpI2c, RpOutput, RpPwm};
use scoreboard_protocol::BoardMessage;

/// Number of backlight panels
pub const BACKLIGHT_COUNT: usize = 2;

/// Reply channel capacity for the link TX task
const REPLY_CHANNEL_SIZE: usize = 4;

/// Segment bus shared by the three units
pub type SegmentBus = RpI2c<I2c<'static, I2C0, Blocking>>;

/// Digit-enable line
pub type EnableLine = RpOutput<'static>;

/// Hardware released by the multiplex task: bus, left and right lines
pub type MultiplexParts = (SegmentBus, EnableLine, EnableLine);

/// Backlight PWM channel
pub type BacklightPwm = RpPwm<'static>;

/// Display updates from the link RX task
pub static UPDATE_QUEUE: UpdateQueue<CriticalSectionRawMutex> = BoundedQueue::new();

/// Brightness commands, one queue per panel
pub static BRIGHTNESS_QUEUES: [BrightnessQueue<CriticalSectionRawMutex>; BACKLIGHT_COUNT] =
    [BoundedQueue::new(), BoundedQueue::new()];

pub static MULTIPLEX_STOP: StopToken<CriticalSectionRawMutex, MultiplexParts> = StopToken::new();

pub static BACKLIGHT_STOPS: [StopToken<CriticalSectionRawMutex, BacklightPwm>; BACKLIGHT_COUNT] =
    [StopToken::new(), StopToken::new()];

/// Signal that the host asked the board to shut down
pub static SHUTDOWN_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Messages for the link TX task
pub static LINK_REPLY: Channel<CriticalSectionRawMutex, BoardMessage, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Failed segment writes, published by the multiplex task
pub static BUS_ERRORS: AtomicU32 = AtomicU32::new(0);

/// Snapshot fields deferred because the update queue was full
pub static DEFERRED_UPDATES: AtomicU32 = AtomicU32::new(0);
