//! Controller task lifecycle
//!
//! A controller task polls its [`StopToken`] once per tick. When a stop is
//! requested it drives its hardware to a safe state (units blanked, final
//! duty written) and releases the hardware handles through the token. The
//! owner of the matching [`TaskHandle`] collects them, so every handle is
//! dropped in one place, after the task that used it has stopped.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// Shared between a controller task and its owner
pub struct StopToken<M: RawMutex, T> {
    stop: AtomicBool,
    released: Signal<M, T>,
}

impl<M: RawMutex, T> Default for StopToken<M, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, T> StopToken<M, T> {
    pub const fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
            released: Signal::new(),
        }
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Checked by the task every tick
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Called by the task once, after its loop has exited
    pub fn release(&self, parts: T) {
        self.released.signal(parts);
    }

    /// Owner side of the token
    pub fn handle(&self) -> TaskHandle<'_, M, T> {
        TaskHandle {
            token: self,
            joined: false,
        }
    }
}

/// Owner side of a running controller task
pub struct TaskHandle<'a, M: RawMutex, T> {
    token: &'a StopToken<M, T>,
    joined: bool,
}

impl<M: RawMutex, T> TaskHandle<'_, M, T> {
    /// Stop the task and wait for its hardware
    ///
    /// Returns the released parts on the first call and `None` on every
    /// later call.
    pub async fn shutdown(&mut self) -> Option<T> {
        if self.joined {
            return None;
        }
        self.token.request_stop();
        let parts = self.token.released.wait().await;
        self.joined = true;
        Some(parts)
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }
}
