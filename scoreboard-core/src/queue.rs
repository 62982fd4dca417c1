//! Bounded single-consumer queues between producers and controller loops
//!
//! Producers never block: a full queue hands the message back. The consumer
//! polls once per tick and drains whatever is available.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::brightness::{BrightnessCommand, BrightnessError};
use crate::update::UpdateMessage;

/// Default queue depth
pub const DEFAULT_QUEUE_DEPTH: usize = 2;

/// The queue was full; the message is handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull<T>(pub T);

impl<T> QueueFull<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Bounded queue over an embassy-sync channel
pub struct BoundedQueue<M: RawMutex, T, const N: usize> {
    channel: Channel<M, T, N>,
}

/// Update messages for a multiplex controller
pub type UpdateQueue<M, const N: usize = DEFAULT_QUEUE_DEPTH> = BoundedQueue<M, UpdateMessage, N>;

/// Commands for a backlight controller
pub type BrightnessQueue<M, const N: usize = DEFAULT_QUEUE_DEPTH> =
    BoundedQueue<M, BrightnessCommand, N>;

impl<M: RawMutex, T, const N: usize> Default for BoundedQueue<M, T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, T, const N: usize> BoundedQueue<M, T, N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue without blocking
    pub fn push(&self, message: T) -> Result<(), QueueFull<T>> {
        self.channel.try_send(message).map_err(|e| match e {
            TrySendError::Full(m) => QueueFull(m),
        })
    }

    /// Enqueue, discarding the oldest pending message if the queue is full
    ///
    /// Returns the discarded message, if any. If the consumer frees a slot in
    /// between and the retry still fails, the new message is returned
    /// instead.
    pub fn push_replacing_oldest(&self, message: T) -> Option<T> {
        match self.push(message) {
            Ok(()) => None,
            Err(QueueFull(message)) => {
                let dropped = self.try_pop();
                match self.push(message) {
                    Ok(()) => dropped,
                    Err(QueueFull(message)) => Some(message),
                }
            }
        }
    }

    /// Dequeue one message, if any
    pub fn try_pop(&self) -> Option<T> {
        self.channel.try_receive().ok()
    }

    /// Iterator draining at most `limit` of the messages available now
    ///
    /// Messages pushed while the iterator runs are left for the next drain,
    /// so one batch never mixes in a producer's reaction to an earlier item.
    pub fn drain(&self, limit: usize) -> impl Iterator<Item = T> + '_ {
        let available = self.len().min(limit);
        core::iter::from_fn(move || self.try_pop()).take(available)
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop every pending message
    pub fn clear(&self) {
        self.channel.clear();
    }
}

impl<M: RawMutex, const N: usize> BoundedQueue<M, BrightnessCommand, N> {
    /// Validate and enqueue a brightness command
    pub fn command(&self, lower: u8, upper: u8, force_jump: bool) -> Result<(), BrightnessError> {
        let command = BrightnessCommand::new(lower, upper, force_jump)?;
        self.push(command).map_err(|_| BrightnessError::QueueFull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_push_until_full() {
        let queue: UpdateQueue<NoopRawMutex> = BoundedQueue::new();
        assert_eq!(queue.capacity(), 2);
        assert!(queue.push(UpdateMessage::HomeScore(1)).is_ok());
        assert!(queue.push(UpdateMessage::HomeScore(2)).is_ok());
        assert_eq!(
            queue.push(UpdateMessage::HomeScore(3)),
            Err(QueueFull(UpdateMessage::HomeScore(3)))
        );
        assert!(queue.is_full());
    }

    #[test]
    fn test_fifo_order() {
        let queue: UpdateQueue<NoopRawMutex> = BoundedQueue::new();
        queue.push(UpdateMessage::HomeScore(1)).unwrap();
        queue.push(UpdateMessage::AwayScore(2)).unwrap();
        assert_eq!(queue.try_pop(), Some(UpdateMessage::HomeScore(1)));
        assert_eq!(queue.try_pop(), Some(UpdateMessage::AwayScore(2)));
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_push_replacing_oldest() {
        let queue: UpdateQueue<NoopRawMutex> = BoundedQueue::new();
        assert_eq!(queue.push_replacing_oldest(UpdateMessage::Inning(1)), None);
        assert_eq!(queue.push_replacing_oldest(UpdateMessage::Inning(2)), None);
        assert_eq!(
            queue.push_replacing_oldest(UpdateMessage::Inning(3)),
            Some(UpdateMessage::Inning(1))
        );
        assert_eq!(queue.try_pop(), Some(UpdateMessage::Inning(2)));
        assert_eq!(queue.try_pop(), Some(UpdateMessage::Inning(3)));
    }

    #[test]
    fn test_drain_respects_limit() {
        let queue: UpdateQueue<NoopRawMutex, 4> = BoundedQueue::new();
        for n in 0..4 {
            queue.push(UpdateMessage::HomeScore(n)).unwrap();
        }
        assert_eq!(queue.drain(3).count(), 3);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain(8).count(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_leaves_messages_pushed_meanwhile() {
        let queue: UpdateQueue<NoopRawMutex, 4> = BoundedQueue::new();
        queue.push(UpdateMessage::DisplaysOff).unwrap();
        let mut taken = 0;
        for _ in queue.drain(8) {
            taken += 1;
            queue.push(UpdateMessage::HomeScore(9)).unwrap();
        }
        assert_eq!(taken, 1);
        assert_eq!(queue.try_pop(), Some(UpdateMessage::HomeScore(9)));
    }

    #[test]
    fn test_brightness_command_validates() {
        let queue: BrightnessQueue<NoopRawMutex> = BoundedQueue::new();
        assert_eq!(
            queue.command(80, 20, false),
            Err(BrightnessError::InvalidBounds {
                lower: 80,
                upper: 20
            })
        );
        assert!(queue.is_empty());
        queue.command(0, 100, false).unwrap();
        queue.command(100, 100, true).unwrap();
        assert_eq!(queue.command(0, 0, true), Err(BrightnessError::QueueFull));
    }
}
