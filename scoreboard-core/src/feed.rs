//! Producer side of the update queue
//!
//! The game feed turns whole game snapshots into per-field update messages.
//! It remembers what the multiplexer has actually been handed, not what it
//! was last asked to show: a field whose message hit a full queue stays
//! "undelivered" and is diffed again on the next publish. Intermediate
//! states are thus dropped instead of queued, the producer never blocks, and
//! the latest state always reaches the display eventually.
//!
//! A `DisplaysOff` still waiting in the queue would swallow any value pushed
//! behind it in the same batch, so values are held back until the consumer
//! has taken it. The feed must be the queue's only producer for that check
//! to hold.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::queue::{QueueFull, UpdateQueue};
use crate::update::{InningHalf, UpdateMessage};

/// Current state of a game, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub home_score: u8,
    pub away_score: u8,
    pub inning: u8,
    pub half: InningHalf,
}

/// Outcome of one publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PublishReport {
    /// Messages enqueued
    pub sent: u8,
    /// Changed fields left for the next publish because the queue was full
    pub deferred: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Delivered {
    home_score: Option<u8>,
    away_score: Option<u8>,
    inning: Option<u8>,
    half: Option<InningHalf>,
}

/// Diffs snapshots against what the display has been sent
#[derive(Debug, Clone, Default)]
pub struct GameFeed {
    delivered: Delivered,
    /// `DisplaysOff` was pushed and may not have been consumed yet
    off_in_flight: bool,
}

impl GameFeed {
    pub const fn new() -> Self {
        Self {
            delivered: Delivered {
                home_score: None,
                away_score: None,
                inning: None,
                half: None,
            },
            off_in_flight: false,
        }
    }

    /// Messages needed to bring the display to `snapshot`
    pub fn diff(&self, snapshot: &GameSnapshot) -> heapless::Vec<UpdateMessage, 4> {
        let mut changes = heapless::Vec::new();
        let delivered = &self.delivered;
        let candidates = [
            (delivered.home_score != Some(snapshot.home_score))
                .then_some(UpdateMessage::HomeScore(snapshot.home_score)),
            (delivered.away_score != Some(snapshot.away_score))
                .then_some(UpdateMessage::AwayScore(snapshot.away_score)),
            (delivered.inning != Some(snapshot.inning))
                .then_some(UpdateMessage::Inning(snapshot.inning)),
            (delivered.half != Some(snapshot.half))
                .then_some(UpdateMessage::InningHalf(snapshot.half)),
        ];
        // At most four candidates for a capacity of four
        for message in candidates.into_iter().flatten() {
            let _ = changes.push(message);
        }
        changes
    }

    /// Push every changed field, stopping at the first full queue
    pub fn publish<M: RawMutex, const N: usize>(
        &mut self,
        snapshot: &GameSnapshot,
        queue: &UpdateQueue<M, N>,
    ) -> PublishReport {
        let changes = self.diff(snapshot);
        let mut report = PublishReport::default();

        if self.off_in_flight {
            if !queue.is_empty() {
                report.deferred = changes.len() as u8;
                return report;
            }
            self.off_in_flight = false;
        }

        for (i, message) in changes.iter().enumerate() {
            if queue.push(*message).is_err() {
                report.deferred = (changes.len() - i) as u8;
                break;
            }
            self.mark_delivered(*message);
            report.sent += 1;
        }
        report
    }

    /// Push `DisplaysOff` and forget what was delivered
    ///
    /// The next snapshot after a successful call is sent in full, once the
    /// consumer has taken the `DisplaysOff`.
    pub fn displays_off<M: RawMutex, const N: usize>(
        &mut self,
        queue: &UpdateQueue<M, N>,
    ) -> Result<(), QueueFull<UpdateMessage>> {
        queue.push(UpdateMessage::DisplaysOff)?;
        self.delivered = Delivered::default();
        self.off_in_flight = true;
        Ok(())
    }

    fn mark_delivered(&mut self, message: UpdateMessage) {
        match message {
            UpdateMessage::HomeScore(n) => self.delivered.home_score = Some(n),
            UpdateMessage::AwayScore(n) => self.delivered.away_score = Some(n),
            UpdateMessage::Inning(n) => self.delivered.inning = Some(n),
            UpdateMessage::InningHalf(half) => self.delivered.half = Some(half),
            UpdateMessage::DisplaysOff => self.delivered = Delivered::default(),
        }
    }
}

/// Retrying producer built on [`GameFeed`]
///
/// Keeps the latest snapshot while some of its fields are undelivered and a
/// `DisplaysOff` that did not fit, so the owner only has to call
/// [`retry`](Self::retry) periodically while [`has_pending`](Self::has_pending).
#[derive(Debug, Clone, Default)]
pub struct FeedProducer {
    feed: GameFeed,
    latest: Option<GameSnapshot>,
    /// Must go out before any later snapshot
    off_pending: bool,
}

impl FeedProducer {
    pub const fn new() -> Self {
        Self {
            feed: GameFeed::new(),
            latest: None,
            off_pending: false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.off_pending || self.latest.is_some()
    }

    pub fn is_off_pending(&self) -> bool {
        self.off_pending
    }

    /// Publish a fresh snapshot, replacing any undelivered one
    pub fn publish<M: RawMutex, const N: usize>(
        &mut self,
        snapshot: GameSnapshot,
        queue: &UpdateQueue<M, N>,
    ) -> PublishReport {
        if self.off_pending {
            self.latest = Some(snapshot);
            return PublishReport::default();
        }
        let report = self.feed.publish(&snapshot, queue);
        self.latest = (report.deferred > 0).then_some(snapshot);
        report
    }

    /// Request blank displays; snapshots received earlier are dropped
    ///
    /// Returns false if the queue was full and the request is pending.
    pub fn displays_off<M: RawMutex, const N: usize>(
        &mut self,
        queue: &UpdateQueue<M, N>,
    ) -> bool {
        self.latest = None;
        self.off_pending = self.feed.displays_off(queue).is_err();
        !self.off_pending
    }

    /// Offer whatever is pending to the queue again
    pub fn retry<M: RawMutex, const N: usize>(&mut self, queue: &UpdateQueue<M, N>) -> PublishReport {
        if self.off_pending {
            if self.feed.displays_off(queue).is_err() {
                return PublishReport::default();
            }
            self.off_pending = false;
        }
        match self.latest.take() {
            Some(snapshot) => self.publish(snapshot, queue),
            None => PublishReport::default(),
        }
    }
}
