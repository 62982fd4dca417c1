//! Producer and consumer on separate threads, sharing a capacity-2 queue

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use critical_section as _;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use scoreboard_core::config::MultiplexTiming;
use scoreboard_core::feed::{FeedProducer, GameFeed, GameSnapshot};
use scoreboard_core::multiplex::{MultiplexState, Multiplexer};
use scoreboard_core::queue::{BoundedQueue, UpdateQueue};
use scoreboard_core::update::{InningHalf, Unit};

static QUEUE: UpdateQueue<CriticalSectionRawMutex> = BoundedQueue::new();
static OFF_QUEUE: UpdateQueue<CriticalSectionRawMutex> = BoundedQueue::new();

#[test]
fn test_latest_snapshot_always_reaches_the_board() {
    let done = AtomicBool::new(false);
    let last = GameSnapshot {
        home_score: 11,
        away_score: 29,
        inning: 9,
        half: InningHalf::Bottom,
    };

    let board = thread::scope(|s| {
        s.spawn(|| {
            let mut feed = GameFeed::new();
            for run in 0..30u8 {
                let snapshot = GameSnapshot {
                    home_score: run / 3,
                    away_score: run,
                    inning: 1 + run / 4,
                    half: if run % 2 == 0 {
                        InningHalf::Top
                    } else {
                        InningHalf::Bottom
                    },
                };
                // Never blocks; deferred fields are picked up by later snapshots
                feed.publish(&snapshot, &QUEUE);
            }
            while feed.publish(&last, &QUEUE).deferred > 0 {
                thread::sleep(Duration::from_micros(200));
            }
            done.store(true, Ordering::Release);
        });

        let consumer = s.spawn(|| {
            let mut mux = Multiplexer::new(&MultiplexTiming::default());
            loop {
                let finished = done.load(Ordering::Acquire);
                mux.apply_batch(QUEUE.drain(8));
                mux.next_step();
                if finished && QUEUE.is_empty() {
                    break;
                }
                thread::sleep(Duration::from_micros(100));
            }
            mux.board().clone()
        });

        consumer.join().unwrap()
    });

    assert_eq!(board.unit(Unit::Home).number(), Some(11));
    assert_eq!(board.unit(Unit::Away).number(), Some(29));
    assert_eq!(board.unit(Unit::Inning).number(), Some(9));
    assert!(!board.unit(Unit::Home).extra_indicator());
    assert!(board.unit(Unit::Away).extra_indicator());
}

#[test]
fn test_snapshot_after_displays_off_lights_the_board() {
    let done = AtomicBool::new(false);

    let (state, board) = thread::scope(|s| {
        s.spawn(|| {
            let mut producer = FeedProducer::new();
            for round in 0..20u8 {
                producer.displays_off(&OFF_QUEUE);
                producer.publish(
                    GameSnapshot {
                        home_score: round,
                        away_score: 1,
                        inning: 2,
                        half: InningHalf::Top,
                    },
                    &OFF_QUEUE,
                );
                while producer.has_pending() {
                    thread::sleep(Duration::from_micros(100));
                    producer.retry(&OFF_QUEUE);
                }
            }
            done.store(true, Ordering::Release);
        });

        let consumer = s.spawn(|| {
            let mut mux = Multiplexer::new(&MultiplexTiming::default());
            loop {
                let finished = done.load(Ordering::Acquire);
                mux.apply_batch(OFF_QUEUE.drain(8));
                mux.next_step();
                if finished && OFF_QUEUE.is_empty() {
                    break;
                }
                thread::sleep(Duration::from_micros(100));
            }
            (mux.state(), mux.board().clone())
        });

        consumer.join().unwrap()
    });

    assert_eq!(state, MultiplexState::DoubleDigitBlink);
    assert_eq!(board.unit(Unit::Home).number(), Some(19));
    assert_eq!(board.unit(Unit::Away).number(), Some(1));
    assert!(board.unit(Unit::Home).extra_indicator());
}
