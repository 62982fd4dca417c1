//! Segment multiplex task
//!
//! Runs one controller tick per multiplex tick until a stop is requested,
//! then blanks every unit and releases the bus and enable lines.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_time::{Duration, Ticker};

use scoreboard_drivers::MultiplexController;

use crate::channels::{EnableLine, SegmentBus, BUS_ERRORS, MULTIPLEX_STOP, UPDATE_QUEUE};

#[embassy_executor::task]
pub async fn multiplex_task(
    mut controller: MultiplexController<SegmentBus, EnableLine>,
    tick: Duration,
) {
    info!("Multiplex task started");

    let mut ticker = Ticker::every(tick);
    let mut bus_errors = 0;

    while !MULTIPLEX_STOP.is_stop_requested() {
        controller.tick(&UPDATE_QUEUE);

        let stats = controller.stats();
        if stats.bus_errors != bus_errors {
            bus_errors = stats.bus_errors;
            BUS_ERRORS.store(bus_errors, Ordering::Relaxed);
        }

        ticker.next().await;
    }

    let stats = controller.stats();
    info!(
        "Multiplex task stopping after {} ticks ({} updates, {} bus errors)",
        stats.ticks, stats.messages, stats.bus_errors
    );
    MULTIPLEX_STOP.release(controller.shutdown());
}
