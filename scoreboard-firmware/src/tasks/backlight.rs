//! Backlight ramp task, one per panel

use defmt::*;
use embassy_time::{Duration, Ticker};

use scoreboard_drivers::BacklightController;

use crate::channels::{BacklightPwm, BACKLIGHT_STOPS, BRIGHTNESS_QUEUES};

#[embassy_executor::task(pool_size = 2)]
pub async fn backlight_task(
    panel: usize,
    mut controller: BacklightController<BacklightPwm>,
    tick: Duration,
) {
    info!("Backlight {} task started", panel);

    let queue = &BRIGHTNESS_QUEUES[panel];
    let stop = &BACKLIGHT_STOPS[panel];
    let mut ticker = Ticker::every(tick);

    while !stop.is_stop_requested() {
        if let Some(duty) = controller.tick(queue) {
            trace!("Backlight {} duty {}%", panel, duty);
        }
        ticker.next().await;
    }

    info!(
        "Backlight {} task stopping at {}%",
        panel,
        controller.ramp().current()
    );
    stop.release(controller.exit());
}
