//! Link UART transmit task
//!
//! Sends replies queued by the RX task, and a status frame every second.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Ticker};
use embedded_io_async::Write;

use scoreboard_protocol::{BoardMessage, BoardStatus};

use crate::channels::{BUS_ERRORS, DEFERRED_UPDATES, LINK_REPLY};

const STATUS_INTERVAL: Duration = Duration::from_secs(1);

#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    let mut ticker = Ticker::every(STATUS_INTERVAL);

    loop {
        let message = match select(LINK_REPLY.receive(), ticker.next()).await {
            Either::First(reply) => reply,
            Either::Second(()) => BoardMessage::Status(BoardStatus {
                bus_errors: BUS_ERRORS.load(Ordering::Relaxed),
                deferred_updates: DEFERRED_UPDATES.load(Ordering::Relaxed),
            }),
        };
        send(&mut tx, &message).await;
    }
}

async fn send(tx: &mut BufferedUartTx, message: &BoardMessage) {
    let frame = match message.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to build {:?} frame: {:?}", message, e);
            return;
        }
    };

    match frame.encode_to_vec() {
        Ok(bytes) => {
            if let Err(e) = tx.write_all(&bytes).await {
                warn!("Failed to send {:?}: {:?}", message, e);
            } else {
                trace!("Sent {:?}", message);
            }
        }
        Err(e) => warn!("Failed to encode {:?}: {:?}", message, e),
    }
}
