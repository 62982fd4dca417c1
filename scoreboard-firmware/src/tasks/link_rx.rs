//! Link UART receive task
//!
//! Parses host frames and feeds the controller queues without ever waiting
//! on a full queue. Snapshot fields that do not fit are retried from the
//! latest snapshot; brightness commands that do not fit are dropped.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{Duration, Timer};
use embedded_io_async::Read;

use scoreboard_core::feed::FeedProducer;
use scoreboard_protocol::{BoardMessage, FrameParser, HostMessage, PanelSelect};

use crate::channels::{
    BACKLIGHT_COUNT, BRIGHTNESS_QUEUES, DEFERRED_UPDATES, LINK_REPLY, SHUTDOWN_REQUEST,
    UPDATE_QUEUE,
};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Delay before re-offering deferred updates to the queue
const RETRY_INTERVAL: Duration = Duration::from_millis(5);

/// Link RX task - receives and parses frames from the host
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut producer = FeedProducer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let read = if producer.has_pending() {
            match select(rx.read(&mut buf), Timer::after(RETRY_INTERVAL)).await {
                Either::First(result) => Some(result),
                Either::Second(()) => None,
            }
        } else {
            Some(rx.read(&mut buf).await)
        };

        match read {
            None => {
                producer.retry(&UPDATE_QUEUE);
            }
            Some(Ok(n)) => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match HostMessage::from_frame(&frame) {
                            Ok(message) => handle_host_message(&mut producer, message),
                            Err(e) => warn!("Failed to decode host message: {:?}", e),
                        },
                        Ok(None) => {}
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Some(Err(e)) => warn!("UART read error: {:?}", e),
        }
    }
}

fn handle_host_message(producer: &mut FeedProducer, message: HostMessage) {
    match message {
        HostMessage::Snapshot(snapshot) => {
            debug!("Snapshot: {:?}", snapshot);
            let report = producer.publish(snapshot, &UPDATE_QUEUE);
            if report.deferred > 0 {
                DEFERRED_UPDATES.fetch_add(report.deferred as u32, Ordering::Relaxed);
                debug!("Update queue full, {} fields deferred", report.deferred);
            }
        }
        HostMessage::Brightness { panel, command } => {
            debug!("Brightness {:?}: {:?}", panel, command);
            if let PanelSelect::One(n) = panel {
                if n as usize >= BACKLIGHT_COUNT {
                    warn!("No backlight panel {}, dropping command", n);
                    return;
                }
            }
            for (index, queue) in BRIGHTNESS_QUEUES.iter().enumerate() {
                if panel.includes(index) && queue.push(command).is_err() {
                    warn!("Backlight {} queue full, dropping command", index);
                }
            }
        }
        HostMessage::DisplaysOff => {
            debug!("DisplaysOff");
            if !producer.displays_off(&UPDATE_QUEUE) {
                warn!("Update queue full, DisplaysOff pending");
            }
        }
        HostMessage::Shutdown => {
            info!("Shutdown requested by host");
            SHUTDOWN_REQUEST.signal(());
        }
        HostMessage::Ping => {
            trace!("PING received");
            if LINK_REPLY.try_send(BoardMessage::Pong).is_err() {
                warn!("Reply channel full, dropping PONG");
            }
        }
    }
}
