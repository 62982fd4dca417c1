//! Scoreboard - Live Game Scoreboard Firmware
//!
//! Main firmware binary for RP2040-based scoreboard boards. Drives three
//! multiplexed seven-segment units and two backlight panels from game
//! snapshots received over a serial link.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Duration;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use scoreboard_core::config::{parse_config, ScoreboardConfig};
use scoreboard_core::lifecycle::TaskHandle;
use scoreboard_drivers::{BacklightController, MultiplexController};
use scoreboard_hal::I2cConfig;
use scoreboard_hal_rp2040::{RpI2c, RpOutput, RpPwm};

use crate::channels::{
    BacklightPwm, MultiplexParts, BACKLIGHT_COUNT, BACKLIGHT_STOPS, MULTIPLEX_STOP,
    SHUTDOWN_REQUEST,
};

/// Embedded board configuration (compiled into firmware)
/// Edit scoreboard.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../scoreboard.toml");

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Scoreboard firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Segment bus and digit-enable lines
    // Pin assignments: I2C0 SDA=GPIO4, SCL=GPIO5, enable left=GPIO6, right=GPIO7
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2cConfig::STANDARD.frequency;
    let bus = RpI2c::new(I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config));
    let left = RpOutput::new(Output::new(p.PIN_6, Level::Low));
    let right = RpOutput::new(Output::new(p.PIN_7, Level::Low));

    let multiplex =
        match MultiplexController::new(bus, left, right, &config.segments, &config.multiplex) {
            Ok(controller) => {
                let tick = Duration::from_micros(config.multiplex.tick_us as u64);
                unwrap!(spawner.spawn(tasks::multiplex_task(controller, tick)));
                info!("Segment units initialized");
                Some(MULTIPLEX_STOP.handle())
            }
            Err(e) => {
                error!("Segment units unavailable: {:?}", e);
                None
            }
        };

    // Backlight PWM
    // Pin assignments: panel 0 on GPIO16 (slice 0 A), panel 1 on GPIO18 (slice 1 A)
    let pwms = [
        Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm::Config::default()),
        Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, pwm::Config::default()),
    ];
    let mut backlights: [Option<TaskHandle<'static, CriticalSectionRawMutex, BacklightPwm>>;
        BACKLIGHT_COUNT] = [None, None];
    let backlight_tick = Duration::from_millis(config.backlight.tick_ms as u64);
    for (panel, pwm) in pwms.into_iter().enumerate() {
        match RpPwm::new(pwm, config.backlight.frequency_hz) {
            Ok(pwm) => {
                let controller = BacklightController::new(pwm, &config.backlight);
                unwrap!(spawner.spawn(tasks::backlight_task(panel, controller, backlight_tick)));
                backlights[panel] = Some(BACKLIGHT_STOPS[panel].handle());
            }
            Err(e) => error!("Backlight {} unavailable: {:?}", panel, e),
        }
    }
    info!("Backlights initialized");

    // Serial link to the game feed host
    // Pin assignments: UART0 TX=GPIO0, RX=GPIO1
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.link.baud;

    let tx_buf = TX_BUF.init([0u8; 128]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    unwrap!(spawner.spawn(tasks::link_rx_task(rx)));
    unwrap!(spawner.spawn(tasks::link_tx_task(tx)));

    info!("All tasks spawned, firmware running");

    SHUTDOWN_REQUEST.wait().await;
    shutdown(multiplex, backlights).await;

    // Nothing left to drive; the link tasks keep answering the host
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> ScoreboardConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs validates the file, so this only happens if the two disagree
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            ScoreboardConfig::default()
        }
    }
}

/// Stop every controller, then drop all of the hardware it released
async fn shutdown(
    multiplex: Option<TaskHandle<'static, CriticalSectionRawMutex, MultiplexParts>>,
    backlights: [Option<TaskHandle<'static, CriticalSectionRawMutex, BacklightPwm>>;
        BACKLIGHT_COUNT],
) {
    info!("Shutting down controllers");

    let mut segment_parts = None;
    if let Some(mut handle) = multiplex {
        segment_parts = handle.shutdown().await;
        info!("Segment units off");
    }

    let mut pwms: [Option<BacklightPwm>; BACKLIGHT_COUNT] = [None, None];
    for (panel, handle) in backlights.into_iter().enumerate() {
        if let Some(mut handle) = handle {
            pwms[panel] = handle.shutdown().await;
            info!("Backlight {} stopped", panel);
        }
    }

    drop(segment_parts);
    drop(pwms);
    info!("Hardware released");
}
