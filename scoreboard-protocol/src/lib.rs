//! Scoreboard link protocol
//!
//! The board has no network stack of its own. A host process polls the game
//! service and hands the board snapshots and backlight commands over a UART.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬───────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CRC-8 │
//! │ 1B    │ 1B     │ 1B   │ 0–32B       │ 1B    │
//! └───────┴────────┴──────┴─────────────┴───────┘
//! ```
//!
//! The host is the only producer of game state. The board answers pings and
//! reports its error counters; it never initiates anything else.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{BoardMessage, BoardStatus, HostMessage, PanelSelect};
