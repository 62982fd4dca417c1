//! Board-agnostic core logic for the scoreboard firmware
//!
//! This crate contains everything that does not touch hardware:
//!
//! - Digit encoding and per-unit segment state
//! - Update messages and the bounded queues that carry them
//! - The multiplex sequencer (which digit phase to light, when)
//! - The backlight brightness ramp
//! - Task lifecycle (stop request, hardware release)
//! - Configuration types and the embedded TOML parser
//! - The producer-side game feed

#![no_std]
#![deny(unsafe_code)]

pub mod brightness;
pub mod config;
pub mod digit;
pub mod feed;
pub mod lifecycle;
pub mod multiplex;
pub mod queue;
pub mod segment;
pub mod update;
