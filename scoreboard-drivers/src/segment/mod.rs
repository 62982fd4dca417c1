//! Segment display units

pub mod mcp23008;

pub use mcp23008::{BusWriteError, SegmentDriver};
