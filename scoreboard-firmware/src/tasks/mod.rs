//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod backlight;
pub mod link_rx;
pub mod link_tx;
pub mod multiplex;

pub use backlight::backlight_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use multiplex::multiplex_task;
