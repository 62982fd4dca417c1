//! Configuration types and the embedded configuration parser

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
