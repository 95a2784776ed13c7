//! Configuration types
//!
//! Board-agnostic configuration structures, stored as postcard binary data
//! or read from a `buzzer.toml` file.

pub mod buzzer;
pub mod hardware;
pub mod toml;

pub use buzzer::*;
pub use hardware::*;
pub use self::toml::{parse_config, FirmwareConfig, ParseError};
