//! Board-agnostic core logic for the buzzer firmware
//!
//! This crate contains all logic that does not depend on specific hardware:
//!
//! - Buzzer output traits (tone sink, frequency control)
//! - Pattern data model and built-in pattern tables
//! - Polled, non-blocking pattern sequencer
//! - Buzzer commands for the task owning the sequencer
//! - Configuration type definitions, persistence and TOML parsing

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod sequencer;
pub mod time;
pub mod traits;
