//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use chirp_core::sequencer::BuzzerCommand;

/// Buzzer command signal
///
/// Only the latest command is kept; a new request replaces one the buzzer
/// task has not picked up yet.
pub static BUZZER_CMD: Signal<CriticalSectionRawMutex, BuzzerCommand> = Signal::new();
