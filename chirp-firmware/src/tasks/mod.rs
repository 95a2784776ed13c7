//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod buzzer;

pub use buzzer::{buzzer_task, BuzzerOutput};
