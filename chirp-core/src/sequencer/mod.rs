//! Pattern sequencer
//!
//! Plays timed tone patterns on a buzzer from a cooperative polling loop.

pub mod command;
pub mod library;
pub mod player;
pub mod step;

pub use command::{dispatch, BuzzerCommand};
pub use library::PatternId;
pub use player::{PatternSequencer, SequencerState};
pub use step::{Pattern, PatternError, Step, MAX_STEP_DURATION_MS};
