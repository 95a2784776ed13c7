//! Hardware abstraction traits
//!
//! These traits define the interface between the sequencer and
//! hardware-specific implementations.

pub mod buzzer;

pub use buzzer::{BuzzerError, FrequencyControl, Tone, ToneSink, MAX_INTENSITY};
