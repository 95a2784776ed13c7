//! Buzzer commands
//!
//! Other parts of the firmware do not touch the sequencer directly; they
//! send a [`BuzzerCommand`] to the task owning it, which applies the command
//! with [`dispatch`].

use super::library::PatternId;
use super::player::PatternSequencer;
use crate::config::BuzzerConfig;
use crate::traits::ToneSink;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Request for the buzzer owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BuzzerCommand {
    /// Play a pattern, replacing whatever is playing
    Play {
        /// Pattern to play
        pattern: PatternId,
        /// Restart the pattern after its last step
        looping: bool,
    },
    /// Play the configured alarm
    Alarm,
    /// Silence the buzzer
    Stop,
}

impl BuzzerCommand {
    /// Play a pattern once
    pub const fn once(pattern: PatternId) -> Self {
        BuzzerCommand::Play {
            pattern,
            looping: false,
        }
    }
}

/// Apply a command to a sequencer
///
/// `Stop` always takes effect. Play requests are dropped while the buzzer
/// is disabled, or when the requested pattern cannot be resolved (custom
/// pattern not configured). Returns whether the command was carried out.
pub fn dispatch<'p, S: ToneSink>(
    sequencer: &mut PatternSequencer<'p, S>,
    config: &'p BuzzerConfig,
    command: BuzzerCommand,
    now_ms: u32,
) -> bool {
    let (id, looping) = match command {
        BuzzerCommand::Stop => {
            sequencer.stop();
            return true;
        }
        BuzzerCommand::Play { pattern, looping } => (pattern, looping),
        BuzzerCommand::Alarm => (config.alarm, config.alarm_looping),
    };

    if !config.enabled {
        return false;
    }

    match config.resolve(id) {
        Some(pattern) => {
            sequencer.start(pattern, looping, now_ms);
            true
        }
        None => false,
    }
}
