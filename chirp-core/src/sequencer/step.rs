//! Pattern data model
//!
//! A pattern is a table of timed [`Step`]s. Tables written as static data
//! end with the sentinel [`Step::END`] so they stay compatible with the
//! classic `{freq, duration}` arrays; a table without a sentinel is also
//! accepted and simply ends at its last element.

use crate::time::STALE_THRESHOLD_MS;
use crate::traits::Tone;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest step the sequencer can time
///
/// Elapsed times beyond this read as stale timestamps, so a longer step
/// would never finish.
pub const MAX_STEP_DURATION_MS: u32 = STALE_THRESHOLD_MS;

/// One timed unit of buzzer output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    /// Tone applied while this step is current
    pub tone: Tone,
    /// How long the step lasts, in milliseconds
    ///
    /// At most [`MAX_STEP_DURATION_MS`] (about 24 days).
    pub duration_ms: u32,
}

impl Step {
    /// End-of-pattern marker: silent tone with zero duration
    pub const END: Self = Self {
        tone: Tone::SILENT,
        duration_ms: 0,
    };

    /// Create a step
    pub const fn new(tone: Tone, duration_ms: u32) -> Self {
        Self { tone, duration_ms }
    }

    /// Full-intensity tone for `duration_ms`
    pub const fn tone(frequency_hz: u16, duration_ms: u32) -> Self {
        Self::new(Tone::full(frequency_hz), duration_ms)
    }

    /// Silence for `duration_ms`
    pub const fn rest(duration_ms: u32) -> Self {
        Self::new(Tone::SILENT, duration_ms)
    }

    /// Check if this is the end-of-pattern marker
    ///
    /// Both the duration and the tone must be zero. A zero-length step
    /// with a real tone is still a (degenerate) step.
    pub const fn is_terminator(&self) -> bool {
        self.duration_ms == 0
            && self.tone.frequency_hz == Tone::SILENT.frequency_hz
            && self.tone.intensity == Tone::SILENT.intensity
    }
}

/// Structural problems in a pattern table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternError {
    /// No playable step before the end
    NoSteps,
    /// Table does not end with [`Step::END`]
    MissingTerminator,
    /// Terminator found before the last position
    EarlyTerminator {
        /// Index of the misplaced terminator
        index: usize,
    },
    /// Step longer than [`MAX_STEP_DURATION_MS`]
    StepTooLong {
        /// Index of the offending step
        index: usize,
    },
}

/// Borrowed view of a pattern table
///
/// The sequencer keeps one of these plus its own cursor; the table itself
/// is never copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern<'a> {
    steps: &'a [Step],
}

impl<'a> Pattern<'a> {
    /// Wrap a step table
    pub const fn new(steps: &'a [Step]) -> Self {
        Self { steps }
    }

    /// The raw table, terminator included
    pub fn steps(&self) -> &'a [Step] {
        self.steps
    }

    /// Get a playable step
    ///
    /// Returns `None` at the terminator and past the end of the table.
    pub fn step(&self, index: usize) -> Option<&'a Step> {
        self.steps.get(index).filter(|s| !s.is_terminator())
    }

    /// Number of playable steps (those before the first terminator)
    pub fn len(&self) -> usize {
        self.steps
            .iter()
            .position(Step::is_terminator)
            .unwrap_or(self.steps.len())
    }

    /// Check if the pattern has nothing to play
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the playable steps
    pub fn iter(&self) -> impl Iterator<Item = &'a Step> + 'a {
        let steps = self.steps;
        steps.iter().take_while(|s| !s.is_terminator())
    }

    /// Sum of all playable step durations (one loop period)
    pub fn total_duration_ms(&self) -> u32 {
        self.iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.duration_ms))
    }

    /// Check the table against the sentinel-table contract
    ///
    /// The sequencer never calls this; it is meant for loaders of
    /// user-supplied tables.
    pub fn validate(&self) -> Result<(), PatternError> {
        let last = self.steps.len().checked_sub(1).ok_or(PatternError::NoSteps)?;

        if let Some(index) = self.steps[..last].iter().position(Step::is_terminator) {
            if index == 0 {
                return Err(PatternError::NoSteps);
            }
            return Err(PatternError::EarlyTerminator { index });
        }

        if !self.steps[last].is_terminator() {
            return Err(PatternError::MissingTerminator);
        }

        if last == 0 {
            return Err(PatternError::NoSteps);
        }

        if let Some(index) = self.steps[..last]
            .iter()
            .position(|s| s.duration_ms > MAX_STEP_DURATION_MS)
        {
            return Err(PatternError::StepTooLong { index });
        }

        Ok(())
    }
}

impl<'a> From<&'a [Step]> for Pattern<'a> {
    fn from(steps: &'a [Step]) -> Self {
        Self::new(steps)
    }
}

impl<'a, const N: usize> From<&'a [Step; N]> for Pattern<'a> {
    fn from(steps: &'a [Step; N]) -> Self {
        Self::new(steps)
    }
}
