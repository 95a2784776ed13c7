//! Built-in pattern tables
//!
//! Static sentinel-terminated tables for the sounds the device makes on its
//! own. A configuration can point at any of them by [`PatternId`].

use super::step::{Pattern, Step};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Short key-press style beep
pub static BEEP: [Step; 2] = [Step::tone(2000, 80), Step::END];

/// Two short beeps
pub static DOUBLE_BEEP: [Step; 4] = [
    Step::tone(2000, 80),
    Step::rest(80),
    Step::tone(2000, 80),
    Step::END,
];

/// Rising two-tone acknowledgement
pub static CONFIRM: [Step; 4] = [
    Step::tone(1500, 60),
    Step::rest(40),
    Step::tone(2000, 90),
    Step::END,
];

/// Low double buzz
pub static ERROR: [Step; 4] = [
    Step::tone(400, 200),
    Step::rest(100),
    Step::tone(400, 200),
    Step::END,
];

/// Two-tone alarm, usually played looping
pub static ALARM: [Step; 4] = [
    Step::tone(500, 100),
    Step::rest(50),
    Step::tone(900, 150),
    Step::END,
];

/// Ascending C major arpeggio (C6, E6, G6)
pub static CHIME: [Step; 5] = [
    Step::tone(1047, 150),
    Step::tone(1319, 150),
    Step::tone(1568, 300),
    Step::rest(200),
    Step::END,
];

/// Very short click, e.g. for seconds ticking
pub static TICK: [Step; 2] = [Step::tone(4000, 5), Step::END];

/// Pattern selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PatternId {
    /// [`BEEP`]
    Beep,
    /// [`DOUBLE_BEEP`]
    DoubleBeep,
    /// [`CONFIRM`]
    Confirm,
    /// [`ERROR`]
    Error,
    /// [`ALARM`]
    #[default]
    Alarm,
    /// [`CHIME`]
    Chime,
    /// [`TICK`]
    Tick,
    /// User pattern stored in the configuration
    Custom,
}

impl PatternId {
    /// All built-in patterns
    pub const BUILTIN: [PatternId; 7] = [
        PatternId::Beep,
        PatternId::DoubleBeep,
        PatternId::Confirm,
        PatternId::Error,
        PatternId::Alarm,
        PatternId::Chime,
        PatternId::Tick,
    ];

    /// Get the static table for a built-in pattern
    ///
    /// Returns `None` for [`PatternId::Custom`], which lives in the
    /// configuration instead.
    pub fn builtin(self) -> Option<Pattern<'static>> {
        let steps: &'static [Step] = match self {
            PatternId::Beep => &BEEP,
            PatternId::DoubleBeep => &DOUBLE_BEEP,
            PatternId::Confirm => &CONFIRM,
            PatternId::Error => &ERROR,
            PatternId::Alarm => &ALARM,
            PatternId::Chime => &CHIME,
            PatternId::Tick => &TICK,
            PatternId::Custom => return None,
        };
        Some(Pattern::new(steps))
    }

    /// Short display name
    pub fn label(self) -> &'static str {
        match self {
            PatternId::Beep => "Beep",
            PatternId::DoubleBeep => "Double",
            PatternId::Confirm => "Confirm",
            PatternId::Error => "Error",
            PatternId::Alarm => "Alarm",
            PatternId::Chime => "Chime",
            PatternId::Tick => "Tick",
            PatternId::Custom => "Custom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_well_formed() {
        for id in PatternId::BUILTIN {
            let pattern = id.builtin().unwrap();
            assert_eq!(pattern.validate(), Ok(()), "{}", id.label());
            assert!(pattern.total_duration_ms() > 0);
        }
    }

    #[test]
    fn test_custom_has_no_table() {
        assert!(PatternId::Custom.builtin().is_none());
    }

    #[test]
    fn test_alarm_cycle_length() {
        let alarm = PatternId::Alarm.builtin().unwrap();
        assert_eq!(alarm.len(), 3);
        assert_eq!(alarm.total_duration_ms(), 300);
    }
}
