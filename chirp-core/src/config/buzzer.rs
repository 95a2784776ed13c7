//! Buzzer configuration
//!
//! User-facing buzzer settings, persisted as postcard binary data. A header
//! (magic + version) guards against reading stale or foreign data.

use heapless::{String, Vec};

use crate::sequencer::{Pattern, PatternError, PatternId, Step};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Magic number to identify buzzer configuration data
pub const CONFIG_MAGIC: u32 = 0x4252_5A52; // "BRZR"

/// Current configuration data version
pub const CONFIG_VERSION: u8 = 1;

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum steps in a custom pattern, terminator included
pub const MAX_CUSTOM_STEPS: usize = 16;

/// Upper bound for the serialized configuration size
pub const MAX_CONFIG_SIZE: usize = 256;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Invalid magic or version
    InvalidFormat,
    /// Label longer than [`MAX_LABEL_LEN`]
    LabelTooLong,
    /// More than [`MAX_CUSTOM_STEPS`] steps
    TooManySteps,
    /// Custom pattern table is malformed
    Pattern(PatternError),
}

impl From<PatternError> for ConfigError {
    fn from(e: PatternError) -> Self {
        ConfigError::Pattern(e)
    }
}

/// User-defined pattern stored in the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CustomPattern {
    /// Display label
    pub label: String<MAX_LABEL_LEN>,
    /// Step table, ending with [`Step::END`]
    pub steps: Vec<Step, MAX_CUSTOM_STEPS>,
}

impl CustomPattern {
    /// Build a custom pattern from a step list
    ///
    /// The terminator is appended when `steps` does not already end with
    /// one. The result is validated.
    pub fn new(label: &str, steps: &[Step]) -> Result<Self, ConfigError> {
        let mut pattern = Self {
            label: String::new(),
            steps: Vec::new(),
        };

        pattern
            .label
            .push_str(label)
            .map_err(|_| ConfigError::LabelTooLong)?;
        pattern
            .steps
            .extend_from_slice(steps)
            .map_err(|_| ConfigError::TooManySteps)?;

        if !pattern.steps.last().is_some_and(Step::is_terminator) {
            pattern
                .steps
                .push(Step::END)
                .map_err(|_| ConfigError::TooManySteps)?;
        }

        pattern.validate()?;
        Ok(pattern)
    }

    /// Borrow the table as a playable pattern
    pub fn pattern(&self) -> Pattern<'_> {
        Pattern::new(&self.steps)
    }

    /// Check the stored table
    pub fn validate(&self) -> Result<(), PatternError> {
        self.pattern().validate()
    }
}

/// Buzzer settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuzzerConfig {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Master switch; when false, play requests are ignored
    pub enabled: bool,
    /// Output volume (0-100%)
    pub volume_percent: u8,
    /// Pattern played for alarms
    pub alarm: PatternId,
    /// Whether the alarm repeats until stopped
    pub alarm_looping: bool,
    /// Optional user pattern, selected with [`PatternId::Custom`]
    pub custom: Option<CustomPattern>,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self {
            magic: CONFIG_MAGIC,
            version: CONFIG_VERSION,
            enabled: true,
            volume_percent: 80,
            alarm: PatternId::Alarm,
            alarm_looping: true,
            custom: None,
        }
    }
}

impl BuzzerConfig {
    /// Check if the header matches this firmware's format
    pub fn is_valid(&self) -> bool {
        self.magic == CONFIG_MAGIC && self.version == CONFIG_VERSION
    }

    /// Look up a pattern by id
    ///
    /// Returns `None` for [`PatternId::Custom`] when no custom pattern is
    /// configured.
    pub fn resolve(&self, id: PatternId) -> Option<Pattern<'_>> {
        match id {
            PatternId::Custom => self.custom.as_ref().map(CustomPattern::pattern),
            _ => id.builtin(),
        }
    }

    /// Pattern used for alarms
    pub fn alarm_pattern(&self) -> Option<Pattern<'_>> {
        self.resolve(self.alarm)
    }

    /// Serialize into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_bytes<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and check a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

        if !config.is_valid() {
            return Err(ConfigError::InvalidFormat);
        }

        if let Some(custom) = &config.custom {
            custom.validate()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Tone;

    #[test]
    fn test_defaults() {
        let config = BuzzerConfig::default();
        assert!(config.is_valid());
        assert!(config.enabled);
        assert_eq!(config.alarm_pattern(), PatternId::Alarm.builtin());
    }

    #[test]
    fn test_custom_pattern_gets_terminator() {
        let custom = CustomPattern::new(
            "Cuckoo",
            &[Step::tone(800, 100), Step::rest(50), Step::tone(600, 200)],
        )
        .unwrap();

        assert_eq!(custom.steps.len(), 4);
        assert_eq!(custom.steps.last(), Some(&Step::END));
        assert_eq!(custom.pattern().len(), 3);
    }

    #[test]
    fn test_custom_pattern_rejects_bad_tables() {
        assert_eq!(
            CustomPattern::new("Empty", &[]),
            Err(ConfigError::Pattern(PatternError::NoSteps))
        );
        assert_eq!(
            CustomPattern::new("Split", &[Step::tone(800, 10), Step::END, Step::tone(600, 10)]),
            Err(ConfigError::Pattern(PatternError::EarlyTerminator { index: 1 }))
        );
        assert_eq!(
            CustomPattern::new("A label that is far too long", &[Step::tone(800, 10)]),
            Err(ConfigError::LabelTooLong)
        );
        assert_eq!(
            CustomPattern::new("Long", &[Step::tone(800, 10); MAX_CUSTOM_STEPS]),
            Err(ConfigError::TooManySteps)
        );
    }

    #[test]
    fn test_resolve_custom() {
        let mut config = BuzzerConfig::default();
        assert_eq!(config.resolve(PatternId::Custom), None);

        config.custom = Some(CustomPattern::new("Mine", &[Step::tone(1234, 10)]).unwrap());
        let pattern = config.resolve(PatternId::Custom).unwrap();
        assert_eq!(pattern.step(0).map(|s| s.tone), Some(Tone::full(1234)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_persistence() {
        let config = BuzzerConfig {
            volume_percent: 35,
            alarm: PatternId::Custom,
            custom: Some(CustomPattern::new("Mine", &[Step::tone(1234, 10)]).unwrap()),
            ..BuzzerConfig::default()
        };

        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let bytes = config.to_bytes(&mut buf).unwrap();
        let loaded = BuzzerConfig::from_bytes(bytes).unwrap();

        assert_eq!(loaded, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_persistence_rejects_foreign_data() {
        let config = BuzzerConfig {
            magic: 0xDEAD_BEEF,
            ..BuzzerConfig::default()
        };

        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let bytes = config.to_bytes(&mut buf).unwrap();

        assert_eq!(
            BuzzerConfig::from_bytes(bytes),
            Err(ConfigError::InvalidFormat)
        );
        assert_eq!(
            BuzzerConfig::from_bytes(&[0xFF; 3]),
            Err(ConfigError::Deserialize)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_persistence_rejects_broken_custom_pattern() {
        let mut custom = CustomPattern::new("Mine", &[Step::tone(1234, 10)]).unwrap();
        custom.steps.pop();
        let config = BuzzerConfig {
            custom: Some(custom),
            ..BuzzerConfig::default()
        };

        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let bytes = config.to_bytes(&mut buf).unwrap();

        assert_eq!(
            BuzzerConfig::from_bytes(bytes),
            Err(ConfigError::Pattern(PatternError::MissingTerminator))
        );
    }
}
