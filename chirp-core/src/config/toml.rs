//! Simple TOML parser for the buzzer configuration
//!
//! This is a minimal parser for the subset of TOML used by `buzzer.toml`.
//! It does NOT support the full TOML spec and needs no allocator.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - `[buzzer]`, `[hardware]` and `[pattern.custom]` section headers
//! - Inline tables for steps: steps = [{ hz = 800, ms = 100 }, { ms = 50 }]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Escapes inside strings
//! - Dotted keys outside section headers

use heapless::{String, Vec};

use super::buzzer::{BuzzerConfig, ConfigError, CustomPattern, MAX_CUSTOM_STEPS, MAX_LABEL_LEN};
use super::hardware::{BuzzerHwConfig, BuzzerKind, PinConfig};
use crate::sequencer::{PatternId, Step};
use crate::traits::{Tone, MAX_INTENSITY};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
    /// Parsed values were rejected
    Config(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Config(e)
    }
}

/// Everything a `buzzer.toml` describes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareConfig {
    /// User settings
    pub buzzer: BuzzerConfig,
    /// Board wiring
    pub hardware: BuzzerHwConfig,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Buzzer,
    Hardware,
    Custom,
}

/// Custom pattern being assembled
#[derive(Default)]
struct PendingPattern {
    label: String<MAX_LABEL_LEN>,
    steps: Vec<Step, MAX_CUSTOM_STEPS>,
}

/// Parse TOML configuration
///
/// Keys and sections that are not recognized are ignored; values that are
/// recognized but malformed are errors.
pub fn parse_config(input: &str) -> Result<FirmwareConfig, ParseError> {
    let mut config = FirmwareConfig::default();
    let mut section = Section::Root;
    let mut custom: Option<PendingPattern> = None;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            if section == Section::Custom {
                custom = Some(PendingPattern::default());
            }
            continue;
        }

        if let Some((key, value)) = split_entry(line) {
            apply_value(section, key, value, &mut config, custom.as_mut())?;
        }
    }

    if let Some(pending) = custom {
        let pattern = CustomPattern::new(&pending.label, &pending.steps)?;
        config.buzzer.custom = Some(pattern);
    }

    Ok(config)
}

/// Parse section header like "buzzer" or "pattern.custom"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "buzzer" => Ok(Section::Buzzer),
        "hardware" | "buzzer.hardware" => Ok(Section::Hardware),
        "pattern.custom" => Ok(Section::Custom),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split a `key = value` entry, dropping any trailing comment
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value).trim();

    (!key.is_empty() && !value.is_empty()).then_some((key, value))
}

/// Cut a value at the first `#` that is outside a quoted string
fn strip_comment(value: &str) -> &str {
    let mut quoted = false;
    for (i, c) in value.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '#' if !quoted => return &value[..i],
            _ => {}
        }
    }
    value
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse a decimal number into whatever width the field has
fn parse_number<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse::<T>().or(Err(ParseError::InvalidValue))
}

/// Parse `true` / `false`
fn parse_flag(value: &str) -> Result<bool, ParseError> {
    value.parse::<bool>().or(Err(ParseError::InvalidValue))
}

/// Parse a pin string like "gpio12" or "!gpio12"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let value = parse_string(value);
    let (inverted, s) = match value.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let pin: u8 = s
        .strip_prefix("gpio")
        .ok_or(ParseError::InvalidPin)?
        .parse()
        .map_err(|_| ParseError::InvalidPin)?;

    Ok(PinConfig { pin, inverted })
}

/// Parse buzzer kind
fn parse_kind(value: &str) -> Result<BuzzerKind, ParseError> {
    match parse_string(value) {
        "passive" | "Passive" => Ok(BuzzerKind::Passive),
        "active" | "Active" => Ok(BuzzerKind::Active),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pattern name
fn parse_pattern_id(value: &str) -> Result<PatternId, ParseError> {
    match parse_string(value) {
        "beep" => Ok(PatternId::Beep),
        "double_beep" => Ok(PatternId::DoubleBeep),
        "confirm" => Ok(PatternId::Confirm),
        "error" => Ok(PatternId::Error),
        "alarm" => Ok(PatternId::Alarm),
        "chime" => Ok(PatternId::Chime),
        "tick" => Ok(PatternId::Tick),
        "custom" => Ok(PatternId::Custom),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a percentage, rejecting values above 100
fn parse_percent(value: &str) -> Result<u8, ParseError> {
    let percent: u8 = parse_number(value)?;
    if percent > 100 {
        return Err(ParseError::InvalidValue);
    }
    Ok(percent)
}

/// Parse a steps array like [{ hz = 800, ms = 100 }, { ms = 50 }]
fn parse_steps(value: &str) -> Result<Vec<Step, MAX_CUSTOM_STEPS>, ParseError> {
    let mut steps = Vec::new();

    // Remove outer brackets
    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Err(ParseError::InvalidValue);
    }
    let inner = &value[1..value.len() - 1];

    let mut depth = 0;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(ParseError::InvalidValue);
                }
                depth -= 1;
                if depth == 0 {
                    let step = parse_single_step(&inner[start..=i])?;
                    steps.push(step).map_err(|_| ParseError::TooManyItems)?;
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::InvalidValue);
    }

    Ok(steps)
}

/// Parse a single step like { hz = 800, ms = 100, intensity = 60 }
///
/// A step without `hz` is a rest.
fn parse_single_step(s: &str) -> Result<Step, ParseError> {
    let inner = &s[1..s.len() - 1];

    let mut hz: u16 = 0;
    let mut intensity = MAX_INTENSITY;
    let mut ms: Option<u32> = None;

    for part in inner.split(',') {
        if let Some((key, value)) = split_entry(part.trim()) {
            match key {
                "hz" => hz = parse_number(value)?,
                "ms" => ms = Some(parse_number(value)?),
                "intensity" => intensity = parse_percent(value)?,
                _ => {}
            }
        }
    }

    let ms = ms.ok_or(ParseError::InvalidValue)?;
    if hz == 0 {
        // A zero-length rest would read as the end marker
        return match ms {
            0 => Err(ParseError::InvalidValue),
            _ => Ok(Step::rest(ms)),
        };
    }

    Ok(Step::new(Tone::new(hz, intensity), ms))
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut FirmwareConfig,
    custom: Option<&mut PendingPattern>,
) -> Result<(), ParseError> {
    match section {
        Section::Buzzer => {
            let b = &mut config.buzzer;
            match key {
                "enabled" => b.enabled = parse_flag(value)?,
                "volume" | "volume_percent" => b.volume_percent = parse_percent(value)?,
                "alarm" => b.alarm = parse_pattern_id(value)?,
                "alarm_looping" => b.alarm_looping = parse_flag(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Hardware => {
            let h = &mut config.hardware;
            match key {
                "pin" => h.pin = parse_pin(value)?,
                "kind" | "type" => h.kind = parse_kind(value)?,
                "min_frequency_hz" => h.min_frequency_hz = parse_number(value)?,
                "max_frequency_hz" => h.max_frequency_hz = parse_number(value)?,
                _ => {}
            }
        }
        Section::Custom => {
            let p = custom.ok_or(ParseError::InvalidSection)?;
            match key {
                "label" => {
                    p.label = String::try_from(parse_string(value))
                        .map_err(|_| ParseError::Config(ConfigError::LabelTooLong))?;
                }
                "steps" => p.steps = parse_steps(value)?,
                _ => {}
            }
        }
        Section::Root => {
            // No root-level keys
        }
    }

    Ok(())
}
