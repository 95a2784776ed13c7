//! Hardware configuration types
//!
//! Describes how the buzzer is wired to the board.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lowest frequency a typical piezo reproduces usefully
pub const DEFAULT_MIN_FREQUENCY_HZ: u16 = 100;

/// Highest frequency a typical piezo reproduces usefully
pub const DEFAULT_MAX_FREQUENCY_HZ: u16 = 8000;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// Kind of buzzer fitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BuzzerKind {
    /// Bare piezo driven by PWM - frequency and volume are controllable
    #[default]
    Passive,
    /// Buzzer with built-in oscillator - on/off only
    Active,
}

/// Buzzer hardware configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuzzerHwConfig {
    /// Output pin
    pub pin: PinConfig,
    /// Buzzer type
    pub kind: BuzzerKind,
    /// Frequencies below this are raised to it
    pub min_frequency_hz: u16,
    /// Frequencies above this are lowered to it
    pub max_frequency_hz: u16,
}

impl Default for BuzzerHwConfig {
    fn default() -> Self {
        Self {
            pin: PinConfig::new(12),
            kind: BuzzerKind::Passive,
            min_frequency_hz: DEFAULT_MIN_FREQUENCY_HZ,
            max_frequency_hz: DEFAULT_MAX_FREQUENCY_HZ,
        }
    }
}

impl BuzzerHwConfig {
    /// Bring a frequency into the supported range
    ///
    /// Zero stays zero (silence).
    pub fn clamp_frequency(&self, hz: u16) -> u16 {
        if hz == 0 {
            0
        } else {
            hz.clamp(self.min_frequency_hz, self.max_frequency_hz.max(self.min_frequency_hz))
        }
    }
}
