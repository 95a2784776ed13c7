//! Buzzer output traits
//!
//! The sequencer talks to the outside world through [`ToneSink`]. Drivers
//! implement it on top of whatever the buzzer hardware offers: a PWM
//! channel with adjustable frequency for a passive piezo, or a plain GPIO
//! for a self-oscillating buzzer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum meaningful intensity (percent)
pub const MAX_INTENSITY: u8 = 100;

/// Output parameters for a single buzzer command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tone {
    /// Tone frequency in Hz (0 = silent)
    pub frequency_hz: u16,
    /// Loudness in percent (0 = silent, 100 = full)
    pub intensity: u8,
}

impl Tone {
    /// Zero frequency and zero intensity
    pub const SILENT: Self = Self {
        frequency_hz: 0,
        intensity: 0,
    };

    /// Create a tone
    pub const fn new(frequency_hz: u16, intensity: u8) -> Self {
        Self {
            frequency_hz,
            intensity,
        }
    }

    /// Create a tone at full intensity
    pub const fn full(frequency_hz: u16) -> Self {
        Self::new(frequency_hz, MAX_INTENSITY)
    }

    /// Check if this tone produces no sound
    pub const fn is_silent(&self) -> bool {
        self.frequency_hz == 0 || self.intensity == 0
    }
}

/// Errors reported by buzzer hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerError {
    /// PWM peripheral rejected the duty cycle
    Pwm,
    /// GPIO write failed
    Pin,
    /// Requested frequency cannot be generated
    FrequencyOutOfRange,
}

/// Consumer of tone commands
///
/// `apply` is expected to take effect immediately relative to the polling
/// cadence of the caller. It cannot fail: drivers keep track of hardware
/// faults on their own.
pub trait ToneSink {
    /// Apply a tone to the output
    fn apply(&mut self, tone: Tone);

    /// Silence the output
    fn silence(&mut self) {
        self.apply(Tone::SILENT);
    }
}

impl<T: ToneSink + ?Sized> ToneSink for &mut T {
    fn apply(&mut self, tone: Tone) {
        (**self).apply(tone);
    }

    fn silence(&mut self) {
        (**self).silence();
    }
}

/// Hardware that can change the PWM output frequency
///
/// Duty cycle control comes from `embedded_hal::pwm::SetDutyCycle`;
/// embedded-hal has no frequency trait, so drivers combine the two.
pub trait FrequencyControl {
    /// Reconfigure the PWM period for the given frequency
    fn set_frequency_hz(&mut self, hz: u32) -> Result<(), BuzzerError>;
}
