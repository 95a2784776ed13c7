//! Passive piezo buzzer driver
//!
//! A bare piezo element sounds at whatever frequency it is driven with.
//! This driver sets the PWM period from the tone frequency and the duty
//! cycle from the tone intensity and the configured volume.
//!
//! A piezo is loudest at 50% duty, so full intensity at full volume maps to
//! half of the PWM's duty range.
//!
//! ```ignore
//! let buzzer = PassiveBuzzer::new(pwm, PassiveBuzzerConfig::default());
//! let mut sequencer = PatternSequencer::new(buzzer);
//! ```

use embedded_hal::pwm::SetDutyCycle;

use chirp_core::config::{BuzzerHwConfig, DEFAULT_MAX_FREQUENCY_HZ, DEFAULT_MIN_FREQUENCY_HZ};
use chirp_core::traits::{BuzzerError, FrequencyControl, Tone, ToneSink, MAX_INTENSITY};

/// Passive buzzer configuration
#[derive(Debug, Clone)]
pub struct PassiveBuzzerConfig {
    /// Output volume (0-100%)
    pub volume_percent: u8,
    /// Lowest frequency passed to the PWM
    pub min_frequency_hz: u16,
    /// Highest frequency passed to the PWM
    pub max_frequency_hz: u16,
}

impl Default for PassiveBuzzerConfig {
    fn default() -> Self {
        Self {
            volume_percent: 100,
            min_frequency_hz: DEFAULT_MIN_FREQUENCY_HZ,
            max_frequency_hz: DEFAULT_MAX_FREQUENCY_HZ,
        }
    }
}

impl PassiveBuzzerConfig {
    /// Build from the board description and the user's volume setting
    pub fn from_hw(hw: &BuzzerHwConfig, volume_percent: u8) -> Self {
        Self {
            volume_percent,
            min_frequency_hz: hw.min_frequency_hz,
            max_frequency_hz: hw.max_frequency_hz,
        }
    }
}

/// PWM-driven passive buzzer
pub struct PassiveBuzzer<P> {
    pwm: P,
    config: PassiveBuzzerConfig,
    /// Last tone applied
    current: Tone,
    /// Frequency the PWM is currently set to (0 = never set)
    frequency_hz: u32,
    last_error: Option<BuzzerError>,
}

impl<P: SetDutyCycle + FrequencyControl> PassiveBuzzer<P> {
    /// Create a new buzzer driver; the output starts silent
    pub fn new(pwm: P, config: PassiveBuzzerConfig) -> Self {
        let mut buzzer = Self {
            pwm,
            config,
            current: Tone::SILENT,
            frequency_hz: 0,
            last_error: None,
        };
        buzzer.silence();
        buzzer
    }

    /// Get the configuration
    pub fn config(&self) -> &PassiveBuzzerConfig {
        &self.config
    }

    /// Change the volume; takes effect on the next tone
    pub fn set_volume(&mut self, percent: u8) {
        self.config.volume_percent = percent.min(100);
    }

    /// Last tone applied
    pub fn current(&self) -> Tone {
        self.current
    }

    /// Frequency the PWM was last configured for
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Most recent hardware fault, if any
    pub fn last_error(&self) -> Option<BuzzerError> {
        self.last_error
    }

    /// Forget the recorded fault
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Release the PWM channel
    pub fn release(self) -> P {
        self.pwm
    }

    /// Clamp a frequency to the configured range
    fn clamp_frequency(&self, hz: u16) -> u32 {
        let max = self.config.max_frequency_hz.max(self.config.min_frequency_hz);
        hz.clamp(self.config.min_frequency_hz, max) as u32
    }

    /// Duty cycle for an intensity at the current volume
    ///
    /// Must be computed after the frequency is set, since changing the
    /// period can change the duty range.
    fn duty_for(&self, intensity: u8) -> u16 {
        let half = self.pwm.max_duty_cycle() as u32 / 2;
        let intensity = intensity.min(MAX_INTENSITY) as u32;
        let volume = self.config.volume_percent.min(100) as u32;
        (half * intensity * volume / (MAX_INTENSITY as u32 * 100)) as u16
    }

    fn try_apply(&mut self, tone: Tone) -> Result<(), BuzzerError> {
        if tone.is_silent() || self.config.volume_percent == 0 {
            return self
                .pwm
                .set_duty_cycle_fully_off()
                .map_err(|_| BuzzerError::Pwm);
        }

        let hz = self.clamp_frequency(tone.frequency_hz);
        if hz != self.frequency_hz {
            if let Err(e) = self.pwm.set_frequency_hz(hz) {
                // Never keep sounding the previous tone
                let _ = self.pwm.set_duty_cycle_fully_off();
                return Err(e);
            }
            self.frequency_hz = hz;
        }

        let duty = self.duty_for(tone.intensity);
        self.pwm.set_duty_cycle(duty).map_err(|_| BuzzerError::Pwm)
    }
}

impl<P: SetDutyCycle + FrequencyControl> ToneSink for PassiveBuzzer<P> {
    fn apply(&mut self, tone: Tone) {
        self.current = tone;
        if let Err(e) = self.try_apply(tone) {
            self.last_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::pwm::{ErrorKind, ErrorType};

    /// Mock PWM channel: duty range follows the period like a real timer
    struct MockPwm {
        base_hz: u32,
        top: u16,
        duty: u16,
        frequency_hz: u32,
        frequency_changes: u32,
        fail_duty: bool,
    }

    impl MockPwm {
        fn new() -> Self {
            Self {
                base_hz: 2_000_000,
                top: 1000,
                duty: 123,
                frequency_hz: 0,
                frequency_changes: 0,
                fail_duty: false,
            }
        }
    }

    impl ErrorType for MockPwm {
        type Error = ErrorKind;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.top
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            if self.fail_duty {
                return Err(ErrorKind::Other);
            }
            self.duty = duty;
            Ok(())
        }
    }

    impl FrequencyControl for MockPwm {
        fn set_frequency_hz(&mut self, hz: u32) -> Result<(), BuzzerError> {
            let top = self.base_hz / hz;
            if top == 0 || top > u16::MAX as u32 {
                return Err(BuzzerError::FrequencyOutOfRange);
            }
            self.top = top as u16;
            self.frequency_hz = hz;
            self.frequency_changes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_starts_silent() {
        let buzzer = PassiveBuzzer::new(MockPwm::new(), PassiveBuzzerConfig::default());
        assert_eq!(buzzer.pwm.duty, 0);
        assert_eq!(buzzer.current(), Tone::SILENT);
    }

    #[test]
    fn test_full_tone_is_half_duty() {
        let mut buzzer = PassiveBuzzer::new(MockPwm::new(), PassiveBuzzerConfig::default());

        buzzer.apply(Tone::full(1000));

        // 2 MHz / 1 kHz = 2000 counts, half of that
        assert_eq!(buzzer.pwm.frequency_hz, 1000);
        assert_eq!(buzzer.pwm.top, 2000);
        assert_eq!(buzzer.pwm.duty, 1000);
        assert_eq!(buzzer.last_error(), None);
    }

    #[test]
    fn test_intensity_and_volume_scale_duty() {
        let config = PassiveBuzzerConfig {
            volume_percent: 50,
            ..PassiveBuzzerConfig::default()
        };
        let mut buzzer = PassiveBuzzer::new(MockPwm::new(), config);

        buzzer.apply(Tone::new(1000, 50));
        // 1000 * 50% * 50%
        assert_eq!(buzzer.pwm.duty, 250);

        // Intensity above 100% is clamped
        buzzer.apply(Tone::new(1000, 250));
        assert_eq!(buzzer.pwm.duty, 500);
    }

    #[test]
    fn test_silence_turns_duty_off() {
        let mut buzzer = PassiveBuzzer::new(MockPwm::new(), PassiveBuzzerConfig::default());

        buzzer.apply(Tone::full(1000));
        buzzer.apply(Tone::new(0, 100));
        assert_eq!(buzzer.pwm.duty, 0);

        buzzer.apply(Tone::full(1000));
        buzzer.set_volume(0);
        buzzer.apply(Tone::full(1000));
        assert_eq!(buzzer.pwm.duty, 0);
    }

    #[test]
    fn test_frequency_only_reprogrammed_on_change() {
        let mut buzzer = PassiveBuzzer::new(MockPwm::new(), PassiveBuzzerConfig::default());

        buzzer.apply(Tone::full(1000));
        buzzer.silence();
        buzzer.apply(Tone::new(1000, 40));
        assert_eq!(buzzer.pwm.frequency_changes, 1);

        buzzer.apply(Tone::full(2000));
        assert_eq!(buzzer.pwm.frequency_changes, 2);
        assert_eq!(buzzer.frequency_hz(), 2000);
    }

    #[test]
    fn test_frequency_is_clamped() {
        let mut buzzer = PassiveBuzzer::new(MockPwm::new(), PassiveBuzzerConfig::default());

        buzzer.apply(Tone::full(20));
        assert_eq!(buzzer.pwm.frequency_hz, DEFAULT_MIN_FREQUENCY_HZ as u32);

        buzzer.apply(Tone::full(30000));
        assert_eq!(buzzer.pwm.frequency_hz, DEFAULT_MAX_FREQUENCY_HZ as u32);
    }

    #[test]
    fn test_hardware_errors_are_recorded() {
        let config = PassiveBuzzerConfig {
            min_frequency_hz: 10,
            ..PassiveBuzzerConfig::default()
        };
        let mut buzzer = PassiveBuzzer::new(MockPwm::new(), config);

        // 2 MHz / 10 Hz does not fit the 16-bit counter
        buzzer.apply(Tone::full(10));
        assert_eq!(buzzer.last_error(), Some(BuzzerError::FrequencyOutOfRange));
        assert_eq!(buzzer.current(), Tone::full(10));

        buzzer.clear_error();
        buzzer.pwm.fail_duty = true;
        buzzer.apply(Tone::full(1000));
        assert_eq!(buzzer.last_error(), Some(BuzzerError::Pwm));
    }

    #[test]
    fn test_unplayable_tone_goes_silent() {
        let config = PassiveBuzzerConfig {
            min_frequency_hz: 10,
            ..PassiveBuzzerConfig::default()
        };
        let mut buzzer = PassiveBuzzer::new(MockPwm::new(), config);

        buzzer.apply(Tone::full(1000));
        assert_eq!(buzzer.pwm.duty, 1000);

        // 2 MHz / 20 Hz overflows the counter; the 1 kHz tone must stop
        buzzer.apply(Tone::full(20));
        assert_eq!(buzzer.last_error(), Some(BuzzerError::FrequencyOutOfRange));
        assert_eq!(buzzer.pwm.duty, 0);
        assert_eq!(buzzer.frequency_hz(), 1000);

        // The next playable tone recovers
        buzzer.apply(Tone::full(2000));
        assert_eq!(buzzer.pwm.frequency_hz, 2000);
        assert_eq!(buzzer.pwm.duty, 500);
    }

    #[test]
    fn test_config_from_hw() {
        let hw = BuzzerHwConfig {
            min_frequency_hz: 300,
            max_frequency_hz: 4000,
            ..BuzzerHwConfig::default()
        };
        let config = PassiveBuzzerConfig::from_hw(&hw, 60);

        assert_eq!(config.volume_percent, 60);
        assert_eq!(config.min_frequency_hz, 300);
        assert_eq!(config.max_frequency_hz, 4000);
    }
}
