//! RP2040 PWM slice adapter for the passive buzzer
//!
//! Wraps an embassy-rp [`Pwm`] channel A so the buzzer driver can change
//! both the period (tone frequency) and the compare value (loudness).
//!
//! The slice counter runs at SYS_CLK / [`PWM_DIVIDER`]. For a tone of
//! `hz` the counter wraps at `top = counter_hz / hz - 1`, which covers
//! roughly 30 Hz to 20 kHz with a 16-bit counter.

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};

use chirp_core::traits::{BuzzerError, FrequencyControl};

/// RP2040 system clock with the default clock setup
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// Integer clock divider for the buzzer slice
pub const PWM_DIVIDER: u8 = 64;

/// Counter frequency after the divider
const COUNTER_HZ: u32 = SYS_CLK_HZ / PWM_DIVIDER as u32;

/// Lowest tone whose period fits the 16-bit counter
pub const MIN_FREQUENCY_HZ: u32 = COUNTER_HZ / (u16::MAX as u32 + 1) + 1;

/// Wrap value for a tone frequency
pub fn top_for_frequency(hz: u32) -> Result<u16, BuzzerError> {
    if hz == 0 {
        return Err(BuzzerError::FrequencyOutOfRange);
    }

    let top = (COUNTER_HZ / hz).saturating_sub(1);
    if top == 0 || top > u16::MAX as u32 {
        return Err(BuzzerError::FrequencyOutOfRange);
    }

    Ok(top as u16)
}

/// Buzzer PWM output on channel A of one slice
pub struct BuzzerPwm {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl BuzzerPwm {
    /// Take over a PWM slice; the output starts at 0% duty
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.divider = PWM_DIVIDER.into();
        config.top = u16::MAX;
        config.compare_a = 0;
        pwm.set_config(&config);

        Self { pwm, config }
    }
}

impl ErrorType for BuzzerPwm {
    type Error = ErrorKind;
}

impl SetDutyCycle for BuzzerPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.config.top
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.config.compare_a = duty.min(self.config.top);
        self.pwm.set_config(&self.config);
        Ok(())
    }
}

impl FrequencyControl for BuzzerPwm {
    fn set_frequency_hz(&mut self, hz: u32) -> Result<(), BuzzerError> {
        self.config.top = top_for_frequency(hz)?;
        // The caller sets a duty for the new period right after
        self.config.compare_a = 0;
        self.pwm.set_config(&self.config);
        Ok(())
    }
}
