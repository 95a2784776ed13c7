//! Active buzzer output
//!
//! A buzzer with a built-in oscillator only knows on and off. Any audible
//! tone switches it on; frequency and intensity are ignored.

use embedded_hal::digital::{OutputPin, PinState};

use chirp_core::traits::{BuzzerError, Tone, ToneSink};

/// GPIO-driven active buzzer
///
/// The pin can be configured as active-high (default) or active-low.
pub struct ActiveBuzzer<P> {
    pin: P,
    /// If true, buzzer ON = pin LOW
    inverted: bool,
    /// Current logical state (true = sounding)
    on: bool,
    last_error: Option<BuzzerError>,
}

impl<P: OutputPin> ActiveBuzzer<P> {
    /// Create a new active buzzer output
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, buzzer sounds when pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut buzzer = Self {
            pin,
            inverted,
            on: false,
            last_error: None,
        };
        // Ensure buzzer starts quiet
        buzzer.set_on(false);
        buzzer
    }

    /// Create a new buzzer with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new buzzer with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Check if the buzzer is sounding
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Most recent hardware fault, if any
    pub fn last_error(&self) -> Option<BuzzerError> {
        self.last_error
    }

    /// Forget the recorded fault
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn set_on(&mut self, on: bool) {
        self.on = on;

        // on=true, inverted=false -> high; on=true, inverted=true -> low
        let level = PinState::from(on != self.inverted);
        if self.pin.set_state(level).is_err() {
            self.last_error = Some(BuzzerError::Pin);
        }
    }
}

impl<P: OutputPin> ToneSink for ActiveBuzzer<P> {
    fn apply(&mut self, tone: Tone) {
        self.set_on(!tone.is_silent());
    }
}
