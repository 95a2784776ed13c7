//! Buzzer task
//!
//! Owns the pattern sequencer and the buzzer output. Commands arrive on
//! [`BUZZER_CMD`]; while a pattern plays the sequencer is polled every
//! millisecond, and while idle the task sleeps until the next command.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Instant, Ticker};

use chirp_core::config::BuzzerConfig;
use chirp_core::sequencer::{dispatch, BuzzerCommand, PatternSequencer};
use chirp_core::traits::{BuzzerError, Tone, ToneSink};
use chirp_drivers::buzzer::{ActiveBuzzer, PassiveBuzzer};

use crate::channels::BUZZER_CMD;
use crate::pwm::BuzzerPwm;

/// Sequencer poll interval
pub const POLL_INTERVAL_MS: u64 = 1;

/// Buzzer fitted to the board
pub enum BuzzerOutput {
    /// Piezo on a PWM slice
    Passive(PassiveBuzzer<BuzzerPwm>),
    /// Self-oscillating buzzer on a GPIO
    Active(ActiveBuzzer<Output<'static>>),
}

impl BuzzerOutput {
    /// Take the most recent hardware fault, if any
    fn take_error(&mut self) -> Option<BuzzerError> {
        match self {
            BuzzerOutput::Passive(b) => {
                let e = b.last_error();
                b.clear_error();
                e
            }
            BuzzerOutput::Active(b) => {
                let e = b.last_error();
                b.clear_error();
                e
            }
        }
    }
}

impl ToneSink for BuzzerOutput {
    fn apply(&mut self, tone: Tone) {
        match self {
            BuzzerOutput::Passive(b) => b.apply(tone),
            BuzzerOutput::Active(b) => b.apply(tone),
        }
    }
}

/// Milliseconds since boot on the sequencer's wrapping clock
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Apply one command, logging what happened
fn handle_command(
    sequencer: &mut PatternSequencer<'static, BuzzerOutput>,
    config: &'static BuzzerConfig,
    cmd: BuzzerCommand,
) {
    trace!("Buzzer command: {:?}", cmd);
    if dispatch(sequencer, config, cmd, now_ms()) {
        debug!("Buzzer state: {:?}", sequencer.state());
    } else {
        debug!("Buzzer command ignored: {:?}", cmd);
    }
}

/// Buzzer control task
#[embassy_executor::task]
pub async fn buzzer_task(output: BuzzerOutput, config: &'static BuzzerConfig) {
    info!(
        "Buzzer task started (enabled={}, volume={}%)",
        config.enabled, config.volume_percent
    );

    let mut sequencer = PatternSequencer::new(output);
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        if !sequencer.is_active() {
            // Nothing to poll; sleep until someone wants a sound
            let cmd = BUZZER_CMD.wait().await;
            handle_command(&mut sequencer, config, cmd);
            ticker.reset();
            continue;
        }

        ticker.next().await;

        // Check for new command (non-blocking)
        if let Some(cmd) = BUZZER_CMD.try_take() {
            handle_command(&mut sequencer, config, cmd);
        }

        sequencer.poll(now_ms());

        if !sequencer.is_active() {
            debug!("Buzzer pattern finished");
        }

        if let Some(e) = sequencer.sink_mut().take_error() {
            warn!("Buzzer output fault: {:?}", e);
        }
    }
}
