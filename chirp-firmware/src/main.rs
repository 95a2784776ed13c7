//! Chirp - Buzzer Pattern Firmware
//!
//! Main firmware binary for RP2040-based boards with a piezo or active
//! buzzer. Other tasks request sounds through the `BUZZER_CMD` signal; the
//! buzzer task plays them without blocking anyone.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use chirp_core::config::{BuzzerKind, FirmwareConfig};
use chirp_core::sequencer::{BuzzerCommand, PatternId};
use chirp_drivers::buzzer::{ActiveBuzzer, PassiveBuzzer, PassiveBuzzerConfig};

use crate::channels::BUZZER_CMD;
use crate::pwm::BuzzerPwm;
use crate::tasks::BuzzerOutput;

mod channels;
mod config;
mod pwm;
mod tasks;

/// GPIO the buzzer is wired to (PWM slice 6, channel A)
const BUZZER_GPIO: u8 = 12;

// Configuration must live forever for the buzzer task to borrow patterns
static CONFIG: StaticCell<FirmwareConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Chirp firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static FirmwareConfig = CONFIG.init(config::load_config());
    let mut hw = config.hardware;

    if hw.pin.pin != BUZZER_GPIO {
        warn!(
            "buzzer.toml selects gpio{}, board is wired to gpio{}",
            hw.pin.pin, BUZZER_GPIO
        );
    }

    if u32::from(hw.min_frequency_hz) < pwm::MIN_FREQUENCY_HZ {
        warn!(
            "min_frequency_hz {} is below what the PWM can produce, using {}",
            hw.min_frequency_hz,
            pwm::MIN_FREQUENCY_HZ
        );
        hw.min_frequency_hz = pwm::MIN_FREQUENCY_HZ as u16;
    }

    let output = match hw.kind {
        BuzzerKind::Passive => {
            let pwm = Pwm::new_output_a(p.PWM_SLICE6, p.PIN_12, PwmConfig::default());
            let driver_config = PassiveBuzzerConfig::from_hw(&hw, config.buzzer.volume_percent);
            info!(
                "Passive buzzer on gpio{}, {}-{} Hz",
                BUZZER_GPIO, hw.min_frequency_hz, hw.max_frequency_hz
            );
            BuzzerOutput::Passive(PassiveBuzzer::new(BuzzerPwm::new(pwm), driver_config))
        }
        BuzzerKind::Active => {
            // Start at the pin's "off" level
            let pin = Output::new(p.PIN_12, Level::from(hw.pin.inverted));
            info!(
                "Active buzzer on gpio{} (inverted={})",
                BUZZER_GPIO, hw.pin.inverted
            );
            BuzzerOutput::Active(ActiveBuzzer::new(pin, hw.pin.inverted))
        }
    };

    spawner
        .spawn(tasks::buzzer_task(output, &config.buzzer))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Announce that the board is up
    BUZZER_CMD.signal(BuzzerCommand::once(PatternId::Confirm));
}
