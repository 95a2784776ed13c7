//! Configuration loading
//!
//! The firmware embeds `buzzer.toml` at build time (build.rs has already
//! checked it). Parse failures fall back to the built-in defaults.

use defmt::*;

use chirp_core::config::{parse_config, FirmwareConfig};

/// Embedded configuration (compiled into firmware)
/// Edit buzzer.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../buzzer.toml");

/// Load the embedded configuration, or defaults if it does not parse
pub fn load_config() -> FirmwareConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded configuration from buzzer.toml");
            log_config_summary(&config);
            config
        }
        Err(e) => {
            warn!("buzzer.toml parse error: {:?}, using defaults", e);
            FirmwareConfig::default()
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &FirmwareConfig) {
    let buzzer = &config.buzzer;
    let hw = &config.hardware;

    debug!(
        "  buzzer: enabled={}, volume={}%, alarm={} (looping={})",
        buzzer.enabled,
        buzzer.volume_percent,
        buzzer.alarm.label(),
        buzzer.alarm_looping
    );
    debug!(
        "  hardware: gpio{} inverted={} kind={:?} range={}-{} Hz",
        hw.pin.pin, hw.pin.inverted, hw.kind, hw.min_frequency_hz, hw.max_frequency_hz
    );
    if let Some(custom) = &buzzer.custom {
        debug!(
            "  custom pattern '{}': {} steps, {} ms",
            custom.label.as_str(),
            custom.pattern().len(),
            custom.pattern().total_duration_ms()
        );
    }
}
