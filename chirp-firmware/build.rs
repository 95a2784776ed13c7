//! Build script for chirp-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates buzzer.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pattern names understood by the firmware
const PATTERN_NAMES: &[&str] = &[
    "beep",
    "double_beep",
    "confirm",
    "error",
    "alarm",
    "chime",
    "tick",
    "custom",
];

/// Custom pattern capacity, terminator excluded
const MAX_CUSTOM_STEPS: usize = 15;

/// Custom pattern label capacity
const MAX_LABEL_LEN: usize = 16;

/// Lowest tone the PWM slice can produce (see `pwm::MIN_FREQUENCY_HZ`)
const MIN_PWM_FREQUENCY_HZ: i64 = 30;

/// Longest step the sequencer can time (`u32::MAX / 2` ms)
const MAX_STEP_MS: i64 = (u32::MAX / 2) as i64;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate buzzer.toml configuration at compile time
fn validate_config() {
    // Re-run if buzzer.toml changes
    println!("cargo:rerun-if-changed=buzzer.toml");

    let config_path = Path::new("buzzer.toml");

    if !config_path.exists() {
        fail(
            "ERROR: buzzer.toml not found!",
            &["The firmware embeds buzzer.toml from the chirp-firmware directory."],
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("ERROR: Failed to read buzzer.toml", &[&e.to_string()]),
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("ERROR: Invalid TOML syntax in buzzer.toml", &lines);
        }
    };

    let mut errors = Vec::new();
    validate_buzzer(&config, &mut errors);
    validate_hardware(&config, &mut errors);
    validate_custom_pattern(&config, &mut errors);

    if !errors.is_empty() {
        let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
        fail("ERROR: Invalid configuration in buzzer.toml", &lines);
    }

    println!("cargo:warning=buzzer.toml validated successfully");
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[&str]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  {:<64} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check an optional integer key against a range
fn check_range(
    table: &toml::Table,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if range.contains(v) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        )),
    }
}

/// Check an optional boolean key
fn check_bool(table: &toml::Table, section: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(v) = table.get(key) {
        if !v.is_bool() {
            errors.push(format!("[{}] {} must be true or false", section, key));
        }
    }
}

/// Validate the [buzzer] section
fn validate_buzzer(config: &toml::Value, errors: &mut Vec<String>) {
    let buzzer = match config.get("buzzer") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[buzzer] must be a table".to_string());
            return;
        }
        None => return,
    };

    check_bool(buzzer, "buzzer", "enabled", errors);
    check_bool(buzzer, "buzzer", "alarm_looping", errors);
    check_range(buzzer, "buzzer", "volume", 0..=100, errors);

    if let Some(alarm) = buzzer.get("alarm") {
        match alarm.as_str() {
            Some(name) if PATTERN_NAMES.contains(&name) => {
                if name == "custom" && custom_section(config).is_none() {
                    errors.push("[buzzer] alarm = \"custom\" needs [pattern.custom]".to_string());
                }
            }
            _ => errors.push(format!(
                "[buzzer] alarm must be one of: {}",
                PATTERN_NAMES.join(", ")
            )),
        }
    }
}

/// Validate the [hardware] section
fn validate_hardware(config: &toml::Value, errors: &mut Vec<String>) {
    let hw = match config.get("hardware") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[hardware] must be a table".to_string());
            return;
        }
        None => return,
    };

    if let Some(pin) = hw.get("pin") {
        let valid = pin
            .as_str()
            .map(|s| s.strip_prefix('!').unwrap_or(s))
            .and_then(|s| s.strip_prefix("gpio"))
            .and_then(|n| n.parse::<u8>().ok())
            .is_some_and(|n| n <= 29);
        if !valid {
            errors.push("[hardware] pin must look like \"gpio12\" or \"!gpio12\"".to_string());
        }
    }

    if let Some(kind) = hw.get("kind") {
        if !matches!(kind.as_str(), Some("passive" | "active")) {
            errors.push("[hardware] kind must be 'passive' or 'active'".to_string());
        }
    }

    check_range(hw, "hardware", "min_frequency_hz", MIN_PWM_FREQUENCY_HZ..=65535, errors);
    check_range(hw, "hardware", "max_frequency_hz", MIN_PWM_FREQUENCY_HZ..=65535, errors);

    if let (Some(min), Some(max)) = (
        hw.get("min_frequency_hz").and_then(toml::Value::as_integer),
        hw.get("max_frequency_hz").and_then(toml::Value::as_integer),
    ) {
        if min > max {
            errors.push("[hardware] min_frequency_hz is above max_frequency_hz".to_string());
        }
    }
}

/// Find the [pattern.custom] table
fn custom_section(config: &toml::Value) -> Option<&toml::Value> {
    config.get("pattern").and_then(|p| p.get("custom"))
}

/// Validate the [pattern.custom] section
fn validate_custom_pattern(config: &toml::Value, errors: &mut Vec<String>) {
    let custom = match custom_section(config) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[pattern.custom] must be a table".to_string());
            return;
        }
        None => return,
    };

    if let Some(label) = custom.get("label") {
        match label.as_str() {
            Some(s) if s.len() <= MAX_LABEL_LEN => {}
            _ => errors.push(format!(
                "[pattern.custom] label must be a string of at most {} bytes",
                MAX_LABEL_LEN
            )),
        }
    }

    let steps = match custom.get("steps") {
        Some(toml::Value::Array(steps)) => steps,
        Some(_) => {
            errors.push("[pattern.custom] steps must be an array".to_string());
            return;
        }
        None => {
            errors.push("[pattern.custom] missing 'steps'".to_string());
            return;
        }
    };

    if steps.is_empty() {
        errors.push("[pattern.custom] steps cannot be empty".to_string());
    }
    if steps.len() > MAX_CUSTOM_STEPS {
        errors.push(format!(
            "[pattern.custom] at most {} steps are supported",
            MAX_CUSTOM_STEPS
        ));
    }

    for (i, step) in steps.iter().enumerate() {
        let step = match step.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[pattern.custom] step {} must be a table", i));
                continue;
            }
        };

        let section = format!("pattern.custom step {}", i);
        check_range(step, &section, "hz", 0..=65535, errors);
        check_range(step, &section, "intensity", 0..=100, errors);

        match step.get("ms").and_then(toml::Value::as_integer) {
            Some(ms) if ms > 0 && ms <= MAX_STEP_MS => {}
            Some(0) if step.get("hz").and_then(toml::Value::as_integer).unwrap_or(0) != 0 => {}
            _ => errors.push(format!(
                "[pattern.custom] step {} needs 'ms' between 1 and {}",
                i, MAX_STEP_MS
            )),
        }
    }
}
