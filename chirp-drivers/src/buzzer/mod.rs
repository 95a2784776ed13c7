//! Buzzer drivers
//!
//! Both drivers implement [`chirp_core::traits::ToneSink`]:
//!
//! - Passive piezo: PWM frequency + duty cycle
//! - Active buzzer: GPIO on/off

pub mod active;
pub mod passive;

pub use active::ActiveBuzzer;
pub use passive::{PassiveBuzzer, PassiveBuzzerConfig};
