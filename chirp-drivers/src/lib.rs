//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in chirp-core on top of `embedded-hal` 1.0:
//!
//! - Passive piezo buzzer (PWM frequency and duty)
//! - Active buzzer (GPIO on/off)

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
