//! Board-agnostic control logic for the Sella seating firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Tilt math and dual-sensor error fusion
//! - Auto-leveling state machine (banded/hysteretic, settle-delayed)
//! - Command arbitration (timed manual lock, save debounce)
//! - Preset ownership and flash key scheme
//! - Occupancy monitoring logic
//! - Hardware abstraction traits and tuning configuration

#![no_std]
#![deny(unsafe_code)]

pub mod arbiter;
pub mod config;
pub mod level;
pub mod occupancy;
pub mod presets;
pub mod tilt;
pub mod traits;
