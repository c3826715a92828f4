//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in sella-core for the seating unit's hardware:
//!
//! - Relay outputs driving the two linear actuators
//! - MPU6050 accelerometers for backrest and seat-pan orientation

#![no_std]
#![deny(unsafe_code)]

pub mod accel;
pub mod relay;
