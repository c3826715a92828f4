//! Sella Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. This keeps the application code portable across
//! controller boards.
//!
//! # Traits
//!
//! - [`flash::FlashStore`] - Persistent key-value storage for presets
//!   and calibration

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStore, StoreKey, MAX_KEY_LEN};
