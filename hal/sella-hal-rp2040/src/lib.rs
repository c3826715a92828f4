//! RP2040 implementation of the Sella HAL
//!
//! Implements the `sella-hal` traits on top of embassy-rp.

#![no_std]

pub mod flash;

pub use flash::Rp2040FlashStore;
