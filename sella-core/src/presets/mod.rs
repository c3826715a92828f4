//! Preset ownership and flash key scheme
//!
//! Presets are scoped by an owner key derived from the connected client's
//! identity: a base-31 polynomial hash over the identity bytes, rendered as
//! eight lowercase hex digits. A session without an identity falls back to
//! the literal owner `"unknown"`. The hash is not cryptographic; distinct
//! identities can collide and share a preset namespace. The key layout is
//! load-bearing for already-persisted data and must not change.

use core::fmt::Write;

use heapless::String;

/// Lowest valid preset slot
pub const MIN_SLOT: u8 = 1;
/// Highest valid preset slot
pub const MAX_SLOT: u8 = 3;

/// Owner token used when the client identity is unknown
pub const UNKNOWN_OWNER: &str = "unknown";

/// Flash keys for the sampler calibration offsets
pub const CALIB_BACK_KEY: &str = "calib_r1";
pub const CALIB_SEAT_KEY: &str = "calib_r2";

/// Maximum owner token length (8 hex digits, or "unknown")
pub const MAX_OWNER_LEN: usize = 8;
/// Maximum rendered flash key length ("<owner>_r1_<slot>")
pub const MAX_KEY_LEN: usize = 16;

/// Owner token: 8 hex digits or the unknown fallback
pub type OwnerKey = String<MAX_OWNER_LEN>;
/// Rendered flash key
pub type PresetKey = String<MAX_KEY_LEN>;

/// The two persisted target angles of a preset slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TargetField {
    /// Backrest target (`_r1_` keys)
    Back,
    /// Seat target (`_r2_` keys)
    Seat,
}

impl TargetField {
    fn infix(self) -> &'static str {
        match self {
            TargetField::Back => "_r1_",
            TargetField::Seat => "_r2_",
        }
    }
}

/// Clamp a requested slot into the valid [1,3] range
pub fn clamp_slot(slot: u8) -> u8 {
    slot.clamp(MIN_SLOT, MAX_SLOT)
}

/// Derive the owner token for a client identity
pub fn owner_key(identity: Option<&str>) -> OwnerKey {
    let mut key = OwnerKey::new();

    let Some(identity) = identity else {
        let _ = key.push_str(UNKNOWN_OWNER);
        return key;
    };

    let mut hash: u32 = 0;
    for byte in identity.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(byte as u32);
    }

    // Fixed-width lowercase hex, most significant nibble first
    for shift in (0..8).rev() {
        let nibble = ((hash >> (shift * 4)) & 0xF) as u8;
        let digit = match nibble {
            0..=9 => b'0' + nibble,
            _ => b'a' + nibble - 10,
        };
        let _ = key.push(digit as char);
    }

    key
}

/// Render the flash key for one target angle of a preset slot
pub fn target_key(owner: &str, field: TargetField, slot: u8) -> PresetKey {
    let mut key = PresetKey::new();
    let _ = write!(key, "{}{}{}", owner, field.infix(), clamp_slot(slot));
    key
}
