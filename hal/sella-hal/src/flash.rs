//! Flash storage abstractions
//!
//! Provides a trait for persistent key-value storage that can be
//! implemented by chip-specific HALs using their flash memory.
//!
//! Entries are addressed by short ASCII keys (per-client preset keys
//! like `00000c21_r1_2`, calibration keys like `calib_r1`), so the key
//! type is a bounded string rather than a fixed enum.

use heapless::String;

/// Maximum length of a storage key in bytes
///
/// Preset keys are the longest: an 8 character owner hash, a 4
/// character field tag and a 1 character slot digit.
pub const MAX_KEY_LEN: usize = 16;

/// Storage key for preset and calibration records
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoreKey(String<MAX_KEY_LEN>);

impl StoreKey {
    /// Create a key from a string, failing if it is empty or too long
    pub fn new(key: &str) -> Option<Self> {
        if key.is_empty() {
            return None;
        }
        let mut s = String::new();
        s.push_str(key).ok()?;
        Some(Self(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
}

/// Flash storage trait
///
/// Provides wear-leveled key-value storage for presets and
/// calibration. Implementations should handle:
/// - Wear leveling across flash sectors
/// - Data integrity (CRC or similar)
/// - Atomic writes where possible
pub trait FlashStore {
    /// Read a value by key into the provided buffer
    ///
    /// # Returns
    /// The number of bytes read, or an error. A key that has never
    /// been written returns [`FlashError::NotFound`].
    fn read(
        &mut self,
        key: &StoreKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Write a value by key, replacing any previous value
    fn write(
        &mut self,
        key: &StoreKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Erase all stored data
    ///
    /// This erases the entire storage partition. Use with caution!
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

// Implement the sequential-storage Key trait when the feature is enabled.
// Layout is a single length byte followed by the key bytes.
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StoreKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        let bytes = self.0.as_bytes();
        if buffer.len() < bytes.len() + 1 {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = bytes.len() as u8;
        buffer[1..=bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len() + 1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        let Some(&len) = buffer.first() else {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        };
        let len = len as usize;
        if len == 0 || len > MAX_KEY_LEN {
            return Err(sequential_storage::map::SerializationError::InvalidFormat);
        }
        let Some(bytes) = buffer.get(1..=len) else {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        };
        let Ok(key) = core::str::from_utf8(bytes) else {
            return Err(sequential_storage::map::SerializationError::InvalidFormat);
        };
        match StoreKey::new(key) {
            Some(key) => Ok((key, len + 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}
