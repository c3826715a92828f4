//! Flash-backed preset and calibration store
//!
//! Wraps the HAL key-value store with the preset key scheme from
//! sella-core. Each target angle persists as a little-endian f32 in
//! degrees under its own key; a key that has never been written reads
//! back as 0.0, which makes the (0.0, 0.0) pair indistinguishable from
//! a missing preset. That ambiguity is part of the on-flash contract.

use sella_core::presets::{clamp_slot, target_key, TargetField, CALIB_BACK_KEY, CALIB_SEAT_KEY};
use sella_core::tilt::{degrees_to_x10, x10_to_degrees, TiltPair};
use sella_hal::{FlashError, FlashStore, StoreKey};

/// Preset and calibration store over a flash key-value backend
pub struct PresetStore<S> {
    store: S,
}

impl<S: FlashStore> PresetStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load a preset; fields that were never saved read as 0.0°
    pub async fn get(&mut self, owner: &str, slot: u8) -> TiltPair {
        let slot = clamp_slot(slot);
        TiltPair::new(
            self.read_angle(target_key(owner, TargetField::Back, slot).as_str())
                .await,
            self.read_angle(target_key(owner, TargetField::Seat, slot).as_str())
                .await,
        )
    }

    /// Persist a preset, unconditionally overwriting both fields
    pub async fn put(
        &mut self,
        owner: &str,
        slot: u8,
        target: TiltPair,
    ) -> Result<(), FlashError> {
        let slot = clamp_slot(slot);
        self.write_angle(
            target_key(owner, TargetField::Back, slot).as_str(),
            target.back_x10,
        )
        .await?;
        self.write_angle(
            target_key(owner, TargetField::Seat, slot).as_str(),
            target.seat_x10,
        )
        .await
    }

    /// Load the sampler zero offsets; unset offsets read as 0.0°
    pub async fn calibration(&mut self) -> TiltPair {
        TiltPair::new(
            self.read_angle(CALIB_BACK_KEY).await,
            self.read_angle(CALIB_SEAT_KEY).await,
        )
    }

    /// Persist the sampler zero offsets
    pub async fn set_calibration(&mut self, offsets: TiltPair) -> Result<(), FlashError> {
        self.write_angle(CALIB_BACK_KEY, offsets.back_x10).await?;
        self.write_angle(CALIB_SEAT_KEY, offsets.seat_x10).await
    }

    async fn read_angle(&mut self, key: &str) -> i16 {
        let Some(key) = StoreKey::new(key) else {
            return 0;
        };

        let mut buf = [0u8; 4];
        match self.store.read(&key, &mut buf).await {
            Ok(4) => degrees_to_x10(f32::from_le_bytes(buf)),
            // Never written, or an unreadable record: treat as 0.0°
            _ => 0,
        }
    }

    async fn write_angle(&mut self, key: &str, angle_x10: i16) -> Result<(), FlashError> {
        let key = StoreKey::new(key).ok_or(FlashError::Storage)?;
        let bytes = x10_to_degrees(angle_x10).to_le_bytes();
        self.store.write(&key, &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use heapless::{LinearMap, Vec};

    /// In-memory flash store for host tests
    struct MockStore {
        entries: LinearMap<StoreKey, Vec<u8, 16>, 16>,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                entries: LinearMap::new(),
            }
        }
    }

    impl FlashStore for MockStore {
        async fn read(&mut self, key: &StoreKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
            let Some(data) = self.entries.get(key) else {
                return Err(FlashError::NotFound);
            };
            if buffer.len() < data.len() {
                return Err(FlashError::BufferTooSmall);
            }
            buffer[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }

        async fn write(&mut self, key: &StoreKey, data: &[u8]) -> Result<(), FlashError> {
            let mut stored = Vec::new();
            stored.extend_from_slice(data).map_err(|_| FlashError::Storage)?;
            self.entries
                .insert(key.clone(), stored)
                .map_err(|_| FlashError::Storage)?;
            Ok(())
        }

        async fn erase_all(&mut self) -> Result<(), FlashError> {
            self.entries = LinearMap::new();
            Ok(())
        }
    }

    fn store() -> PresetStore<MockStore> {
        PresetStore::new(MockStore::new())
    }

    #[test]
    fn test_missing_preset_reads_zero() {
        let mut store = store();
        assert_eq!(
            block_on(store.get("00000c21", 2)),
            TiltPair::new(0, 0)
        );
    }

    #[test]
    fn test_preset_round_trip() {
        let mut store = store();
        let target = TiltPair::new(100, -40);

        block_on(store.put("00000c21", 2, target)).unwrap();
        assert_eq!(block_on(store.get("00000c21", 2)), target);

        // Other slots and owners are untouched
        assert_eq!(block_on(store.get("00000c21", 1)), TiltPair::new(0, 0));
        assert_eq!(block_on(store.get("unknown", 2)), TiltPair::new(0, 0));
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = store();
        block_on(store.put("unknown", 1, TiltPair::new(100, 100))).unwrap();
        block_on(store.put("unknown", 1, TiltPair::new(-50, 20))).unwrap();
        assert_eq!(
            block_on(store.get("unknown", 1)),
            TiltPair::new(-50, 20)
        );
    }

    #[test]
    fn test_out_of_range_slot_clamps_to_same_record() {
        let mut store = store();
        block_on(store.put("unknown", 9, TiltPair::new(70, 70))).unwrap();
        assert_eq!(block_on(store.get("unknown", 3)), TiltPair::new(70, 70));
    }

    #[test]
    fn test_calibration_round_trip() {
        let mut store = store();
        assert_eq!(block_on(store.calibration()), TiltPair::new(0, 0));

        block_on(store.set_calibration(TiltPair::new(12, -7))).unwrap();
        assert_eq!(block_on(store.calibration()), TiltPair::new(12, -7));
    }
}
