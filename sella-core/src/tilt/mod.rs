//! Tilt math and dual-sensor error fusion
//!
//! Each orientation sensor reports raw acceleration components; the tilt
//! angle per device is `atan2(-X, Z)` in degrees. Angles are carried as
//! fixed-point tenths of a degree (x10), matching the rest of the core.
//!
//! The two angles are fused into a single weighted error: the backrest
//! sensor dominates at 0.7, the seat sensor contributes 0.3.

use libm::{atan2f, roundf};

/// Backrest sensor weight (out of 10)
const WEIGHT_BACK: i32 = 7;
/// Seat sensor weight (out of 10)
const WEIGHT_SEAT: i32 = 3;

/// A pair of tilt angles, one per orientation sensor (x10 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltPair {
    /// Backrest sensor angle (x10 degrees)
    pub back_x10: i16,
    /// Seat sensor angle (x10 degrees)
    pub seat_x10: i16,
}

impl TiltPair {
    pub fn new(back_x10: i16, seat_x10: i16) -> Self {
        Self { back_x10, seat_x10 }
    }
}

/// Compute a tilt angle from raw acceleration components
///
/// `ax` and `az` are signed raw accelerometer readings along the X and Z
/// axes. Returns the angle in tenths of a degree, rounded to nearest.
pub fn tilt_x10_from_accel(ax: i16, az: i16) -> i16 {
    let radians = atan2f(-(ax as f32), az as f32);
    let degrees = radians * 180.0 / core::f32::consts::PI;
    roundf(degrees * 10.0) as i16
}

/// Convert a persisted angle in f32 degrees to the x10 fixed point
///
/// Presets and calibration offsets are stored in flash as f32 degrees;
/// everything in-memory runs on x10.
pub fn degrees_to_x10(degrees: f32) -> i16 {
    roundf(degrees * 10.0) as i16
}

/// Convert an x10 angle to f32 degrees for persistence
pub fn x10_to_degrees(x10: i16) -> f32 {
    x10 as f32 / 10.0
}

/// Weighted deviation of the current orientation from the target
///
/// `0.7 * (target_back - current_back) + 0.3 * (target_seat - current_seat)`
/// over x10 angles. Always derived, never stored.
pub fn weighted_error_x10(target: TiltPair, current: TiltPair) -> i16 {
    let back = (target.back_x10 - current.back_x10) as i32;
    let seat = (target.seat_x10 - current.seat_x10) as i32;
    ((WEIGHT_BACK * back + WEIGHT_SEAT * seat) / 10) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_device_reads_zero() {
        // Gravity entirely on Z, no X component
        assert_eq!(tilt_x10_from_accel(0, 16384), 0);
    }

    #[test]
    fn test_forty_five_degree_tilt() {
        // Equal -X and Z components: atan2(1, 1) = 45°
        assert_eq!(tilt_x10_from_accel(-1000, 1000), 450);
        assert_eq!(tilt_x10_from_accel(1000, 1000), -450);
    }

    #[test]
    fn test_ninety_degree_tilt() {
        assert_eq!(tilt_x10_from_accel(-16384, 0), 900);
    }

    #[test]
    fn test_degree_round_trip() {
        assert_eq!(degrees_to_x10(5.8), 58);
        assert_eq!(degrees_to_x10(-12.34), -123);
        assert_eq!(degrees_to_x10(x10_to_degrees(58)), 58);
        assert_eq!(x10_to_degrees(-450), -45.0);
    }

    #[test]
    fn test_weighted_error_blend() {
        // target = (10°, -4°), current = (0°, 0°)
        // 0.7*10 + 0.3*(-4) = 5.8°
        let target = TiltPair::new(100, -40);
        let current = TiltPair::new(0, 0);
        assert_eq!(weighted_error_x10(target, current), 58);
    }

    #[test]
    fn test_weighted_error_signs() {
        let target = TiltPair::new(0, 0);
        assert!(weighted_error_x10(target, TiltPair::new(100, 100)) < 0);
        assert!(weighted_error_x10(target, TiltPair::new(-100, -100)) > 0);
        assert_eq!(weighted_error_x10(target, TiltPair::new(0, 0)), 0);
    }

    #[test]
    fn test_weighted_error_backrest_dominates() {
        let current = TiltPair::new(0, 0);
        let back_only = weighted_error_x10(TiltPair::new(100, 0), current);
        let seat_only = weighted_error_x10(TiltPair::new(0, 100), current);
        assert_eq!(back_only, 70);
        assert_eq!(seat_only, 30);
    }
}
