//! Tuning configuration types
//!
//! A handful of scalar tunables with firmware defaults. Angles are carried
//! as fixed-point tenths of a degree (x10) throughout.

/// Auto-leveling tuning
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelingConfig {
    /// Convergence band around the target (x10 degrees)
    pub tolerance_x10: i16,
    /// Extra band beyond tolerance before an actuator reversal (x10 degrees)
    pub hysteresis_x10: i16,
    /// Mandatory pause between de-energizing one actuator and energizing
    /// the opposite one (ms)
    pub settle_delay_ms: u32,
    /// Control tick period while auto mode is active (ms)
    pub tick_interval_ms: u32,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            tolerance_x10: 50,  // 5.0°
            hysteresis_x10: 30, // 3.0° -> switch threshold at 8.0°
            settle_delay_ms: 1000,
            tick_interval_ms: 200,
        }
    }
}

/// Command arbitration tuning
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArbiterConfig {
    /// Duration of a timed manual actuation (ms)
    pub manual_duration_ms: u32,
    /// Minimum spacing between accepted SAVE commands (ms).
    /// Only SAVE is debounced; AUTO deliberately is not.
    pub save_debounce_ms: u32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            manual_duration_ms: 12_000,
            save_debounce_ms: 2500,
        }
    }
}

/// Occupancy monitor tuning
///
/// The presence signal is a raw ADC reading from a seat pressure sensor.
/// Readings below `absent_below` accumulate the dwell timer, readings at or
/// above `present_above` reset it, and readings in between hold it, so a
/// signal sitting on the boundary cannot endlessly re-arm the timer.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OccupancyConfig {
    /// Below this raw value the seat is considered vacant
    pub absent_below: u16,
    /// At or above this raw value the seat is considered occupied;
    /// also the wake threshold after suspension
    pub present_above: u16,
    /// Continuous vacancy required before suspension (ms)
    pub dwell_ms: u32,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            absent_below: 400,
            present_above: 600,
            dwell_ms: 15_000,
        }
    }
}
