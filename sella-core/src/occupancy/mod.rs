//! Occupancy monitoring
//!
//! Watches the seat presence signal and decides when sustained vacancy
//! should suspend the device. Suspension is terminal for the run; the
//! wake condition is the presence signal crossing back above the
//! occupied threshold.

use crate::config::OccupancyConfig;

/// Result of one occupancy update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Occupancy {
    /// Seat occupied; dwell timer reset
    Present,
    /// Seat vacant; dwell accumulating
    Absent { for_ms: u32 },
    /// Vacancy dwell elapsed; suspend the device
    SuspendDue,
}

/// Occupancy monitor
#[derive(Debug, Clone)]
pub struct OccupancyMonitor {
    cfg: OccupancyConfig,
    absent_ms: u32,
}

impl OccupancyMonitor {
    pub fn new(cfg: OccupancyConfig) -> Self {
        Self { cfg, absent_ms: 0 }
    }

    /// Feed one presence reading
    ///
    /// `raw` is the presence ADC value, `delta_ms` the time since the
    /// previous update. Readings inside the hysteresis band neither
    /// accumulate nor reset the dwell timer.
    pub fn update(&mut self, raw: u16, delta_ms: u32) -> Occupancy {
        if raw >= self.cfg.present_above {
            self.absent_ms = 0;
            return Occupancy::Present;
        }

        if raw < self.cfg.absent_below {
            self.absent_ms = self.absent_ms.saturating_add(delta_ms);
            if self.absent_ms >= self.cfg.dwell_ms {
                return Occupancy::SuspendDue;
            }
        }

        if self.absent_ms > 0 {
            Occupancy::Absent {
                for_ms: self.absent_ms,
            }
        } else {
            Occupancy::Present
        }
    }

    /// Whether a presence reading satisfies the wake condition
    pub fn is_wake(raw: u16, cfg: &OccupancyConfig) -> bool {
        raw >= cfg.present_above
    }
}
