//! Outbound status text
//!
//! Free-text acknowledgement and alert lines sent back to the connected
//! client, plus the periodic telemetry passthrough. All lines are
//! best-effort: the transmit task drops them when no session exists.

use core::fmt::Write;

use heapless::String;

use crate::command::Posture;

/// Maximum rendered status line length
pub const MAX_STATUS_LEN: usize = 48;

/// A status notification awaiting transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Direct relay command acknowledged
    RelaySet { index: u8, on: bool },
    /// Command rejected: exclusive lock held
    Busy,
    /// Command rejected: auto mode active
    AutoRunning,
    /// Requested preset slot has no saved target
    NoSuchPreset { slot: u8 },
    /// Activation request with the unit already inside tolerance
    AlreadyAtTarget,
    /// Auto-leveling started toward a preset
    AutoStarted { slot: u8 },
    /// Auto-leveling converged
    Converged,
    /// Orientation sensors unavailable
    SensorsUnavailable,
    /// Current orientation persisted to a preset slot
    PresetSaved { slot: u8 },
    /// Timed manual actuation started
    ManualStarted(Posture),
    /// Timed manual actuation ran to completion
    ManualComplete(Posture),
    /// Timed manual actuation ended early by the matching command
    ManualStopped(Posture),
    /// Occupancy dwell elapsed; device suspending
    Suspending,
    /// Environmental telemetry passthrough
    Telemetry {
        temp_c: i16,
        humidity_pct: i16,
        gas_adc: u16,
    },
}

impl Status {
    /// Render the status as a single line (without terminator)
    pub fn render(&self) -> String<MAX_STATUS_LEN> {
        let mut line = String::new();
        let result = match *self {
            Status::RelaySet { index, on } => {
                write!(line, "relay {} {}", index, if on { "on" } else { "off" })
            }
            Status::Busy => write!(line, "busy"),
            Status::AutoRunning => write!(line, "auto running"),
            Status::NoSuchPreset { slot } => write!(line, "no such preset {}", slot),
            Status::AlreadyAtTarget => write!(line, "already at target"),
            Status::AutoStarted { slot } => write!(line, "auto leveling to preset {}", slot),
            Status::Converged => write!(line, "auto leveling done"),
            Status::SensorsUnavailable => write!(line, "orientation sensors unavailable"),
            Status::PresetSaved { slot } => write!(line, "preset {} saved", slot),
            Status::ManualStarted(p) => write!(line, "{} started", p.as_str()),
            Status::ManualComplete(p) => write!(line, "{} done", p.as_str()),
            Status::ManualStopped(p) => write!(line, "{} stopped", p.as_str()),
            Status::Suspending => write!(line, "unoccupied, suspending"),
            Status::Telemetry {
                temp_c,
                humidity_pct,
                gas_adc,
            } => write!(line, "{},{},{}", temp_c, humidity_pct, gas_adc),
        };
        debug_assert!(result.is_ok());
        line
    }
}
