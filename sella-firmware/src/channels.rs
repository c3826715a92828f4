//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication. All control
//! state lives in the controller task; everything here is plain data.

use core::sync::atomic::AtomicBool;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel as SyncChannel;
use embassy_sync::signal::Signal;

use sella_core::tilt::TiltPair;
use sella_core::traits::Channel;
use sella_link::{LinkEvent, Status};

/// Channel capacity for inbound link events
const LINK_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outbound status lines
const STATUS_CHANNEL_SIZE: usize = 8;

/// Channel capacity for actuator commands
const ACTUATOR_CHANNEL_SIZE: usize = 4;

/// A command for the actuator task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorCommand {
    /// Drive one relay directly (manual and direct relay paths)
    Set { channel: Channel, on: bool },
    /// Energize one relay through the interlock (auto path)
    Engage(Channel),
    /// De-energize both relays
    AllOff,
}

/// Reading from the environmental sensor collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvReading {
    /// Temperature in whole °C
    pub temp_c: i16,
    /// Relative humidity in whole percent
    pub humidity_pct: i16,
}

/// Inbound events decoded from the gateway UART
pub static LINK_EVENTS: SyncChannel<CriticalSectionRawMutex, LinkEvent, LINK_CHANNEL_SIZE> =
    SyncChannel::new();

/// Outbound status lines awaiting transmission to the gateway
pub static STATUS_OUT: SyncChannel<CriticalSectionRawMutex, Status, STATUS_CHANNEL_SIZE> =
    SyncChannel::new();

/// Actuator commands from the controller task
pub static ACTUATOR_CMD: SyncChannel<CriticalSectionRawMutex, ActuatorCommand, ACTUATOR_CHANNEL_SIZE> =
    SyncChannel::new();

/// Latest fused orientation sample (updated by orientation task)
/// None while either sensor is unavailable
pub static TILT_READING: Signal<CriticalSectionRawMutex, Option<TiltPair>> = Signal::new();

/// Latest raw presence ADC reading (updated by sensors task)
pub static PRESENCE: Signal<CriticalSectionRawMutex, u16> = Signal::new();

/// Latest environmental reading (updated by the sensor collaborator)
pub static ENV_READING: Signal<CriticalSectionRawMutex, EnvReading> = Signal::new();

/// Whether a client session is currently active
///
/// Written by the controller task on connect/disconnect, read by the
/// link TX task to drop outbound lines while disconnected.
pub static CONNECTED: AtomicBool = AtomicBool::new(false);
