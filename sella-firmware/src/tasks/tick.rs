//! Tick task for time-based updates
//!
//! Provides the periodic control tick to the controller for:
//! - Auto-leveling steps
//! - Manual lock expiry
//! - Occupancy dwell accounting

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Control tick interval in milliseconds
pub const TICK_INTERVAL_MS: u32 = 200;

/// Signal to notify controller of tick
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - sends periodic tick signals with timestamp
///
/// The timestamp is milliseconds since boot, truncated to u32; all
/// consumers compare timestamps with wrapping arithmetic.
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS as u64));

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(Instant::now().as_millis() as u32);
    }
}
