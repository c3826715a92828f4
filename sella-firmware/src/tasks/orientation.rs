//! Orientation sampler task
//!
//! Owns the I2C bus carrying both MPU6050s (backrest on AD0 low, seat
//! pan on AD0 high). Samples every control tick while the sensors are
//! available; while unavailable, re-probes once a second and keeps
//! signalling None so the controller sees unavailability as a value.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_time::{Duration, Ticker};

use sella_core::tilt::TiltPair;
use sella_drivers::accel::{Mpu6050, MPU6050_ADDR_HIGH, MPU6050_ADDR_LOW};

use crate::channels::TILT_READING;

/// Orientation sampler configuration
#[derive(Clone)]
pub struct SamplerConfig {
    /// Sample cadence while available (ms)
    pub sample_interval_ms: u32,
    /// Availability re-probe cadence (ms)
    pub probe_interval_ms: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 200,
            probe_interval_ms: 1000,
        }
    }
}

/// Orientation task - samples both tilt sensors
///
/// `offsets` are the per-sensor zero offsets loaded from flash at boot;
/// they are subtracted from every raw angle.
#[embassy_executor::task]
pub async fn orientation_task(
    mut i2c: I2c<'static, Async>,
    offsets: TiltPair,
    config: SamplerConfig,
) {
    info!(
        "Orientation task started (offsets {} / {} x10)",
        offsets.back_x10, offsets.seat_x10
    );

    let back = Mpu6050::new(MPU6050_ADDR_LOW);
    let seat = Mpu6050::new(MPU6050_ADDR_HIGH);

    let mut ticker = Ticker::every(Duration::from_millis(config.sample_interval_ms as u64));
    let mut available = false;
    // Probe on the first pass
    let mut since_probe_ms = config.probe_interval_ms;

    loop {
        if !available && since_probe_ms >= config.probe_interval_ms {
            since_probe_ms = 0;
            available = probe(&back, &seat, &mut i2c).await;
            if available {
                info!("Orientation sensors online");
            }
        }

        if available {
            match sample(&back, &seat, &mut i2c, offsets).await {
                Some(pair) => TILT_READING.signal(Some(pair)),
                None => {
                    warn!("Orientation sensor read failed");
                    available = false;
                    TILT_READING.signal(None);
                }
            }
        } else {
            TILT_READING.signal(None);
        }

        ticker.next().await;
        since_probe_ms = since_probe_ms.saturating_add(config.sample_interval_ms);
    }
}

async fn probe(back: &Mpu6050, seat: &Mpu6050, i2c: &mut I2c<'static, Async>) -> bool {
    if let Err(e) = back.init(i2c).await {
        debug!("Backrest sensor probe failed: {:?}", e);
        return false;
    }
    if let Err(e) = seat.init(i2c).await {
        debug!("Seat sensor probe failed: {:?}", e);
        return false;
    }
    true
}

async fn sample(
    back: &Mpu6050,
    seat: &Mpu6050,
    i2c: &mut I2c<'static, Async>,
    offsets: TiltPair,
) -> Option<TiltPair> {
    let back_x10 = back.read_tilt_x10(i2c).await.ok()?;
    let seat_x10 = seat.read_tilt_x10(i2c).await.ok()?;
    Some(TiltPair::new(
        back_x10 - offsets.back_x10,
        seat_x10 - offsets.seat_x10,
    ))
}
