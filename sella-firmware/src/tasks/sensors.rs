//! Presence and telemetry task
//!
//! Owns the ADC with both analog channels: the seat presence sensor,
//! read every control tick, and the gas sensor, read on the telemetry
//! cadence. Temperature and humidity come from the environmental
//! sensor collaborator through the ENV_READING signal; this task only
//! merges them into the outbound telemetry line.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Ticker};

use sella_link::Status;

use crate::channels::{EnvReading, ENV_READING, PRESENCE, STATUS_OUT};

/// Sensor cadence configuration
#[derive(Clone)]
pub struct SensorsConfig {
    /// Presence read cadence (ms)
    pub presence_interval_ms: u32,
    /// Telemetry line cadence (ms)
    pub telemetry_interval_ms: u32,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            presence_interval_ms: 200,
            telemetry_interval_ms: 2000,
        }
    }
}

/// Sensors task - presence sampling and telemetry forwarding
#[embassy_executor::task]
pub async fn sensors_task(
    mut adc: Adc<'static, Async>,
    mut presence_ch: Channel<'static>,
    mut gas_ch: Channel<'static>,
    config: SensorsConfig,
) {
    info!("Sensors task started");

    let mut ticker = Ticker::every(Duration::from_millis(config.presence_interval_ms as u64));
    let mut since_telemetry_ms = 0u32;
    let mut env = EnvReading {
        temp_c: 0,
        humidity_pct: 0,
    };

    loop {
        match adc.read(&mut presence_ch).await {
            Ok(raw) => PRESENCE.signal(raw),
            Err(e) => warn!("Presence ADC read failed: {:?}", e),
        }

        since_telemetry_ms = since_telemetry_ms.saturating_add(config.presence_interval_ms);
        if since_telemetry_ms >= config.telemetry_interval_ms {
            since_telemetry_ms = 0;

            if let Some(reading) = ENV_READING.try_take() {
                env = reading;
            }

            match adc.read(&mut gas_ch).await {
                Ok(gas) => {
                    let line = Status::Telemetry {
                        temp_c: env.temp_c,
                        humidity_pct: env.humidity_pct,
                        gas_adc: gas,
                    };
                    if STATUS_OUT.try_send(line).is_err() {
                        trace!("Status channel full, skipping telemetry");
                    }
                }
                Err(e) => warn!("Gas ADC read failed: {:?}", e),
            }
        }

        ticker.next().await;
    }
}
