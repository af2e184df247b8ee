//! reading.rs
//! Synthetic temperature/humidity readings.
//! Values are pure functions of the producer's cycle counter, so a sequence is
//! replayable from the counter alone.

use std::time::{SystemTime, UNIX_EPOCH};

pub const TEMPERATURE_BASE: f64 = 20.0;
pub const TEMPERATURE_SPAN: u64 = 20;
pub const HUMIDITY_BASE: f64 = 30.0;
pub const HUMIDITY_SPAN: u64 = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub sensor_id: u16,
    /// °C, cycles through `[20.0, 40.0)`.
    pub temperature: f64,
    /// %RH, cycles through `[30.0, 70.0)`.
    pub humidity: f64,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl SensorReading {
    pub fn synthetic(sensor_id: u16, counter: u64, timestamp: i64) -> Self {
        Self {
            sensor_id,
            temperature: synthetic_temperature(counter),
            humidity: synthetic_humidity(counter),
            timestamp,
        }
    }
}

#[inline]
pub fn synthetic_temperature(counter: u64) -> f64 {
    TEMPERATURE_BASE + (counter % TEMPERATURE_SPAN) as f64
}

#[inline]
pub fn synthetic_humidity(counter: u64) -> f64 {
    HUMIDITY_BASE + (counter % HUMIDITY_SPAN) as f64
}

/// Wall-clock seconds; 0 if the clock is before the epoch.
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
