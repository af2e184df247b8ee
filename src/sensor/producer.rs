//! producer.rs
//! Sensor worker body: one synthetic reading per cycle, fanned out to sinks.
//! - counter starts at 0 and is incremented before each reading
//! - sink failures are logged and swallowed, so production never stalls
//!   on the serial port or the cloud queue

use std::time::Duration;

use log::{info, warn};

use crate::runtime::worker::PeriodicWorker;
use crate::sensor::{
    reading::{SensorReading, unix_timestamp},
    sink::ReadingSink,
};

pub const SENSOR_WORKER_NAME: &str = "SensorCore";

pub struct SensorProducer {
    sensor_id: u16,
    counter: u64,
    sinks: Vec<Box<dyn ReadingSink>>,
}

impl SensorProducer {
    pub fn new(sensor_id: u16) -> Self {
        Self {
            sensor_id,
            counter: 0,
            sinks: Vec::new(),
        }
    }

    /// Adds a sink. Sinks receive each reading in the order they were added.
    pub fn with_sink(mut self, sink: impl ReadingSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn sensor_id(&self) -> u16 {
        self.sensor_id
    }

    /// Number of readings produced so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Advances the counter and builds the next reading without exporting it.
    pub fn produce(&mut self) -> SensorReading {
        self.counter += 1;
        SensorReading::synthetic(self.sensor_id, self.counter, unix_timestamp())
    }

    /// One full cycle: produce, log, hand to every sink.
    pub fn cycle(&mut self) -> SensorReading {
        let reading = self.produce();
        info!(
            "[SENSOR] Reading #{} T:{:.1}°C H:{:.1}% @ {}",
            self.counter, reading.temperature, reading.humidity, reading.timestamp
        );

        for sink in &self.sinks {
            if let Err(e) = sink.submit(&reading) {
                warn!("[SENSOR] {} export skipped: {}", sink.name(), e);
            }
        }
        reading
    }

    pub fn into_worker(mut self, period: Duration) -> PeriodicWorker {
        PeriodicWorker::new(SENSOR_WORKER_NAME, period, move || {
            self.cycle();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::sensor::serial::SerialExporter;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<SensorReading>>>,
    }

    impl ReadingSink for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn submit(&self, reading: &SensorReading) -> Result<(), ExportError> {
            self.seen.lock().push(*reading);
            Ok(())
        }
    }

    struct Broken;

    impl ReadingSink for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn submit(&self, _: &SensorReading) -> Result<(), ExportError> {
            Err(ExportError::QueueDisconnected)
        }
    }

    #[test]
    fn counter_starts_at_one_and_increments() {
        let mut producer = SensorProducer::new(1);
        assert_eq!(producer.counter(), 0);
        let temps: Vec<f64> = (0..3).map(|_| producer.produce().temperature).collect();
        assert_eq!(temps, vec![21.0, 22.0, 23.0]);
        assert_eq!(producer.counter(), 3);
    }

    #[test]
    fn sensor_id_is_fixed_per_producer() {
        let mut producer = SensorProducer::new(9);
        assert!((0..50).all(|_| producer.produce().sensor_id == 9));
    }

    #[test]
    fn every_sink_sees_every_reading() {
        let first = Recorder::default();
        let second = Recorder::default();
        let mut producer = SensorProducer::new(1)
            .with_sink(first.clone())
            .with_sink(second.clone());

        for _ in 0..4 {
            producer.cycle();
        }
        assert_eq!(first.seen.lock().len(), 4);
        assert_eq!(*first.seen.lock(), *second.seen.lock());
    }

    #[test]
    fn failing_sink_does_not_block_the_rest() {
        let recorder = Recorder::default();
        let mut producer = SensorProducer::new(1)
            .with_sink(Broken)
            .with_sink(recorder.clone());

        let reading = producer.cycle();
        assert_eq!(recorder.seen.lock().as_slice(), &[reading]);
    }

    #[test]
    fn absent_serial_device_still_produces_readings() {
        let dir = tempfile::tempdir().unwrap();
        let device = dir.path().join("ttyAMA0");
        let recorder = Recorder::default();
        let mut producer = SensorProducer::new(1)
            .with_sink(SerialExporter::new(&device))
            .with_sink(recorder.clone());

        let readings: Vec<_> = (0..3).map(|_| producer.cycle()).collect();

        let temps: Vec<f64> = readings.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![21.0, 22.0, 23.0]);
        assert_eq!(producer.counter(), 3);
        assert_eq!(recorder.seen.lock().len(), 3);
        assert!(!device.exists());
    }
}
