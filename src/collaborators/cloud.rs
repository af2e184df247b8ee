//! cloud.rs
//! Hand-off between the sensor producer and the cloud worker.
//!
//! [`CloudUplink`] is the producer-side sink: a non-blocking `try_send` into a
//! bounded queue, dropping the reading when the queue is saturated.
//! [`CloudExporter`] is the worker body: it drains whatever is queued each
//! period and hands the batch to the publisher. Publishing over MQTT/TLS is
//! not part of this build, so batches are only logged.

use std::time::Duration;

use crossbeam::channel::{Receiver, Sender, TrySendError, bounded};
use log::{debug, info};

use crate::error::{CycleError, ExportError};
use crate::runtime::worker::PeriodicWorker;
use crate::sensor::{frame::encode_frame, reading::SensorReading, sink::ReadingSink};

pub const CLOUD_WORKER_NAME: &str = "CloudCore";

/// Creates a connected uplink/exporter pair with room for `capacity` readings.
pub fn cloud_channel(capacity: usize) -> (CloudUplink, CloudExporter) {
    let (tx, rx) = bounded(capacity);
    (
        CloudUplink { tx, capacity },
        CloudExporter { rx, published: 0 },
    )
}

#[derive(Clone)]
pub struct CloudUplink {
    tx: Sender<SensorReading>,
    capacity: usize,
}

impl ReadingSink for CloudUplink {
    fn name(&self) -> &str {
        "cloud"
    }

    fn submit(&self, reading: &SensorReading) -> Result<(), ExportError> {
        self.tx.try_send(*reading).map_err(|e| match e {
            TrySendError::Full(_) => ExportError::QueueFull {
                capacity: self.capacity,
            },
            TrySendError::Disconnected(_) => ExportError::QueueDisconnected,
        })
    }
}

pub struct CloudExporter {
    rx: Receiver<SensorReading>,
    published: u64,
}

impl CloudExporter {
    /// Readings handed over so far.
    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Drains the queue and returns the batch that was handed over.
    pub fn cycle(&mut self) -> Result<Vec<SensorReading>, CycleError> {
        let batch: Vec<SensorReading> = self.rx.try_iter().collect();
        if batch.is_empty() {
            info!("[CLOUD] No sensor data pending");
            return Ok(batch);
        }

        info!("[CLOUD] Processing {} sensor readings for cloud...", batch.len());
        for reading in &batch {
            debug!("[CLOUD] payload {}", encode_frame(reading).trim_end());
        }
        self.published += batch.len() as u64;
        debug!("[CLOUD] MQTT/TLS publisher not configured, batch kept local");
        Ok(batch)
    }

    pub fn into_worker(mut self, period: Duration) -> PeriodicWorker {
        PeriodicWorker::new(CLOUD_WORKER_NAME, period, move || {
            self.cycle().map(|_| ())
        })
    }
}
