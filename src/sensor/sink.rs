//! Destinations a reading is handed to after it is produced.

use crate::error::ExportError;
use crate::sensor::reading::SensorReading;

/// Accepts one reading per call without blocking the producer for longer
/// than a single best-effort attempt. Failures are reported, never retried.
pub trait ReadingSink: Send {
    fn name(&self) -> &str;

    fn submit(&self, reading: &SensorReading) -> Result<(), ExportError>;
}
