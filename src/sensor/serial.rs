//! serial.rs
//! Writes encoded readings to the serial transport.
//! - the device is opened, written and closed inside every `export` call
//! - open failure and write failure are distinct, both non-fatal to the caller
//! - no retry: each cycle is an independent attempt

use std::{
    fs::OpenOptions,
    io::Write,
    os::unix::fs::OpenOptionsExt,
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::ExportError;
use crate::sensor::{frame::encode_frame, reading::SensorReading, sink::ReadingSink};

#[derive(Debug, Clone)]
pub struct SerialExporter {
    device: PathBuf,
}

impl SerialExporter {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn export(&self, reading: &SensorReading) -> Result<(), ExportError> {
        let frame = encode_frame(reading);

        // Write-only and never the controlling terminal. Append so a
        // regular-file stand-in accumulates frames instead of overwriting.
        let mut port = OpenOptions::new()
            .write(true)
            .append(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&self.device)
            .map_err(|source| ExportError::TransportUnavailable {
                device: self.device.clone(),
                source,
            })?;

        port.write_all(frame.as_bytes())
            .map_err(|source| ExportError::TransportWriteFailed {
                device: self.device.clone(),
                source,
            })?;

        debug!("[UART] {} <- {}", self.device.display(), frame.trim_end());
        Ok(())
    }
}

impl ReadingSink for SerialExporter {
    fn name(&self) -> &str {
        "serial"
    }

    fn submit(&self, reading: &SensorReading) -> Result<(), ExportError> {
        self.export(reading)
    }
}
