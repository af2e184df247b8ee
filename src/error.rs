//! Error types for the gateway.
//!
//! Only [`StartupError`] is fatal. Everything a worker body can hit while
//! running ([`ExportError`], [`CycleError`]) is logged by the worker loop and
//! the worker keeps going.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Failure to bring the supervisor into the `Running` state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to spawn worker '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("worker '{name}' has a zero period")]
    ZeroPeriod { name: String },

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),
}

/// Failure to hand a reading to a sink. Never fatal to the producer.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("serial transport {device} unavailable: {source}")]
    TransportUnavailable {
        device: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write to serial transport {device} failed: {source}")]
    TransportWriteFailed {
        device: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cloud uplink queue full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("cloud uplink queue disconnected")]
    QueueDisconnected,
}

/// Malformed serial frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame is missing the SENSOR: prefix")]
    MissingPrefix,

    #[error("frame is not terminated by CRLF")]
    MissingTerminator,

    #[error("frame has {0} fields, expected 4")]
    FieldCount(usize),

    #[error("invalid {field} field: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// Error returned by one cycle of a worker body.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },
}

/// A worker thread that did not terminate normally.
#[derive(Debug, Error)]
#[error("worker '{name}' panicked: {message}")]
pub struct WorkerJoinError {
    pub name: String,
    pub message: String,
}
