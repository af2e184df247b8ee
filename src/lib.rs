//! # Edge Gateway
//! Multi-task supervisor for a small embedded gateway host.
//!
//! Four periodic workers run on their own threads and share one shutdown
//! signal:
//! - **SensorCore:** synthetic temperature/humidity every 2 s → serial frame
//!   on `/dev/ttyAMA0` + cloud uplink queue.
//! - **CloudCore:** drains the uplink queue every 5 s.
//! - **OTACore:** firmware update check every 30 s.
//! - **SecurityCore:** load-average health check every 60 s.
//!
//! ## Shutdown
//! SIGINT/SIGTERM flip the [`runtime::shutdown::ShutdownSignal`]; sleeping
//! workers are woken, finish their current cycle and are joined in start order
//! by the [`runtime::supervisor::Supervisor`].

pub mod collaborators;
pub mod config;
pub mod error;
pub mod gateway;
pub mod runtime;
pub mod sensor;
pub mod utils;
