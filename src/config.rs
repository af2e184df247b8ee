//! Runtime configuration for the gateway.
//!
//! Defaults reproduce the reference Raspberry Pi deployment; the binary lets
//! CLI flags override individual values.

use std::{path::PathBuf, time::Duration};

pub const DEFAULT_SERIAL_DEVICE: &str = "/dev/ttyAMA0";
pub const DEFAULT_SENSOR_ID: u16 = 1;
pub const DEFAULT_FIRMWARE_VERSION: &str = "pi-rtos-gateway-v1.0";

const DEFAULT_SENSOR_PERIOD_SECS: u64 = 2;
const DEFAULT_CLOUD_PERIOD_SECS: u64 = 5;
const DEFAULT_OTA_PERIOD_SECS: u64 = 30;
const DEFAULT_HEALTH_PERIOD_SECS: u64 = 60;
const DEFAULT_SUPERVISOR_POLL_SECS: u64 = 1;
const DEFAULT_CLOUD_QUEUE_CAPACITY: usize = 64;
// One runnable task per core on a 4-core Cortex-A72.
const DEFAULT_LOAD_THRESHOLD: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub serial_device: PathBuf,
    pub sensor_id: u16,
    pub sensor_period: Duration,
    pub cloud_period: Duration,
    pub ota_period: Duration,
    pub health_period: Duration,
    pub supervisor_poll: Duration,
    pub cloud_queue_capacity: usize,
    pub load_threshold: f64,
    pub loadavg_path: PathBuf,
    pub firmware_version: String,
    /// Wake sleeping workers as soon as shutdown is requested instead of
    /// letting them finish their current period.
    pub interruptible_sleep: bool,
    pub pin_cores: bool,
    pub report_path: Option<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            serial_device: PathBuf::from(DEFAULT_SERIAL_DEVICE),
            sensor_id: DEFAULT_SENSOR_ID,
            sensor_period: Duration::from_secs(DEFAULT_SENSOR_PERIOD_SECS),
            cloud_period: Duration::from_secs(DEFAULT_CLOUD_PERIOD_SECS),
            ota_period: Duration::from_secs(DEFAULT_OTA_PERIOD_SECS),
            health_period: Duration::from_secs(DEFAULT_HEALTH_PERIOD_SECS),
            supervisor_poll: Duration::from_secs(DEFAULT_SUPERVISOR_POLL_SECS),
            cloud_queue_capacity: DEFAULT_CLOUD_QUEUE_CAPACITY,
            load_threshold: DEFAULT_LOAD_THRESHOLD,
            loadavg_path: PathBuf::from("/proc/loadavg"),
            firmware_version: DEFAULT_FIRMWARE_VERSION.to_string(),
            interruptible_sleep: true,
            pin_cores: false,
            report_path: None,
        }
    }
}
