//! Wires the four gateway workers onto a supervisor.
//!
//! Start order (and join order) follows the reference board layout:
//! SensorCore, CloudCore, OTACore, SecurityCore. With `pin_cores` set,
//! worker *i* is pinned to core *i* modulo the host's core count.

use crate::collaborators::{
    cloud::cloud_channel,
    health::HealthMonitor,
    ota::{NoUpdates, UpdateChecker},
};
use crate::config::GatewayConfig;
use crate::runtime::{
    shutdown::ShutdownSignal,
    supervisor::Supervisor,
    worker::SleepMode,
};
use crate::sensor::{producer::SensorProducer, serial::SerialExporter};

pub fn build_supervisor(config: &GatewayConfig, shutdown: ShutdownSignal) -> Supervisor {
    let sleep_mode = if config.interruptible_sleep {
        SleepMode::Interruptible
    } else {
        SleepMode::Fixed
    };

    let (uplink, cloud) = cloud_channel(config.cloud_queue_capacity);
    let sensor = SensorProducer::new(config.sensor_id)
        .with_sink(SerialExporter::new(&config.serial_device))
        .with_sink(uplink);
    let ota = UpdateChecker::new(config.firmware_version.clone(), NoUpdates);
    let health = HealthMonitor::new(&config.loadavg_path, config.load_threshold);

    let workers = [
        sensor.into_worker(config.sensor_period),
        cloud.into_worker(config.cloud_period),
        ota.into_worker(config.ota_period),
        health.into_worker(config.health_period),
    ];

    let mut supervisor = Supervisor::new(shutdown).with_poll_interval(config.supervisor_poll);
    for (core, worker) in workers.into_iter().enumerate() {
        let worker = worker.with_sleep_mode(sleep_mode);
        let worker = if config.pin_cores {
            worker.pinned_to(core)
        } else {
            worker
        };
        supervisor.add_worker(worker);
    }
    supervisor
}
