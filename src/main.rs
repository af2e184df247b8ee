//! # Edge Gateway Entry Point
//! Starts the sensor, cloud, OTA and health workers and runs until SIGINT or
//! SIGTERM.
//!
//! ## Exit codes
//! - `0`: graceful shutdown, every worker joined.
//! - `1`: startup failure (signal handlers or a worker could not start).
//!
//! Log level follows `RUST_LOG` (default `info`).

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use edge_gateway::{
    config::GatewayConfig,
    gateway::build_supervisor,
    runtime::{shutdown::ShutdownSignal, signals::SignalListener},
};

/// Pi-RTOS edge gateway: periodic sensor, cloud, OTA and health workers.
#[derive(Debug, Parser)]
#[command(name = "edge_gateway", version, about, long_about = None)]
struct Cli {
    /// Serial device receiving sensor frames.
    #[arg(long)]
    serial_device: Option<PathBuf>,

    /// Sensor id stamped on every reading (1-65535).
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    sensor_id: Option<u16>,

    /// Sensor sampling period in seconds.
    #[arg(long)]
    sensor_period: Option<u64>,

    /// Cloud uplink drain period in seconds.
    #[arg(long)]
    cloud_period: Option<u64>,

    /// Firmware update check period in seconds.
    #[arg(long)]
    ota_period: Option<u64>,

    /// Health check period in seconds.
    #[arg(long)]
    health_period: Option<u64>,

    /// 1-minute load average above which the health check fails.
    #[arg(long)]
    load_threshold: Option<f64>,

    /// Let workers finish their full sleep period on shutdown.
    #[arg(long, default_value_t = false)]
    fixed_sleep: bool,

    /// Pin each worker to its own CPU core.
    #[arg(long, default_value_t = false)]
    pin_cores: bool,

    /// Write per-worker statistics to this CSV file on exit.
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> GatewayConfig {
        let mut cfg = GatewayConfig::default();
        if let Some(device) = self.serial_device {
            cfg.serial_device = device;
        }
        if let Some(id) = self.sensor_id {
            cfg.sensor_id = id;
        }
        if let Some(secs) = self.sensor_period {
            cfg.sensor_period = Duration::from_secs(secs);
        }
        if let Some(secs) = self.cloud_period {
            cfg.cloud_period = Duration::from_secs(secs);
        }
        if let Some(secs) = self.ota_period {
            cfg.ota_period = Duration::from_secs(secs);
        }
        if let Some(secs) = self.health_period {
            cfg.health_period = Duration::from_secs(secs);
        }
        if let Some(threshold) = self.load_threshold {
            cfg.load_threshold = threshold;
        }
        cfg.interruptible_sleep = !self.fixed_sleep;
        cfg.pin_cores = self.pin_cores;
        cfg.report_path = self.report;
        cfg
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = Cli::parse().into_config();

    info!("======================================================");
    info!("Pi-RTOS Edge Gateway {}", config.firmware_version);
    info!("Serial: {}  sensor id: {}", config.serial_device.display(), config.sensor_id);
    info!("======================================================");

    let shutdown = ShutdownSignal::new();
    let listener = match SignalListener::install(shutdown.clone()) {
        Ok(listener) => listener,
        Err(e) => {
            error!("[SYSTEM] {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut supervisor = build_supervisor(&config, shutdown);
    if let Err(e) = supervisor.start() {
        error!("[SYSTEM] Startup failed: {}", e);
        listener.close();
        return ExitCode::FAILURE;
    }

    info!("All systems operational");
    println!("\nPress Ctrl+C to shutdown gracefully\n");

    supervisor.wait_for_shutdown();
    let report = supervisor.join_all();
    listener.close();

    report.log_summary();
    if let Some(path) = &config.report_path {
        match report.write_csv(path) {
            Ok(()) => info!("[SYSTEM] Run report written to {}", path.display()),
            Err(e) => warn!("[SYSTEM] Failed to write run report {}: {}", path.display(), e),
        }
    }

    info!("[SYSTEM] Pi-RTOS Edge Gateway stopped successfully");
    ExitCode::SUCCESS
}
