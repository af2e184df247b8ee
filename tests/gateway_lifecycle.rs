//! End-to-end runs of the assembled gateway with short periods and a
//! regular file standing in for the serial device.

use std::{
    fs,
    path::Path,
    thread,
    time::{Duration, Instant},
};

use edge_gateway::{
    config::GatewayConfig,
    error::StartupError,
    gateway::build_supervisor,
    runtime::{shutdown::ShutdownSignal, supervisor::SupervisorState},
    sensor::frame::decode_frame,
};

fn test_config(dir: &Path) -> GatewayConfig {
    let loadavg = dir.join("loadavg");
    fs::write(&loadavg, "0.25 0.20 0.15 1/120 999\n").unwrap();

    GatewayConfig {
        serial_device: dir.join("ttyAMA0"),
        sensor_period: Duration::from_millis(20),
        cloud_period: Duration::from_millis(30),
        ota_period: Duration::from_millis(40),
        health_period: Duration::from_millis(40),
        supervisor_poll: Duration::from_millis(10),
        loadavg_path: loadavg,
        ..GatewayConfig::default()
    }
}

fn frames(device: &Path) -> Vec<String> {
    fs::read_to_string(device)
        .unwrap()
        .split_inclusive("\r\n")
        .map(str::to_string)
        .collect()
}

#[test]
fn serial_frames_follow_the_reading_counter() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    fs::write(&config.serial_device, b"").unwrap();

    let shutdown = ShutdownSignal::new();
    let mut supervisor = build_supervisor(&config, shutdown.clone());
    supervisor.start().unwrap();
    assert_eq!(
        supervisor.worker_names(),
        vec!["SensorCore", "CloudCore", "OTACore", "SecurityCore"]
    );

    thread::sleep(Duration::from_millis(200));
    shutdown.signal_shutdown();
    supervisor.wait_for_shutdown();
    let report = supervisor.join_all();
    assert_eq!(supervisor.state(), SupervisorState::Stopped);

    let lines = frames(&config.serial_device);
    assert!(lines.len() >= 3, "only {} frames", lines.len());
    for (i, line) in lines.iter().enumerate() {
        let counter = i as u64 + 1;
        let reading = decode_frame(line).unwrap();
        assert_eq!(reading.sensor_id, 1);
        assert_eq!(reading.temperature, 20.0 + (counter % 20) as f64);
        assert_eq!(reading.humidity, 30.0 + (counter % 40) as f64);
    }

    let sensor = &report.workers[0];
    assert_eq!(sensor.name, "SensorCore");
    assert_eq!(sensor.cycles as usize, lines.len());
    assert_eq!(sensor.failures, 0);
    assert!(report.is_clean());
    assert!(report.workers.iter().all(|w| w.failures == 0));
}

#[test]
fn absent_serial_device_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let shutdown = ShutdownSignal::new();
    let mut supervisor = build_supervisor(&config, shutdown.clone());
    supervisor.start().unwrap();
    thread::sleep(Duration::from_millis(100));
    shutdown.signal_shutdown();
    supervisor.wait_for_shutdown();
    let report = supervisor.join_all();

    assert!(report.is_clean());
    assert!(report.workers[0].cycles >= 3);
    assert_eq!(report.workers[0].failures, 0);
    assert!(!config.serial_device.exists());
}

#[test]
fn failing_health_source_keeps_gateway_running() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.loadavg_path = dir.path().join("missing-loadavg");

    let shutdown = ShutdownSignal::new();
    let mut supervisor = build_supervisor(&config, shutdown.clone());
    supervisor.start().unwrap();
    thread::sleep(Duration::from_millis(150));
    shutdown.signal_shutdown();
    supervisor.wait_for_shutdown();
    let report = supervisor.join_all();

    let health = report
        .workers
        .iter()
        .find(|w| w.name == "SecurityCore")
        .unwrap();
    assert!(health.cycles >= 2);
    assert_eq!(health.failures, health.cycles);
}

#[test]
fn long_periods_still_shut_down_promptly() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.sensor_period = Duration::from_secs(60);
    config.cloud_period = Duration::from_secs(60);
    config.ota_period = Duration::from_secs(60);
    config.health_period = Duration::from_secs(60);

    let shutdown = ShutdownSignal::new();
    let mut supervisor = build_supervisor(&config, shutdown.clone());
    supervisor.start().unwrap();
    thread::sleep(Duration::from_millis(50));

    let signalled = Instant::now();
    shutdown.signal_shutdown();
    supervisor.wait_for_shutdown();
    let report = supervisor.join_all();

    assert!(signalled.elapsed() < Duration::from_secs(5));
    assert_eq!(report.workers.len(), 4);
    assert!(report.workers.iter().all(|w| w.cycles == 1));
}

#[test]
fn zero_period_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.ota_period = Duration::ZERO;

    let shutdown = ShutdownSignal::new();
    let mut supervisor = build_supervisor(&config, shutdown.clone());
    let err = supervisor.start().unwrap_err();

    assert!(matches!(err, StartupError::ZeroPeriod { ref name } if name == "OTACore"));
    assert!(!shutdown.is_running());
    assert_eq!(supervisor.state(), SupervisorState::Stopped);
    assert!(supervisor.worker_names().is_empty());
}
