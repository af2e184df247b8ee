//! supervisor.rs
//! Owns the shutdown signal and every worker handle.
//!
//! Lifecycle: `Created → Running → ShuttingDown → Stopped`.
//! - start: spawn workers in registration order; on any failure, stop and
//!   join whatever already started, then report the startup error
//! - wait: coarse idle poll until shutdown is requested
//! - join: join every handle in start order and collect a [`RunReport`]

use std::time::Duration;

use log::{error, info};

use crate::error::StartupError;
use crate::runtime::{
    shutdown::ShutdownSignal,
    worker::{PeriodicWorker, WorkerHandle},
};
use crate::utils::report::RunReport;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Created,
    Running,
    ShuttingDown,
    Stopped,
}

pub struct Supervisor {
    shutdown: ShutdownSignal,
    pending: Vec<PeriodicWorker>,
    handles: Vec<WorkerHandle>,
    state: SupervisorState,
    poll_interval: Duration,
}

impl Supervisor {
    pub fn new(shutdown: ShutdownSignal) -> Self {
        Self {
            shutdown,
            pending: Vec::new(),
            handles: Vec::new(),
            state: SupervisorState::Created,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Registers a worker to be started by [`Supervisor::start`].
    pub fn add_worker(&mut self, worker: PeriodicWorker) {
        self.pending.push(worker);
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Names of the started workers, in start order.
    pub fn worker_names(&self) -> Vec<&str> {
        self.handles.iter().map(WorkerHandle::name).collect()
    }

    /// Starts every registered worker. Fail-fast: a single spawn failure
    /// stops and joins the workers already running.
    pub fn start(&mut self) -> Result<(), StartupError> {
        let pending = std::mem::take(&mut self.pending);
        for (index, worker) in pending.into_iter().enumerate() {
            let name = worker.name().to_string();
            match worker.spawn(&self.shutdown) {
                Ok(handle) => {
                    info!("   ✓ Core {}: {} activated", index + 1, name);
                    self.handles.push(handle);
                }
                Err(e) => {
                    error!("[SYSTEM] Error creating {} thread: {}", name, e);
                    self.abort_startup();
                    return Err(e);
                }
            }
        }

        self.state = SupervisorState::Running;
        Ok(())
    }

    // Stops and joins the workers started so far, logging what they did.
    fn abort_startup(&mut self) -> RunReport {
        self.shutdown.signal_shutdown();
        self.state = SupervisorState::ShuttingDown;
        let report = self.join_all();
        report.log_summary();
        report
    }

    /// Idles until shutdown is requested.
    pub fn wait_for_shutdown(&mut self) {
        while self.shutdown.wait_timeout(self.poll_interval) {}
        self.state = SupervisorState::ShuttingDown;
    }

    /// Joins every worker in start order. Blocks until all have exited.
    pub fn join_all(&mut self) -> RunReport {
        info!("[SYSTEM] Waiting for all tasks to complete...");
        let mut report = RunReport::default();

        for handle in self.handles.drain(..) {
            let name = handle.name().to_string();
            match handle.join() {
                Ok(stats) => {
                    info!("[SYSTEM] {} joined", name);
                    report.workers.push(stats);
                }
                Err(e) => {
                    error!("[SYSTEM] {}", e);
                    report.crashed.push(name);
                }
            }
        }

        self.state = SupervisorState::Stopped;
        report
    }

    /// Full lifecycle: start, idle until shutdown, join.
    pub fn run(mut self) -> Result<RunReport, StartupError> {
        self.start()?;
        self.wait_for_shutdown();
        Ok(self.join_all())
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        // Never leave detached workers behind.
        if !self.handles.is_empty() {
            self.shutdown.signal_shutdown();
            self.join_all();
        }
    }
}
