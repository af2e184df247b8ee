//! worker.rs
//! Generic periodic worker: run body, sleep period, repeat until shutdown.
//! - one named OS thread per worker, optionally pinned to a CPU core
//! - body errors are logged and counted, never terminate the loop
//! - the signal is checked before every body call and right after every sleep

use std::{
    any::Any,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use core_affinity::{get_core_ids, set_for_current};
use log::{info, warn};

use crate::error::{CycleError, StartupError, WorkerJoinError};
use crate::runtime::shutdown::ShutdownSignal;

pub type CycleBody = Box<dyn FnMut() -> Result<(), CycleError> + Send + 'static>;

/// How a worker waits out its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepMode {
    /// Condvar wait, woken as soon as shutdown is signalled.
    Interruptible,
    /// Plain `thread::sleep`; shutdown latency is up to one full period.
    Fixed,
}

/// Per-worker counters returned when the worker thread exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStats {
    pub name: String,
    pub cycles: u64,
    pub failures: u64,
    pub uptime: Duration,
}

pub struct PeriodicWorker {
    name: String,
    period: Duration,
    body: CycleBody,
    sleep_mode: SleepMode,
    core: Option<usize>,
}

impl PeriodicWorker {
    pub fn new<F>(name: impl Into<String>, period: Duration, body: F) -> Self
    where
        F: FnMut() -> Result<(), CycleError> + Send + 'static,
    {
        Self {
            name: name.into(),
            period,
            body: Box::new(body),
            sleep_mode: SleepMode::Interruptible,
            core: None,
        }
    }

    pub fn with_sleep_mode(mut self, sleep_mode: SleepMode) -> Self {
        self.sleep_mode = sleep_mode;
        self
    }

    /// Pins the worker thread to `core`, wrapping around the cores available
    /// on the host.
    pub fn pinned_to(mut self, core: usize) -> Self {
        self.core = Some(core);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Starts the worker on its own thread.
    pub fn spawn(self, shutdown: &ShutdownSignal) -> Result<WorkerHandle, StartupError> {
        if self.period.is_zero() {
            return Err(StartupError::ZeroPeriod { name: self.name });
        }

        let name = self.name.clone();
        let shutdown = shutdown.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || self.run(&shutdown))
            .map_err(|source| StartupError::Spawn {
                name: name.clone(),
                source,
            })?;

        Ok(WorkerHandle { name, handle })
    }

    /// Worker loop. Runs on the calling thread until shutdown is observed.
    pub fn run(mut self, shutdown: &ShutdownSignal) -> WorkerStats {
        if let Some(core) = self.core {
            pin_current_thread(&self.name, core);
        }

        info!("[{}] started (period {:?})", self.name, self.period);
        let started = Instant::now();
        let mut stats = WorkerStats {
            name: self.name.clone(),
            cycles: 0,
            failures: 0,
            uptime: Duration::ZERO,
        };

        while shutdown.is_running() {
            stats.cycles += 1;
            if let Err(e) = (self.body)() {
                stats.failures += 1;
                warn!("[{}] cycle {} failed: {}", self.name, stats.cycles, e);
            }

            if !self.sleep(shutdown) {
                break;
            }
        }

        stats.uptime = started.elapsed();
        info!(
            "[{}] stopped after {} cycles ({} failed)",
            self.name, stats.cycles, stats.failures
        );
        stats
    }

    fn sleep(&self, shutdown: &ShutdownSignal) -> bool {
        match self.sleep_mode {
            SleepMode::Interruptible => shutdown.wait_timeout(self.period),
            SleepMode::Fixed => {
                thread::sleep(self.period);
                shutdown.is_running()
            }
        }
    }
}

impl std::fmt::Debug for PeriodicWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodicWorker")
            .field("name", &self.name)
            .field("period", &self.period)
            .field("sleep_mode", &self.sleep_mode)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

fn pin_current_thread(name: &str, core: usize) {
    let cores = get_core_ids().unwrap_or_default();
    if cores.is_empty() {
        warn!("[{}] no CPU cores reported, running unpinned", name);
        return;
    }
    let core_id = cores[core % cores.len()];
    if set_for_current(core_id) {
        info!("[{}] pinned to core {}", name, core_id.id);
    } else {
        warn!("[{}] failed to pin to core {}", name, core_id.id);
    }
}

/// Join handle of a running worker, owned by the supervisor.
#[derive(Debug)]
pub struct WorkerHandle {
    name: String,
    handle: JoinHandle<WorkerStats>,
}

impl WorkerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the worker thread exits.
    pub fn join(self) -> Result<WorkerStats, WorkerJoinError> {
        self.handle.join().map_err(|payload| WorkerJoinError {
            name: self.name,
            message: panic_message(payload.as_ref()),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
