//! health.rs
//! Host health check based on the kernel load average.
//! Reads `/proc/loadavg` each period and reports a pass/fail verdict against a
//! load threshold. An unreadable or malformed file fails that cycle only.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use log::{info, warn};

use crate::error::CycleError;
use crate::runtime::worker::PeriodicWorker;

pub const HEALTH_WORKER_NAME: &str = "SecurityCore";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

impl FromStr for LoadAverage {
    type Err = CycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let mut next = |label: &'static str| -> Result<f64, CycleError> {
            let raw = fields.next().ok_or_else(|| CycleError::Parse {
                what: "load average",
                detail: format!("missing {} field", label),
            })?;
            raw.parse().map_err(|_| CycleError::Parse {
                what: "load average",
                detail: format!("{} field {:?} is not a number", label, raw),
            })
        };

        Ok(Self {
            one: next("1-minute")?,
            five: next("5-minute")?,
            fifteen: next("15-minute")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthVerdict {
    Healthy,
    Overloaded { load: f64, threshold: f64 },
}

pub struct HealthMonitor {
    loadavg_path: PathBuf,
    threshold: f64,
}

impl HealthMonitor {
    pub fn new(loadavg_path: impl Into<PathBuf>, threshold: f64) -> Self {
        Self {
            loadavg_path: loadavg_path.into(),
            threshold,
        }
    }

    pub fn loadavg_path(&self) -> &Path {
        &self.loadavg_path
    }

    pub fn sample(&self) -> Result<LoadAverage, CycleError> {
        fs::read_to_string(&self.loadavg_path)?.parse()
    }

    pub fn verdict(&self, load: &LoadAverage) -> HealthVerdict {
        if load.one > self.threshold {
            HealthVerdict::Overloaded {
                load: load.one,
                threshold: self.threshold,
            }
        } else {
            HealthVerdict::Healthy
        }
    }

    pub fn cycle(&self) -> Result<HealthVerdict, CycleError> {
        let load = self.sample()?;
        info!("[SECURITY] System Health: Load={:.2}", load.one);

        let verdict = self.verdict(&load);
        match verdict {
            HealthVerdict::Healthy => info!("[SECURITY] Health check passed"),
            HealthVerdict::Overloaded { load, threshold } => warn!(
                "[SECURITY] Health check failed: load {:.2} above {:.2}",
                load, threshold
            ),
        }
        Ok(verdict)
    }

    pub fn into_worker(self, period: Duration) -> PeriodicWorker {
        PeriodicWorker::new(HEALTH_WORKER_NAME, period, move || self.cycle().map(|_| ()))
    }
}
