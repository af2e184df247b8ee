//! ota.rs
//! Periodic firmware update check.
//!
//! The checker asks an [`UpdateSource`] whether a newer image exists and asks
//! it to apply one when offered. A/B partition handling and signature checks
//! belong to the source implementation; the gateway ships only [`NoUpdates`].

use std::time::Duration;

use log::info;

use crate::error::CycleError;
use crate::runtime::worker::PeriodicWorker;

pub const OTA_WORKER_NAME: &str = "OTACore";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateManifest {
    pub version: String,
}

pub trait UpdateSource: Send {
    fn check(&mut self, current_version: &str) -> Result<Option<UpdateManifest>, CycleError>;

    fn apply(&mut self, manifest: &UpdateManifest) -> Result<(), CycleError>;
}

/// Source that never offers an update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoUpdates;

impl UpdateSource for NoUpdates {
    fn check(&mut self, _current_version: &str) -> Result<Option<UpdateManifest>, CycleError> {
        Ok(None)
    }

    fn apply(&mut self, _manifest: &UpdateManifest) -> Result<(), CycleError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    UpToDate,
    Applied { from: String, to: String },
}

pub struct UpdateChecker<S> {
    current_version: String,
    source: S,
}

impl<S: UpdateSource + 'static> UpdateChecker<S> {
    pub fn new(current_version: impl Into<String>, source: S) -> Self {
        Self {
            current_version: current_version.into(),
            source,
        }
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    pub fn cycle(&mut self) -> Result<UpdateOutcome, CycleError> {
        info!("[OTA] Checking for A/B firmware updates...");
        info!("[OTA] Current version: {}", self.current_version);

        let Some(manifest) = self.source.check(&self.current_version)? else {
            return Ok(UpdateOutcome::UpToDate);
        };

        info!("[OTA] Update {} available, applying", manifest.version);
        self.source.apply(&manifest)?;
        let from = std::mem::replace(&mut self.current_version, manifest.version.clone());
        info!("[OTA] Now running {}", self.current_version);
        Ok(UpdateOutcome::Applied {
            from,
            to: manifest.version,
        })
    }

    pub fn into_worker(mut self, period: Duration) -> PeriodicWorker {
        PeriodicWorker::new(OTA_WORKER_NAME, period, move || self.cycle().map(|_| ()))
    }
}
