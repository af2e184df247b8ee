//! Run report: per-worker counters collected when the supervisor joins.
//!
//! Logged at shutdown and optionally exported to CSV, one row per worker:
//! worker, status, cycles, failures, uptime_ms.

use std::path::Path;

use csv::Writer;
use log::info;
use serde::Serialize;

use crate::runtime::worker::WorkerStats;

#[derive(Debug, Default, Clone)]
pub struct RunReport {
    /// Workers that exited normally, in start order.
    pub workers: Vec<WorkerStats>,
    /// Workers whose thread panicked.
    pub crashed: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    worker: &'a str,
    status: &'static str,
    cycles: u64,
    failures: u64,
    uptime_ms: u64,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.crashed.is_empty()
    }

    pub fn total_cycles(&self) -> u64 {
        self.workers.iter().map(|w| w.cycles).sum()
    }

    pub fn log_summary(&self) {
        for w in &self.workers {
            info!(
                "[SYSTEM] {}: {} cycles, {} failed, up {:.1}s",
                w.name,
                w.cycles,
                w.failures,
                w.uptime.as_secs_f64()
            );
        }
        for name in &self.crashed {
            info!("[SYSTEM] {}: crashed", name);
        }
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut wtr = Writer::from_path(path)?;
        for w in &self.workers {
            wtr.serialize(ReportRow {
                worker: &w.name,
                status: "stopped",
                cycles: w.cycles,
                failures: w.failures,
                uptime_ms: w.uptime.as_millis() as u64,
            })?;
        }
        for name in &self.crashed {
            wtr.serialize(ReportRow {
                worker: name,
                status: "crashed",
                cycles: 0,
                failures: 0,
                uptime_ms: 0,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, time::Duration};

    fn stats(name: &str, cycles: u64, failures: u64) -> WorkerStats {
        WorkerStats {
            name: name.to_string(),
            cycles,
            failures,
            uptime: Duration::from_millis(1500),
        }
    }

    #[test]
    fn writes_one_row_per_worker() {
        let report = RunReport {
            workers: vec![stats("SensorCore", 10, 0), stats("SecurityCore", 2, 1)],
            crashed: vec!["CloudCore".to_string()],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        report.write_csv(&path).unwrap();

        let csv = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "worker,status,cycles,failures,uptime_ms");
        assert_eq!(lines[1], "SensorCore,stopped,10,0,1500");
        assert_eq!(lines[2], "SecurityCore,stopped,2,1,1500");
        assert_eq!(lines[3], "CloudCore,crashed,0,0,0");
    }

    #[test]
    fn totals_and_cleanliness() {
        let mut report = RunReport {
            workers: vec![stats("a", 3, 0), stats("b", 4, 2)],
            crashed: Vec::new(),
        };
        assert_eq!(report.total_cycles(), 7);
        assert!(report.is_clean());
        report.crashed.push("c".into());
        assert!(!report.is_clean());
    }
}
