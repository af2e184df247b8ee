// Placeholder collaborators sharing the periodic worker pattern:
// cloud uplink, OTA update checker, host health monitor.

pub mod cloud;
pub mod health;
pub mod ota;
