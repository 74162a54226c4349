//! Two-state scan-loop backoff policy

use std::time::Duration;

/// Sleep policy for the scan loop: a normal cadence interval, and a longer
/// backoff interval after a cycle that errored. The loop itself never
/// terminates on an error.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub scan_interval: Duration,
    pub error_backoff: Duration,
}

impl BackoffPolicy {
    pub fn new(scan_interval_ms: u64, error_backoff_ms: u64) -> Self {
        Self {
            scan_interval: Duration::from_millis(scan_interval_ms),
            error_backoff: Duration::from_millis(error_backoff_ms),
        }
    }

    pub fn delay(&self, last_cycle_errored: bool) -> Duration {
        if last_cycle_errored {
            self.error_backoff
        } else {
            self.scan_interval
        }
    }
}
