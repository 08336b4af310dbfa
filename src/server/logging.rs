//! In-memory usage metrics.
//!
//! Counters only: the dashboard is a single-session demonstration and keeps
//! no scan history on disk. Each scan still emits one structured tracing
//! line for the operator console.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use crate::verdict::ScanLabel;

#[derive(Default)]
pub struct UsageMetrics {
    pub total_requests: AtomicU64,
    pub total_errors: AtomicU64,

    pub licit: AtomicU64,
    pub illicit: AtomicU64,

    pub ep_panel: AtomicU64,
    pub ep_scan: AtomicU64,
    pub ep_stats: AtomicU64,
}

impl UsageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_scan(&self, label: ScanLabel, probability: f64, processing_time_ms: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        match label {
            ScanLabel::Licit => {
                self.licit.fetch_add(1, Ordering::Relaxed);
            }
            ScanLabel::Illicit => {
                self.illicit.fetch_add(1, Ordering::Relaxed);
            }
        }

        info!(
            label = %label.as_str(),
            probability,
            processing_time_ms,
            "scan completed"
        );
    }

    pub fn record_error(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_errors.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_scan_counts_by_label() {
        let metrics = UsageMetrics::new();
        metrics.record_scan(ScanLabel::Illicit, 0.9, 1);
        metrics.record_scan(ScanLabel::Illicit, 0.8, 1);
        metrics.record_scan(ScanLabel::Licit, 0.1, 1);

        assert_eq!(metrics.total_requests.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.illicit.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.licit.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.total_errors.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_error_counts_request_and_error() {
        let metrics = UsageMetrics::new();
        metrics.record_error();

        assert_eq!(metrics.total_requests.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.total_errors.load(Ordering::Relaxed), 1);
    }
}
