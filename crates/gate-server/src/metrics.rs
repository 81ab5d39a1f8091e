//! Aggregate performance metrics
//!
//! Counters are process-lifetime and monotonically increasing; there is no
//! reset operation. Each field is updated with a single atomic operation so
//! concurrent request completions cannot lose updates.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counter set updated by the backend selector
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    /// Total completed calls
    total_requests: AtomicU64,

    /// Cumulative response time in microseconds
    cumulative_response_us: AtomicU64,

    /// Calls served by the local backend
    local_requests: AtomicU64,

    /// Calls served by the remote API backend
    api_requests: AtomicU64,
}

/// Read-only snapshot of the counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub avg_response_time_ms: f64,
    pub local_requests: u64,
    pub api_requests: u64,
}

impl GatewayMetrics {
    /// Create a zeroed counter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed local call
    pub fn record_local(&self, elapsed_ms: f64) {
        self.local_requests.fetch_add(1, Ordering::Relaxed);
        self.record_completion(elapsed_ms);
    }

    /// Record a completed API call
    pub fn record_api(&self, elapsed_ms: f64) {
        self.api_requests.fetch_add(1, Ordering::Relaxed);
        self.record_completion(elapsed_ms);
    }

    fn record_completion(&self, elapsed_ms: f64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let elapsed_us = (elapsed_ms * 1000.0) as u64;
        self.cumulative_response_us
            .fetch_add(elapsed_us, Ordering::Relaxed);
    }

    /// Get total completed calls
    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Get local call count
    pub fn local_requests(&self) -> u64 {
        self.local_requests.load(Ordering::Relaxed)
    }

    /// Get API call count
    pub fn api_requests(&self) -> u64 {
        self.api_requests.load(Ordering::Relaxed)
    }

    /// Take a read-only snapshot
    ///
    /// The average is zero when no calls have completed.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total_requests.load(Ordering::Relaxed);
        let cumulative_us = self.cumulative_response_us.load(Ordering::Relaxed);

        let avg_response_time_ms = if total > 0 {
            (cumulative_us as f64 / 1000.0) / total as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_requests: total,
            avg_response_time_ms,
            local_requests: self.local_requests.load(Ordering::Relaxed),
            api_requests: self.api_requests.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_has_zero_average() {
        let metrics = GatewayMetrics::new();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.avg_response_time_ms, 0.0);
    }

    #[test]
    fn test_record_local() {
        let metrics = GatewayMetrics::new();
        metrics.record_local(500.0);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 1);
        assert_eq!(snapshot.local_requests, 1);
        assert_eq!(snapshot.api_requests, 0);
        assert_eq!(snapshot.avg_response_time_ms, 500.0);
    }

    #[test]
    fn test_record_api() {
        let metrics = GatewayMetrics::new();
        metrics.record_api(100.0);
        metrics.record_api(300.0);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.api_requests, 2);
        assert_eq!(snapshot.local_requests, 0);
        assert_eq!(snapshot.avg_response_time_ms, 200.0);
    }

    #[test]
    fn test_counters_are_monotonic() {
        let metrics = GatewayMetrics::new();
        metrics.record_local(10.0);
        metrics.record_api(20.0);
        metrics.record_local(30.0);

        assert_eq!(metrics.total_requests(), 3);
        assert_eq!(metrics.local_requests(), 2);
        assert_eq!(metrics.api_requests(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        use std::sync::Arc;

        let metrics = Arc::new(GatewayMetrics::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let metrics = metrics.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    metrics.record_api(1.0);
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(metrics.total_requests(), 800);
        assert_eq!(metrics.api_requests(), 800);
    }
}
