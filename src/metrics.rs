//! Fetch latency and outcome metrics
//!
//! Every market list or coin details request is recorded here so a consumer
//! can tell a slow provider from a rate-limited one.

use crate::error::FailureKind;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for percentile calculation
const MAX_SAMPLES: usize = 100;

/// Snapshot of a provider's recent behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct FetchMetrics {
    /// Name of the provider
    pub provider_name: String,
    /// 50th percentile latency of successful requests in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful requests in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0) over the provider's lifetime
    pub success_rate: f64,
    /// Total number of requests tracked
    pub total_requests: u64,
    /// Number of failed requests
    pub failed_requests: u64,
    /// Failed requests that were rate limited
    pub rate_limited_requests: u64,
}

impl FetchMetrics {
    /// Creates metrics with no data
    pub fn empty(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
            rate_limited_requests: 0,
        }
    }
}

#[derive(Debug, Default)]
struct MetricsWindow {
    /// Latencies of recent successful requests
    latencies_ms: VecDeque<f64>,
    total: u64,
    failed: u64,
    rate_limited: u64,
}

/// Collects request outcomes for one provider
pub struct MetricsCollector {
    provider_name: String,
    window: RwLock<MetricsWindow>,
}

impl MetricsCollector {
    /// Creates a new metrics collector for a provider
    pub fn new(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            window: RwLock::new(MetricsWindow::default()),
        }
    }

    /// Records a request with its duration and, for failures, its kind
    pub async fn record(&self, duration: Duration, failure: Option<FailureKind>) {
        let mut window = self.window.write().await;
        window.total += 1;

        match failure {
            None => {
                if window.latencies_ms.len() >= MAX_SAMPLES {
                    window.latencies_ms.pop_front();
                }
                window
                    .latencies_ms
                    .push_back(duration.as_secs_f64() * 1000.0);
            }
            Some(kind) => {
                window.failed += 1;
                if kind == FailureKind::RateLimited {
                    window.rate_limited += 1;
                }
            }
        }
    }

    /// Computes current metrics from collected samples
    pub async fn snapshot(&self) -> FetchMetrics {
        let window = self.window.read().await;
        if window.total == 0 {
            return FetchMetrics::empty(&self.provider_name);
        }

        let mut latencies: Vec<f64> = window.latencies_ms.iter().copied().collect();
        latencies.sort_by(|a, b| a.total_cmp(b));

        FetchMetrics {
            provider_name: self.provider_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate: (window.total - window.failed) as f64 / window.total as f64,
            total_requests: window.total,
            failed_requests: window.failed,
            rate_limited_requests: window.rate_limited,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_collector() {
        let collector = MetricsCollector::new("test");

        collector.record(Duration::from_millis(100), None).await;
        collector.record(Duration::from_millis(200), None).await;
        collector
            .record(Duration::from_millis(150), Some(FailureKind::RateLimited))
            .await;

        let metrics = collector.snapshot().await;

        assert_eq!(metrics.provider_name, "test");
        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.rate_limited_requests, 1);
        assert!(metrics.success_rate > 0.6 && metrics.success_rate < 0.7);
        assert_eq!(metrics.latency_p99_ms, 200.0);
    }

    #[tokio::test]
    async fn test_empty_metrics() {
        let metrics = MetricsCollector::new("idle").snapshot().await;
        assert_eq!(metrics, FetchMetrics::empty("idle"));
    }

    #[test]
    fn test_percentile() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0];
        assert_eq!(percentile(&values, 50.0), 6.0);
        assert_eq!(percentile(&values, 99.0), 11.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
