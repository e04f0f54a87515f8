//! # Metrics
//!
//! Prometheus counters and histograms for upstream calls and page aggregates,
//! exposed on `GET /metrics`.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `homelab_upstream_requests_total{upstream, outcome}` - Settled upstream calls
//! - `homelab_aggregate_failures_total{page}` - Aggregates rejected by policy
//!
//! **Histograms:**
//! - `homelab_upstream_latency_seconds{upstream}` - Upstream call latency

pub mod handler;

pub use metrics_exporter_prometheus::PrometheusHandle;

use crate::upstream::UpstreamResult;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const UPSTREAM_LATENCY: &str = "homelab_upstream_latency_seconds";
pub const UPSTREAM_REQUESTS: &str = "homelab_upstream_requests_total";
pub const AGGREGATE_FAILURES: &str = "homelab_aggregate_failures_total";

/// Upstream calls are bounded by short timeouts, so buckets stop at 30s.
const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 30.0];

static HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

/// Install the process-wide Prometheus recorder.
///
/// The first call installs it; later calls (several routers in one test
/// binary, for example) get a clone of the same handle.
pub fn setup_metrics() -> Result<PrometheusHandle, BuildError> {
    let mut slot = HANDLE.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let recorder = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(UPSTREAM_LATENCY.to_string()), LATENCY_BUCKETS)?
        .build_recorder();
    let handle = recorder.handle();

    if metrics::set_global_recorder(recorder).is_err() {
        tracing::warn!("A metrics recorder was already installed; /metrics will be empty");
    }

    *slot = Some(handle.clone());
    Ok(handle)
}

/// Record one settled upstream call.
pub fn record_upstream(upstream: &str, outcome: &UpstreamResult, latency: Duration) {
    let outcome = match outcome {
        UpstreamResult::Success(_) => "success",
        UpstreamResult::Failure(reason) => reason.kind(),
    };
    metrics::histogram!(UPSTREAM_LATENCY, "upstream" => upstream.to_string())
        .record(latency.as_secs_f64());
    metrics::counter!(
        UPSTREAM_REQUESTS,
        "upstream" => upstream.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record an aggregate rejected by its degradation policy.
pub fn record_aggregate_failure(page: &str) {
    metrics::counter!(AGGREGATE_FAILURES, "page" => page.to_string()).increment(1);
}

/// Renders the exposition text and tracks process uptime.
#[derive(Clone)]
pub struct MetricsCollector {
    start_time: Instant,
    handle: PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(start_time: Instant, handle: PrometheusHandle) -> Self {
        Self { start_time, handle }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn render_metrics(&self) -> String {
        self.handle.render()
    }
}
