//! # Metrics
//!
//! Prometheus export of the counters recorded through the `metrics` facade.
//!
//! **Counters:**
//! - `atlas_rerank_cache_total{result}` - Ranking cache hits and misses
//! - `atlas_oracle_fallback_total{oracle, reason}` - Oracle calls that fell back
//! - `atlas_provider_fallback_total{provider}` - Provider calls that fell back
//!
//! **Gauges** (refreshed on every scrape):
//! - `atlas_sessions_active` - Live conversation sessions
//! - `atlas_rerank_cache_entries` - Entries in the ranking cache

pub mod handler;

pub use metrics_exporter_prometheus::PrometheusBuilder;

use crate::recommend::RecommendationCache;
use crate::session::SessionStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::time::Instant;

/// Renders the exporter output and computes scrape-time gauges.
pub struct MetricsCollector {
    start_time: Instant,
    prometheus_handle: PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(start_time: Instant, prometheus_handle: PrometheusHandle) -> Self {
        Self {
            start_time,
            prometheus_handle,
        }
    }

    /// Update gauges derived from live state.
    pub fn update_gauges(&self, sessions: &SessionStore, cache: &RecommendationCache) {
        metrics::gauge!("atlas_sessions_active").set(sessions.len() as f64);
        metrics::gauge!("atlas_rerank_cache_entries").set(cache.len() as f64);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Install the global Prometheus recorder.
///
/// Fails when a recorder is already installed (e.g. a second server in the
/// same test process); callers then build a detached handle instead.
pub fn setup_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(
        "atlas_rerank_cache_total",
        "Ranking cache lookups by result"
    );
    metrics::describe_counter!(
        "atlas_oracle_fallback_total",
        "Oracle calls that degraded to their fallback"
    );
    metrics::describe_counter!(
        "atlas_provider_fallback_total",
        "Provider calls that degraded to substitute data"
    );

    Ok(handle)
}

/// A working handle, installing the global recorder when possible.
pub fn metrics_handle() -> PrometheusHandle {
    setup_metrics().unwrap_or_else(|e| {
        tracing::debug!("Metrics already initialized, creating new handle: {}", e);
        PrometheusBuilder::new().build_recorder().handle()
    })
}
