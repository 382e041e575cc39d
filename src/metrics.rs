// src/metrics.rs
//! Prometheus recorder and `/metrics` route.
//!
//! Counters are emitted through the `metrics` facade from the pipeline and the API, so
//! they are no-ops until `Metrics::init` installs the recorder.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const REQUESTS_TOTAL: &str = "summarize_requests_total";
pub const CACHE_HITS_TOTAL: &str = "summarize_cache_hits_total";
pub const FALLBACK_FAILURES_TOTAL: &str = "summarize_fallback_failures_total";
pub const FALLBACK_SKIPPED_TOTAL: &str = "summarize_fallback_skipped_total";
pub const EMPTY_INPUT_TOTAL: &str = "summarize_empty_input_total";
pub const DURATION_MS: &str = "summarize_duration_ms";
const CACHE_TTL_GAUGE: &str = "summarize_cache_ttl_secs";

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if a recorder is already installed.
    pub fn init(cache_ttl_secs: u64) -> Result<Self, BuildError> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        describe();

        // Static gauge with current TTL (absolute TTL, no sliding refresh)
        gauge!(CACHE_TTL_GAUGE).set(cache_ttl_secs as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!(REQUESTS_TOTAL, "Summarize requests received.");
    describe_counter!(CACHE_HITS_TOTAL, "Summaries served from the cache.");
    describe_counter!(
        FALLBACK_FAILURES_TOTAL,
        "Fallback condenser failures (digest omitted)."
    );
    describe_counter!(
        FALLBACK_SKIPPED_TOTAL,
        "Digests skipped because the body exceeded the condenser's sentence limit."
    );
    describe_counter!(EMPTY_INPUT_TOTAL, "Requests whose body was empty after cleaning.");
    describe_histogram!(DURATION_MS, "Summarization time in milliseconds.");
}
