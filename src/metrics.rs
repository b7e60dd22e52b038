// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

/// One-time metric registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "load_attempts_total",
            "Candidate locations tried for the review file."
        );
        describe_counter!(
            "load_failures_total",
            "Review file loads that ended in an error."
        );
        describe_gauge!("reviews_loaded", "Reviews currently held in the store.");
        describe_counter!(
            "classify_requests_total",
            "Requests issued to the inference service."
        );
        describe_counter!("classify_errors_total", "Inference requests that failed.");
        describe_histogram!(
            "classify_duration_ms",
            "Inference round-trip time in milliseconds."
        );
    });
}

impl Metrics {
    /// Initialize the Prometheus recorder.
    pub fn init() -> Self {
        // Use default buckets to avoid API differences across crate versions.
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        ensure_metrics_described();

        Self { handle }
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
