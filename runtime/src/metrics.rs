//! Prometheus metrics for request dispatch.
//!
//! [`MediatorMetrics`] records per-request-type counters and latency
//! histograms through the `metrics` facade. [`MetricsExporter`] installs a
//! Prometheus recorder so those metrics can be rendered in the text
//! exposition format.
//!
//! # Example
//!
//! ```rust,no_run
//! use mediator_runtime::metrics::MetricsExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut exporter = MetricsExporter::new();
//! exporter.install()?;
//!
//! // ... dispatch requests ...
//!
//! if let Some(text) = exporter.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Requests dispatched, labelled by request type
pub const REQUESTS_TOTAL: &str = "mediator_requests_total";
/// Requests that returned an error, labelled by request type
pub const REQUEST_FAILURES_TOTAL: &str = "mediator_request_failures_total";
/// End-to-end dispatch latency, labelled by request type
pub const REQUEST_DURATION_SECONDS: &str = "mediator_request_duration_seconds";

const LATENCY_BUCKETS: &[f64] = &[
    0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0,
];

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installs the Prometheus recorder and renders collected metrics.
#[derive(Default)]
pub struct MetricsExporter {
    handle: Option<PrometheusHandle>,
}

impl MetricsExporter {
    /// Create an exporter that has not been installed yet
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe the mediator metrics and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the recorder cannot be built or installed.
    ///
    /// # Note
    ///
    /// Only one global recorder can exist per process. If one is already
    /// installed this logs a warning and succeeds without a handle, so
    /// [`render`](Self::render) returns `None`.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                LATENCY_BUCKETS,
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                register_metrics();
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this exporter did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

impl std::fmt::Debug for MetricsExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsExporter")
            .field("installed", &self.handle.is_some())
            .finish()
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of requests dispatched");
    describe_counter!(
        REQUEST_FAILURES_TOTAL,
        "Total number of requests whose pipeline returned an error"
    );
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Time taken to dispatch a request through behaviors and handler"
    );
}

/// Dispatch metrics recorder.
pub struct MediatorMetrics;

impl MediatorMetrics {
    /// Record a request entering the pipeline.
    pub fn record_request(request: &'static str) {
        counter!(REQUESTS_TOTAL, "request" => request).increment(1);
    }

    /// Record a completed dispatch and its latency.
    pub fn record_duration(request: &'static str, duration: Duration) {
        histogram!(REQUEST_DURATION_SECONDS, "request" => request).record(duration.as_secs_f64());
    }

    /// Record a failed dispatch.
    pub fn record_failure(request: &'static str) {
        counter!(REQUEST_FAILURES_TOTAL, "request" => request).increment(1);
    }
}
