//! Stock behaviors.
//!
//! - [`LoggingBehavior`]: structured `tracing` events around every dispatch
//! - [`MetricsBehavior`]: request counters and latency histograms

mod logging;
mod metrics;

pub use logging::LoggingBehavior;
pub use metrics::MetricsBehavior;
