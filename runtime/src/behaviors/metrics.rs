use crate::metrics::MediatorMetrics;
use mediator_core::{Behavior, Envelope, MediatorError, Next, async_trait};
use std::time::Instant;

/// Records a counter, a failure counter and a latency histogram per request type.
///
/// Metrics go to whatever recorder is installed; see
/// [`MetricsExporter`](crate::metrics::MetricsExporter).
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsBehavior;

#[async_trait]
impl Behavior for MetricsBehavior {
    async fn handle(&self, request: Envelope, next: Next<'_>) -> Result<Envelope, MediatorError> {
        let name = request.short_name();
        MediatorMetrics::record_request(name);

        let start = Instant::now();
        let result = next.run(request).await;
        MediatorMetrics::record_duration(name, start.elapsed());

        if result.is_err() {
            MediatorMetrics::record_failure(name);
        }
        result
    }

    fn name(&self) -> &'static str {
        "MetricsBehavior"
    }
}
