use mediator_core::{Behavior, Envelope, MediatorError, Next, async_trait};
use std::time::Instant;

/// Logs each request before it is handled and its outcome afterwards.
///
/// Emits `INFO` events "Handling request" (with the payload) and "Handled
/// request" (with the response and latency), or an `ERROR` event when the
/// pipeline fails. The result is returned exactly as received.
#[derive(Debug, Clone, Copy)]
pub struct LoggingBehavior {
    log_payloads: bool,
}

impl LoggingBehavior {
    /// Log request and response payloads
    #[must_use]
    pub const fn new() -> Self {
        Self { log_payloads: true }
    }

    /// Log request names and timings only
    #[must_use]
    pub const fn without_payloads() -> Self {
        Self {
            log_payloads: false,
        }
    }
}

impl Default for LoggingBehavior {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Behavior for LoggingBehavior {
    async fn handle(&self, request: Envelope, next: Next<'_>) -> Result<Envelope, MediatorError> {
        let name = request.short_name();
        if self.log_payloads {
            tracing::info!(request = name, payload = ?request, "Handling request");
        } else {
            tracing::info!(request = name, "Handling request");
        }

        let start = Instant::now();
        let result = next.run(request).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(response) if self.log_payloads => {
                tracing::info!(request = name, response = ?response, elapsed_ms, "Handled request");
            }
            Ok(_) => tracing::info!(request = name, elapsed_ms, "Handled request"),
            Err(error) => {
                tracing::error!(request = name, error = %error, elapsed_ms, "Request failed");
            }
        }

        result
    }

    fn name(&self) -> &'static str {
        "LoggingBehavior"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use mediator_core::{BoxError, Context, Request, TypedHandler, handler_fn};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct Checkout {
        room: u16,
    }

    impl Request for Checkout {
        type Response = String;
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    async fn run_logged(
        behavior: LoggingBehavior,
        succeed: bool,
    ) -> (Result<Envelope, MediatorError>, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let handler = TypedHandler::new(handler_fn(move |request: Checkout, _ctx| async move {
            if succeed {
                Ok::<_, BoxError>(format!("room {} vacated", request.room))
            } else {
                Err("key card not returned".into())
            }
        }));
        let behaviors: Vec<Arc<dyn Behavior>> = vec![Arc::new(behavior)];
        let ctx = Context::default();

        let result = Next::new(&behaviors, &handler, &ctx)
            .run(Envelope::new(Checkout { room: 12 }))
            .await;
        (result, captured.text())
    }

    #[tokio::test]
    async fn response_passes_through_unchanged() {
        let (result, logs) = run_logged(LoggingBehavior::new(), true).await;

        let response = result.unwrap().downcast::<String>().ok();
        assert_eq!(response.as_deref(), Some("room 12 vacated"));
        assert!(logs.contains("Handling request"));
        assert!(logs.contains("Checkout { room: 12 }"));
        assert!(logs.contains("Handled request"));
    }

    #[tokio::test]
    async fn failure_passes_through_and_is_logged() {
        let (result, logs) = run_logged(LoggingBehavior::new(), false).await;

        let err = result.unwrap_err();
        assert!(matches!(err, MediatorError::Handler { request: "Checkout", .. }));
        assert!(logs.contains("Request failed"));
        assert!(logs.contains("key card not returned"));
    }

    #[tokio::test]
    async fn payloads_can_be_omitted() {
        let (result, logs) = run_logged(LoggingBehavior::without_payloads(), true).await;

        assert!(result.is_ok());
        assert!(logs.contains("Handled request"));
        assert!(!logs.contains("room: 12"));
    }
}
