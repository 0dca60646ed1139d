//! # Mediator Testing
//!
//! Testing utilities and helpers for the typed request mediator.
//!
//! This crate provides:
//! - Test doubles for handlers, behaviors and notification handlers
//! - A shared call log for asserting invocation order
//! - A Given-When-Then harness for dispatch tests
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use mediator_testing::{CallLog, CountingHandler, RecordingBehavior};
//! use mediator_runtime::Mediator;
//!
//! #[tokio::test]
//! async fn test_behavior_order() {
//!     let log = CallLog::new();
//!     let mediator = Mediator::builder()
//!         .behavior(RecordingBehavior::new("outer", &log))
//!         .behavior(RecordingBehavior::new("inner", &log))
//!         .handler::<Ping, _>(CountingHandler::new(Pong).with_log(&log))
//!         .build()
//!         .unwrap();
//!
//!     mediator.send(Ping).await.unwrap();
//!     assert_eq!(log.entries(), ["outer-pre", "inner-pre", "handler", "inner-post", "outer-post"]);
//! }
//! ```


pub use dispatch_test::DispatchTest;

/// Test doubles.
pub mod mocks {
    use mediator_core::{
        Behavior, BoxError, Context, Envelope, MediatorError, Next, Notification,
        NotificationHandler, Request, RequestHandler, async_trait,
    };
    use std::fmt;
    use std::marker::PhantomData;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use thiserror::Error;

    /// Shared, ordered record of calls made during a test.
    ///
    /// Clones share the same log.
    #[derive(Debug, Clone, Default)]
    pub struct CallLog {
        entries: Arc<Mutex<Vec<String>>>,
    }

    impl CallLog {
        /// Create an empty log
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Append an entry
        pub fn push(&self, entry: impl Into<String>) {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(entry.into());
        }

        /// Snapshot of all entries, oldest first
        #[must_use]
        pub fn entries(&self) -> Vec<String> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of entries
        #[must_use]
        pub fn len(&self) -> usize {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether nothing has been logged
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Remove all entries
        pub fn clear(&self) {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
    }

    /// Failure returned by [`FailingHandler`].
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    #[error("{0}")]
    pub struct TestFailure(pub String);

    /// Logs `<label>-pre` before and `<label>-post` after the rest of the chain.
    #[derive(Debug, Clone)]
    pub struct RecordingBehavior {
        label: String,
        log: CallLog,
    }

    impl RecordingBehavior {
        /// Create a behavior writing to `log`
        #[must_use]
        pub fn new(label: impl Into<String>, log: &CallLog) -> Self {
            Self {
                label: label.into(),
                log: log.clone(),
            }
        }
    }

    #[async_trait]
    impl Behavior for RecordingBehavior {
        async fn handle(
            &self,
            request: Envelope,
            next: Next<'_>,
        ) -> Result<Envelope, MediatorError> {
            self.log.push(format!("{}-pre", self.label));
            let result = next.run(request).await;
            self.log.push(format!("{}-post", self.label));
            result
        }
    }

    /// Returns a fixed response without calling the rest of the chain.
    pub struct ShortCircuitBehavior<T> {
        response: T,
        calls: Arc<AtomicUsize>,
    }

    impl<T> ShortCircuitBehavior<T>
    where
        T: Clone + fmt::Debug + Send + Sync + 'static,
    {
        /// Answer every request with `response`
        #[must_use]
        pub fn new(response: T) -> Self {
            Self {
                response,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Number of requests answered
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<T> Behavior for ShortCircuitBehavior<T>
    where
        T: Clone + fmt::Debug + Send + Sync + 'static,
    {
        async fn handle(
            &self,
            _request: Envelope,
            _next: Next<'_>,
        ) -> Result<Envelope, MediatorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Envelope::new(self.response.clone()))
        }
    }

    /// Fails every request with [`MediatorError::Behavior`].
    #[derive(Debug, Clone)]
    pub struct RejectingBehavior {
        reason: String,
    }

    impl RejectingBehavior {
        /// Reject with `reason`
        #[must_use]
        pub fn new(reason: impl Into<String>) -> Self {
            Self {
                reason: reason.into(),
            }
        }
    }

    #[async_trait]
    impl Behavior for RejectingBehavior {
        async fn handle(
            &self,
            _request: Envelope,
            _next: Next<'_>,
        ) -> Result<Envelope, MediatorError> {
            Err(MediatorError::behavior(
                self.name(),
                TestFailure(self.reason.clone()),
            ))
        }

        fn name(&self) -> &'static str {
            "RejectingBehavior"
        }
    }

    /// Answers with a fixed response and counts its invocations.
    pub struct CountingHandler<R: Request> {
        response: R::Response,
        calls: Arc<AtomicUsize>,
        log: Option<CallLog>,
        _request: PhantomData<fn() -> R>,
    }

    impl<R> CountingHandler<R>
    where
        R: Request,
        R::Response: Clone,
    {
        /// Answer every request with `response`
        #[must_use]
        pub fn new(response: R::Response) -> Self {
            Self {
                response,
                calls: Arc::new(AtomicUsize::new(0)),
                log: None,
                _request: PhantomData,
            }
        }

        /// Also log `handler` on every call
        #[must_use]
        pub fn with_log(mut self, log: &CallLog) -> Self {
            self.log = Some(log.clone());
            self
        }

        /// Shared invocation counter, readable after the handler is moved
        /// into a mediator.
        #[must_use]
        pub fn counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl<R> RequestHandler<R> for CountingHandler<R>
    where
        R: Request,
        R::Response: Clone,
    {
        async fn handle(&self, _request: R, _ctx: &Context) -> Result<R::Response, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(log) = &self.log {
                log.push("handler");
            }
            Ok(self.response.clone())
        }
    }

    /// Fails every request with a [`TestFailure`].
    #[derive(Debug, Clone)]
    pub struct FailingHandler {
        message: String,
    }

    impl FailingHandler {
        /// Fail with `message`
        #[must_use]
        pub fn new(message: impl Into<String>) -> Self {
            Self {
                message: message.into(),
            }
        }
    }

    #[async_trait]
    impl<R: Request> RequestHandler<R> for FailingHandler {
        async fn handle(&self, _request: R, _ctx: &Context) -> Result<R::Response, BoxError> {
            Err(TestFailure(self.message.clone()).into())
        }
    }

    /// Keeps a copy of every notification it receives.
    pub struct CollectingNotificationHandler<N> {
        received: Arc<Mutex<Vec<N>>>,
        log: Option<(String, CallLog)>,
    }

    impl<N: Notification + Clone> CollectingNotificationHandler<N> {
        /// Create an empty collector
        #[must_use]
        pub fn new() -> Self {
            Self {
                received: Arc::new(Mutex::new(Vec::new())),
                log: None,
            }
        }

        /// Also log `label` on every delivery
        #[must_use]
        pub fn with_log(mut self, label: impl Into<String>, log: &CallLog) -> Self {
            self.log = Some((label.into(), log.clone()));
            self
        }

        /// Shared view of the received notifications
        #[must_use]
        pub fn received(&self) -> Arc<Mutex<Vec<N>>> {
            Arc::clone(&self.received)
        }
    }

    impl<N: Notification + Clone> Default for CollectingNotificationHandler<N> {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl<N: Notification + Clone> NotificationHandler<N> for CollectingNotificationHandler<N> {
        async fn handle(&self, notification: &N, _ctx: &Context) -> Result<(), BoxError> {
            if let Some((label, log)) = &self.log {
                log.push(label.clone());
            }
            self.received
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(notification.clone());
            Ok(())
        }
    }
}

/// Test helpers and utilities.
pub mod helpers {
    /// The call trace expected when behaviors `labels` (outermost first)
    /// wrap a handler that logs `handler`.
    ///
    /// # Example
    ///
    /// ```
    /// use mediator_testing::helpers::expected_trace;
    ///
    /// assert_eq!(
    ///     expected_trace(&["b1", "b2"]),
    ///     ["b1-pre", "b2-pre", "handler", "b2-post", "b1-post"]
    /// );
    /// ```
    #[must_use]
    pub fn expected_trace<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
        let pre = labels.iter().map(|label| format!("{}-pre", label.as_ref()));
        let post = labels
            .iter()
            .rev()
            .map(|label| format!("{}-post", label.as_ref()));
        pre.chain(std::iter::once("handler".to_string()))
            .chain(post)
            .collect()
    }

    /// Install a `tracing` subscriber that writes through the test harness.
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Property-based testing strategies.
pub mod properties {
    use proptest::prelude::*;

    /// Between zero and `max` behavior labels.
    #[must_use]
    pub fn behavior_labels(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z]{1,8}", 0..=max)
    }
}

// Re-export commonly used items
pub use mocks::{
    CallLog, CollectingNotificationHandler, CountingHandler, FailingHandler, RecordingBehavior,
    RejectingBehavior, ShortCircuitBehavior, TestFailure,
};
