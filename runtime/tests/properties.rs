//! Property-based tests for behavior composition
//!
//! For any number of behaviors the chain must nest them in registration
//! order around exactly one handler call, and a logging behavior must never
//! change what the handler returned.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use mediator_runtime::behaviors::{LoggingBehavior, MetricsBehavior};
use mediator_runtime::{BoxError, Mediator, Request};
use mediator_testing::helpers::expected_trace;
use mediator_testing::properties::behavior_labels;
use mediator_testing::{CallLog, CountingHandler, RecordingBehavior};
use proptest::prelude::*;
use std::sync::atomic::Ordering;

#[derive(Debug)]
struct Echo(String);

impl Request for Echo {
    type Response = String;
}

#[derive(Debug)]
struct Ping;

impl Request for Ping {
    type Response = u64;
}

proptest! {
    /// Property: behaviors nest in registration order around one handler call
    #[test]
    fn behaviors_nest_in_registration_order(labels in behavior_labels(8)) {
        let log = CallLog::new();
        let handler = CountingHandler::<Ping>::new(7).with_log(&log);
        let calls = handler.counter();

        let mut builder = Mediator::builder();
        for label in &labels {
            builder = builder.behavior(RecordingBehavior::new(label.as_str(), &log));
        }
        let mediator = builder.handler::<Ping, _>(handler).build().unwrap();

        let response = tokio_test::block_on(mediator.send(Ping)).unwrap();

        prop_assert_eq!(response, 7);
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
        prop_assert_eq!(log.entries(), expected_trace(&labels));
    }

    /// Property: stock behaviors never alter the handler's response
    #[test]
    fn stock_behaviors_pass_responses_through(payload in ".{0,64}") {
        let mediator = Mediator::builder()
            .behavior(LoggingBehavior::new())
            .behavior(MetricsBehavior)
            .handler_fn(|request: Echo, _ctx| async move { Ok::<_, BoxError>(request.0) })
            .build()
            .unwrap();

        let response = tokio_test::block_on(mediator.send(Echo(payload.clone()))).unwrap();

        prop_assert_eq!(response, payload);
    }
}
