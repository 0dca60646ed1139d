//! Integration tests for request dispatch through the mediator
//!
//! Covers handler resolution, behavior ordering, short-circuiting, error
//! propagation, notifications, cancellation pass-through and concurrent use.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use mediator_runtime::behaviors::LoggingBehavior;
use mediator_runtime::{
    BoxError, CancellationToken, Context, Mediator, MediatorError, Notification,
    NotificationHandler, Request, RequestHandler, async_trait,
};
use mediator_testing::helpers::expected_trace;
use mediator_testing::{
    CallLog, CollectingNotificationHandler, CountingHandler, FailingHandler, RecordingBehavior,
    ShortCircuitBehavior, TestFailure,
};
use std::sync::Arc;
use std::sync::atomic::Ordering;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug)]
struct ReserveRoom {
    guest: String,
    nights: u32,
}

impl Request for ReserveRoom {
    type Response = Confirmation;
}

#[derive(Debug, Clone, PartialEq)]
struct Confirmation {
    guest: String,
    total: u32,
}

#[derive(Debug)]
struct CancelReservation;

impl Request for CancelReservation {
    type Response = bool;
}

#[derive(Debug, Clone, PartialEq)]
struct RoomReserved {
    guest: String,
}

impl Notification for RoomReserved {}

/// Prices the stay and announces it.
struct ReserveRoomHandler {
    nightly_rate: u32,
}

#[async_trait]
impl RequestHandler<ReserveRoom> for ReserveRoomHandler {
    async fn handle(&self, request: ReserveRoom, ctx: &Context) -> Result<Confirmation, BoxError> {
        ctx.publish(RoomReserved {
            guest: request.guest.clone(),
        })
        .await?;

        Ok(Confirmation {
            guest: request.guest,
            total: request.nights * self.nightly_rate,
        })
    }
}

fn reserve(guest: &str, nights: u32) -> ReserveRoom {
    ReserveRoom {
        guest: guest.to_string(),
        nights,
    }
}

// ============================================================================
// Handler resolution
// ============================================================================

#[tokio::test]
async fn registered_handler_runs_exactly_once() {
    let handler = CountingHandler::<CancelReservation>::new(true);
    let calls = handler.counter();
    let mediator = Mediator::builder()
        .handler::<CancelReservation, _>(handler)
        .build()
        .unwrap();

    let cancelled = mediator.send(CancelReservation).await.unwrap();

    assert!(cancelled);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unregistered_request_invokes_nothing() {
    let log = CallLog::new();
    let handler = CountingHandler::<CancelReservation>::new(true).with_log(&log);
    let calls = handler.counter();
    let mediator = Mediator::builder()
        .behavior(RecordingBehavior::new("outer", &log))
        .handler::<CancelReservation, _>(handler)
        .build()
        .unwrap();

    let err = mediator.send(reserve("Alice", 1)).await.unwrap_err();

    assert!(matches!(
        err,
        MediatorError::UnregisteredHandler {
            request: "ReserveRoom"
        }
    ));
    assert!(log.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn duplicate_registration_fails_build() {
    let err = Mediator::builder()
        .handler::<CancelReservation, _>(CountingHandler::new(true))
        .handler::<CancelReservation, _>(CountingHandler::new(false))
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        MediatorError::DuplicateHandler {
            request: "CancelReservation"
        }
    ));
}

// ============================================================================
// Behavior chain
// ============================================================================

#[tokio::test]
async fn behaviors_wrap_handler_in_registration_order() {
    let log = CallLog::new();
    let mediator = Mediator::builder()
        .behavior(RecordingBehavior::new("B1", &log))
        .behavior(RecordingBehavior::new("B2", &log))
        .handler::<CancelReservation, _>(CountingHandler::new(true).with_log(&log))
        .build()
        .unwrap();

    mediator.send(CancelReservation).await.unwrap();

    assert_eq!(
        log.entries(),
        vec!["B1-pre", "B2-pre", "handler", "B2-post", "B1-post"]
    );
    assert_eq!(mediator.behaviors(), vec!["RecordingBehavior", "RecordingBehavior"]);
}

#[tokio::test]
async fn every_behavior_sees_every_request_type() {
    let log = CallLog::new();
    let mediator = Mediator::builder()
        .behavior(RecordingBehavior::new("audit", &log))
        .handler::<CancelReservation, _>(CountingHandler::new(true))
        .handler::<ReserveRoom, _>(ReserveRoomHandler { nightly_rate: 100 })
        .build()
        .unwrap();

    mediator.send(CancelReservation).await.unwrap();
    mediator.send(reserve("Bob", 2)).await.unwrap();

    assert_eq!(
        log.entries(),
        vec!["audit-pre", "audit-post", "audit-pre", "audit-post"]
    );
}

#[tokio::test]
async fn zero_behaviors_calls_handler_directly() {
    let log = CallLog::new();
    let mediator = Mediator::builder()
        .handler::<CancelReservation, _>(CountingHandler::new(true).with_log(&log))
        .build()
        .unwrap();

    assert!(mediator.send(CancelReservation).await.unwrap());
    assert_eq!(log.entries(), expected_trace::<&str>(&[]));
}

#[tokio::test]
async fn short_circuit_skips_inner_behaviors_and_handler() {
    let log = CallLog::new();
    let handler = CountingHandler::<CancelReservation>::new(true).with_log(&log);
    let calls = handler.counter();
    let mediator = Mediator::builder()
        .behavior(RecordingBehavior::new("outer", &log))
        .behavior(ShortCircuitBehavior::new(false))
        .behavior(RecordingBehavior::new("inner", &log))
        .handler::<CancelReservation, _>(handler)
        .build()
        .unwrap();

    let cancelled = mediator.send(CancelReservation).await.unwrap();

    assert!(!cancelled);
    assert_eq!(log.entries(), vec!["outer-pre", "outer-post"]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn short_circuit_with_wrong_type_is_reported() {
    let mediator = Mediator::builder()
        .behavior(ShortCircuitBehavior::new("not a bool".to_string()))
        .handler::<CancelReservation, _>(CountingHandler::new(true))
        .build()
        .unwrap();

    let err = mediator.send(CancelReservation).await.unwrap_err();

    assert!(matches!(
        err,
        MediatorError::ResponseTypeMismatch {
            expected: "bool",
            actual: "String"
        }
    ));
}

#[tokio::test]
async fn handler_failure_propagates_through_behaviors_unchanged() {
    let log = CallLog::new();
    let mediator = Mediator::builder()
        .behavior(RecordingBehavior::new("outer", &log))
        .behavior(LoggingBehavior::new())
        .handler::<CancelReservation, _>(FailingHandler::new("already checked in"))
        .build()
        .unwrap();

    let err = mediator.send(CancelReservation).await.unwrap_err();

    assert_eq!(
        err.handler_error::<TestFailure>(),
        Some(&TestFailure("already checked in".to_string()))
    );
    assert_eq!(log.entries(), vec!["outer-pre", "outer-post"]);
}

#[tokio::test]
async fn logging_behavior_preserves_response() {
    let plain = Mediator::builder()
        .handler::<ReserveRoom, _>(ReserveRoomHandler { nightly_rate: 120 })
        .build()
        .unwrap();
    let logged = Mediator::builder()
        .behavior(LoggingBehavior::new())
        .handler::<ReserveRoom, _>(ReserveRoomHandler { nightly_rate: 120 })
        .build()
        .unwrap();

    let expected = plain.send(reserve("Carol", 3)).await.unwrap();
    let actual = logged.send(reserve("Carol", 3)).await.unwrap();

    assert_eq!(actual, expected);
    assert_eq!(actual.total, 360);
}

// ============================================================================
// Notifications
// ============================================================================

struct FailingListener;

#[async_trait]
impl NotificationHandler<RoomReserved> for FailingListener {
    async fn handle(&self, _notification: &RoomReserved, _ctx: &Context) -> Result<(), BoxError> {
        Err("inventory service down".into())
    }
}

#[tokio::test]
async fn handler_can_publish_notifications() {
    let collector = CollectingNotificationHandler::<RoomReserved>::new();
    let received = collector.received();
    let mediator = Mediator::builder()
        .handler::<ReserveRoom, _>(ReserveRoomHandler { nightly_rate: 90 })
        .notification_handler::<RoomReserved, _>(collector)
        .build()
        .unwrap();

    mediator.send(reserve("Dave", 1)).await.unwrap();

    assert_eq!(
        *received.lock().unwrap(),
        vec![RoomReserved {
            guest: "Dave".to_string()
        }]
    );
}

#[tokio::test]
async fn notification_handlers_run_in_order_and_stop_on_failure() {
    let log = CallLog::new();
    let mediator = Mediator::builder()
        .notification_handler::<RoomReserved, _>(
            CollectingNotificationHandler::new().with_log("email", &log),
        )
        .notification_handler::<RoomReserved, _>(FailingListener)
        .notification_handler::<RoomReserved, _>(
            CollectingNotificationHandler::new().with_log("never", &log),
        )
        .build()
        .unwrap();

    let err = mediator
        .publish(RoomReserved {
            guest: "Erin".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MediatorError::NotificationHandler {
            notification: "RoomReserved",
            ..
        }
    ));
    assert_eq!(log.entries(), vec!["email"]);
    assert_eq!(mediator.notification_handler_count::<RoomReserved>(), 3);
}

#[tokio::test]
async fn notification_failure_fails_publishing_request() {
    let mediator = Mediator::builder()
        .handler::<ReserveRoom, _>(ReserveRoomHandler { nightly_rate: 90 })
        .notification_handler::<RoomReserved, _>(FailingListener)
        .build()
        .unwrap();

    let err = mediator.send(reserve("Frank", 2)).await.unwrap_err();

    assert!(matches!(
        err,
        MediatorError::Handler {
            request: "ReserveRoom",
            ..
        }
    ));
}

#[tokio::test]
async fn publishing_without_handlers_succeeds() {
    let mediator = Mediator::builder().build().unwrap();
    mediator
        .publish(RoomReserved {
            guest: "Grace".to_string(),
        })
        .await
        .unwrap();
}

// ============================================================================
// Cancellation and concurrency
// ============================================================================

#[tokio::test]
async fn cancellation_token_reaches_handler() {
    let mediator = Mediator::builder()
        .handler_fn(|_request: CancelReservation, ctx: Context| async move {
            Ok::<_, BoxError>(ctx.is_cancelled())
        })
        .build()
        .unwrap();

    let token = CancellationToken::new();
    assert!(!mediator.send_with(CancelReservation, token.clone()).await.unwrap());

    token.cancel();
    assert!(mediator.send_with(CancelReservation, token).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sends_are_independent() {
    let handler = ReserveRoomHandler { nightly_rate: 50 };
    let mediator = Mediator::builder()
        .behavior(LoggingBehavior::without_payloads())
        .handler::<ReserveRoom, _>(handler)
        .build()
        .unwrap();

    let mut tasks = Vec::new();
    for nights in 1..=32 {
        let mediator = mediator.clone();
        tasks.push(tokio::spawn(async move {
            mediator
                .send(reserve(&format!("guest-{nights}"), nights))
                .await
        }));
    }

    for (nights, task) in (1..=32).zip(tasks) {
        let confirmation = task.await.unwrap().unwrap();
        assert_eq!(confirmation.guest, format!("guest-{nights}"));
        assert_eq!(confirmation.total, nights * 50);
    }
}

#[test]
fn mediator_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Mediator>();
    assert_send_sync::<Arc<Mediator>>();
}
