//! End-to-end tests: booking requests sent through a fully wired mediator
//!
//! Each test builds its own in-memory repository (seeded with the sample
//! bookings where noted) with sequential ids starting at 10, and a recording
//! email service in place of the console one.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use booking::mocks::RecordingEmailService;
use booking::types::parse_date;
use booking::{
    BookHotel, Booking, BookingError, BookingFilter, BookingId, BookingPatch, BookingRepository,
    Config, DeleteBooking, Field, GetBookingById, GetBookings, InMemoryBookingRepository,
    PatchBooking, SequentialIds, Services, SortField, UpdateBooking, build_mediator,
    sample_bookings,
};
use chrono::NaiveDate;
use mediator_runtime::{Mediator, MediatorError};
use mediator_testing::helpers::expected_trace;
use mediator_testing::{CallLog, DispatchTest, RecordingBehavior};
use std::sync::Arc;

// ============================================================================
// Test Fixtures
// ============================================================================

fn date(s: &str) -> NaiveDate {
    parse_date("test", s).unwrap()
}

struct Harness {
    mediator: Mediator,
    repository: Arc<InMemoryBookingRepository>,
    outbox: Arc<RecordingEmailService>,
}

impl Harness {
    fn empty() -> Self {
        Self::with(InMemoryBookingRepository::with_id_generator(
            SequentialIds::starting_at(10),
        ))
    }

    fn seeded() -> Self {
        Self::with(
            InMemoryBookingRepository::with_id_generator(SequentialIds::starting_at(10))
                .with_bookings(sample_bookings().unwrap())
                .unwrap(),
        )
    }

    fn with(repository: InMemoryBookingRepository) -> Self {
        let repository = Arc::new(repository);
        let outbox = Arc::new(RecordingEmailService::new());
        let services = Services::new(repository.clone(), outbox.clone());
        let mediator = build_mediator(&services, &Config::default()).unwrap();
        Self {
            mediator,
            repository,
            outbox,
        }
    }
}

fn book(hotel: &str, guest: &str, from: &str, to: &str) -> BookHotel {
    BookHotel::new(
        hotel,
        guest,
        format!("{}@example.com", guest.to_lowercase()),
        date(from),
        date(to),
    )
}

fn guests(bookings: &[Booking]) -> Vec<&str> {
    bookings.iter().map(|b| b.guest_name.as_str()).collect()
}

// ============================================================================
// Booking and listing
// ============================================================================

#[tokio::test]
async fn two_bookings_are_listed_in_insertion_order() {
    let harness = Harness::empty();

    let alice = harness
        .mediator
        .send(book("Grand Hotel", "Alice", "2024-05-01", "2024-05-03"))
        .await
        .unwrap();
    let bob = harness
        .mediator
        .send(book("Seaside Resort", "Bob", "2024-05-02", "2024-05-04"))
        .await
        .unwrap();

    let bookings = harness.mediator.send(GetBookings::all()).await.unwrap();

    assert_eq!(bookings.len(), 2);
    assert_eq!(guests(&bookings), vec!["Alice", "Bob"]);
    assert_eq!(bookings[0].id, alice);
    assert_eq!(bookings[1].id, bob);
    assert!(bookings.iter().all(|b| !b.id.as_uuid().is_nil()));
}

#[tokio::test]
async fn predicate_query_returns_only_matching_guest() {
    let harness = Harness::empty();
    harness
        .mediator
        .send(book("Grand Hotel", "Alice", "2024-05-01", "2024-05-03"))
        .await
        .unwrap();
    harness
        .mediator
        .send(book("Seaside Resort", "Bob", "2024-05-02", "2024-05-04"))
        .await
        .unwrap();

    let found = harness
        .mediator
        .send(GetBookings::matching(|b| b.guest_name == "Alice"))
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].guest_name, "Alice");
    assert_eq!(found[0].hotel_name, "Grand Hotel");
}

#[tokio::test]
async fn booking_uses_next_sequential_id_and_sends_confirmation() {
    let harness = Harness::seeded();

    DispatchTest::new(harness.mediator.clone())
        .when_request(BookHotel::new(
            "HotelX",
            "Eve",
            "eve@wp.pl",
            date("2024-10-01"),
            date("2024-10-03"),
        ))
        .then_response(|id| assert_eq!(*id, BookingId::from_u128(10)))
        .run()
        .await;

    let sent = harness.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "eve@wp.pl");
    assert_eq!(sent[0].subject, "Booking Confirmed");
    assert!(sent[0].body.starts_with("Dear Eve, your booking at HotelX is confirmed."));
    assert_eq!(harness.repository.len(), 4);
}

#[tokio::test]
async fn invalid_booking_is_rejected_without_confirmation() {
    let harness = Harness::empty();
    let mut request = book("Grand Hotel", "Alice", "2024-05-01", "2024-05-03");
    request.email = "alice".to_string();

    let err = harness.mediator.send(request).await.unwrap_err();

    assert!(matches!(err, MediatorError::Handler { request: "BookHotel", .. }));
    assert_eq!(
        err.handler_error::<BookingError>(),
        Some(&BookingError::InvalidEmail)
    );
    assert!(harness.outbox.sent().is_empty());
    assert!(harness.repository.is_empty());
}

#[tokio::test]
async fn reversed_dates_pass_the_behavior_but_fail_validation() {
    let harness = Harness::empty();

    let err = harness
        .mediator
        .send(book("Grand Hotel", "Alice", "2024-05-05", "2024-05-01"))
        .await
        .unwrap_err();

    assert_eq!(
        err.handler_error::<BookingError>(),
        Some(&BookingError::CheckInAfterCheckOut)
    );
}

#[tokio::test]
async fn failed_confirmation_email_fails_the_booking_after_storing_it() {
    let repository = Arc::new(InMemoryBookingRepository::new());
    let services = Services::new(
        repository.clone(),
        Arc::new(RecordingEmailService::failing("smtp down")),
    );
    let mediator = build_mediator(&services, &Config::default()).unwrap();

    let err = mediator
        .send(book("Grand Hotel", "Alice", "2024-05-01", "2024-05-03"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("smtp down"));
    assert_eq!(repository.len(), 1);
}

// ============================================================================
// Queries against the sample bookings
// ============================================================================

#[tokio::test]
async fn get_existing_and_missing_booking_by_id() {
    let harness = Harness::seeded();

    let found = harness
        .mediator
        .send(GetBookingById {
            id: BookingId::from_u128(1),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.hotel_name, "Hotel California");
    assert_eq!(found.guest_name, "Alice Smith");
    assert_eq!(found.email, "alice.beauty@buziaczek.pl");
    assert_eq!(found.check_in, date("2024-07-01"));
    assert_eq!(found.check_out, date("2024-07-05"));

    let missing = harness
        .mediator
        .send(GetBookingById {
            id: BookingId::from_u128(u128::MAX),
        })
        .await
        .unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn structured_filters_and_sorting() {
    let harness = Harness::seeded();

    let by_hotel = harness
        .mediator
        .send(GetBookings::parse("hotelName eq 'Hotel California'", "").unwrap())
        .await
        .unwrap();
    assert_eq!(guests(&by_hotel), vec!["Alice Smith"]);

    let summer = harness
        .mediator
        .send(
            GetBookings::parse(
                "checkIn gte '2024-07-01' AND checkOut lte '2024-08-31'",
                "checkIn desc",
            )
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(guests(&summer), vec!["Bob Johnson", "Alice Smith"]);

    let everyone = harness
        .mediator
        .send(GetBookings::with_filter(BookingFilter::new()).sorted_by(vec![
            SortField::desc(Field::GuestName),
        ]))
        .await
        .unwrap();
    assert_eq!(
        guests(&everyone),
        vec!["Charlie Brown", "Bob Johnson", "Alice Smith"]
    );
}

// ============================================================================
// Changes to existing bookings
// ============================================================================

#[tokio::test]
async fn update_patch_and_delete_existing_booking() {
    let harness = Harness::seeded();
    let id = BookingId::from_u128(1);

    let updated = harness
        .mediator
        .send(UpdateBooking {
            booking: Booking::new(
                id,
                "UpdatedHotel",
                "Eve",
                "new@email.pl",
                date("2024-10-01"),
                date("2024-10-04"),
            ),
        })
        .await
        .unwrap();
    assert!(updated);

    let patched = harness
        .mediator
        .send(PatchBooking {
            id,
            patch: BookingPatch::from_fields([("guestName", "Frank")]).unwrap(),
        })
        .await
        .unwrap();
    assert!(patched);

    let stored = harness.repository.get_by_id(id).unwrap();
    assert_eq!(stored.hotel_name, "UpdatedHotel");
    assert_eq!(stored.guest_name, "Frank");

    let deleted = harness.mediator.send(DeleteBooking { id }).await.unwrap();
    assert!(deleted);
    assert_eq!(harness.repository.len(), 2);
    assert!(harness.outbox.sent().is_empty());
}

#[tokio::test]
async fn changes_to_missing_bookings_report_false() {
    let harness = Harness::seeded();
    let id = BookingId::from_u128(404);

    let stranger = Booking::new(
        id,
        "Nowhere Inn",
        "Nobody",
        "nobody@example.com",
        date("2024-10-01"),
        date("2024-10-02"),
    );
    assert!(!harness
        .mediator
        .send(UpdateBooking { booking: stranger })
        .await
        .unwrap());
    assert!(!harness
        .mediator
        .send(PatchBooking {
            id,
            patch: BookingPatch::new().guest_name("Frank"),
        })
        .await
        .unwrap());
    assert!(!harness.mediator.send(DeleteBooking { id }).await.unwrap());
    assert_eq!(harness.repository.len(), 3);
}

// ============================================================================
// Behaviors around booking requests
// ============================================================================

#[tokio::test]
async fn recording_behaviors_wrap_booking_handlers_in_order() {
    let log = CallLog::new();
    let repository: Arc<dyn BookingRepository> = Arc::new(InMemoryBookingRepository::new());

    let mediator = Mediator::builder()
        .behavior(RecordingBehavior::new("outer", &log))
        .behavior(RecordingBehavior::new("inner", &log))
        .handler::<GetBookings, _>(booking::handlers::GetBookingsHandler::new(
            repository.clone(),
        ))
        .build()
        .unwrap();

    let bookings = mediator.send(GetBookings::all()).await.unwrap();
    assert!(bookings.is_empty());

    let mut expected = expected_trace(&["outer", "inner"]);
    expected.retain(|entry| entry != "handler");
    assert_eq!(log.entries(), expected);
}
