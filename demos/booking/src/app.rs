//! Wiring: collaborators plus a configured mediator.

use crate::behaviors::DateValidationBehavior;
use crate::commands::{
    BookHotel, BookingConfirmed, DeleteBooking, GetBookingById, GetBookings, PatchBooking,
    UpdateBooking,
};
use crate::config::Config;
use crate::error::BookingError;
use crate::handlers::{
    BookHotelHandler, DeleteBookingHandler, GetBookingByIdHandler, GetBookingsHandler,
    PatchBookingHandler, UpdateBookingHandler,
};
use crate::notifications::{
    ConsoleEmailService, EmailService, SendConfirmationEmail, UpdateInventory,
};
use crate::repository::{BookingRepository, InMemoryBookingRepository};
use crate::types::{Booking, BookingId, parse_date};
use mediator_runtime::behaviors::{LoggingBehavior, MetricsBehavior};
use mediator_runtime::{Mediator, MediatorError};
use std::sync::Arc;

/// Collaborators the handlers depend on.
#[derive(Clone)]
pub struct Services {
    /// Booking storage
    pub repository: Arc<dyn BookingRepository>,
    /// Outgoing email
    pub email: Arc<dyn EmailService>,
}

impl Services {
    /// Use the given collaborators
    #[must_use]
    pub fn new(repository: Arc<dyn BookingRepository>, email: Arc<dyn EmailService>) -> Self {
        Self { repository, email }
    }

    /// An empty in-memory repository and console email
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryBookingRepository::new()),
            Arc::new(ConsoleEmailService),
        )
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// Register every booking handler, notification handler and behavior.
///
/// Behaviors, outermost first: logging, metrics (when enabled), date
/// validation (when enabled).
///
/// # Errors
///
/// Registration errors from [`MediatorBuilder::build`](mediator_runtime::MediatorBuilder::build).
pub fn build_mediator(services: &Services, config: &Config) -> Result<Mediator, MediatorError> {
    let repository = &services.repository;

    let mut builder = Mediator::builder().behavior(LoggingBehavior::new());
    if config.metrics_enabled {
        builder = builder.behavior(MetricsBehavior);
    }
    if config.date_validation {
        builder = builder.behavior(DateValidationBehavior::for_booking_requests());
    }

    builder
        .handler::<BookHotel, _>(BookHotelHandler::new(repository.clone()))
        .handler::<GetBookings, _>(GetBookingsHandler::new(repository.clone()))
        .handler::<GetBookingById, _>(GetBookingByIdHandler::new(repository.clone()))
        .handler::<UpdateBooking, _>(UpdateBookingHandler::new(repository.clone()))
        .handler::<PatchBooking, _>(PatchBookingHandler::new(repository.clone()))
        .handler::<DeleteBooking, _>(DeleteBookingHandler::new(repository.clone()))
        .notification_handler::<BookingConfirmed, _>(SendConfirmationEmail::new(
            services.email.clone(),
        ))
        .notification_handler::<BookingConfirmed, _>(UpdateInventory)
        .build()
}

/// Three example bookings with ids 1, 2 and 3.
///
/// # Errors
///
/// Never in practice; the literal dates are checked at runtime.
pub fn sample_bookings() -> Result<Vec<Booking>, BookingError> {
    let stay = |id: u128, hotel: &str, guest: &str, email: &str, from: &str, to: &str| {
        Ok::<_, BookingError>(Booking::new(
            BookingId::from_u128(id),
            hotel,
            guest,
            email,
            parse_date("check_in", from)?,
            parse_date("check_out", to)?,
        ))
    };

    Ok(vec![
        stay(
            1,
            "Hotel California",
            "Alice Smith",
            "alice.beauty@buziaczek.pl",
            "2024-07-01",
            "2024-07-05",
        )?,
        stay(
            2,
            "Grand Budapest",
            "Bob Johnson",
            "bob.johnson@gmail.com",
            "2024-08-10",
            "2024-08-15",
        )?,
        stay(
            3,
            "The Overlook",
            "Charlie Brown",
            "call@me.daddy",
            "2024-09-20",
            "2024-09-22",
        )?,
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn mediator_handles_every_booking_request() {
        let mediator = build_mediator(&Services::in_memory(), &Config::default()).unwrap();

        assert!(mediator.handles::<BookHotel>());
        assert!(mediator.handles::<GetBookings>());
        assert!(mediator.handles::<GetBookingById>());
        assert!(mediator.handles::<UpdateBooking>());
        assert!(mediator.handles::<PatchBooking>());
        assert!(mediator.handles::<DeleteBooking>());
        assert_eq!(mediator.notification_handler_count::<BookingConfirmed>(), 2);
    }

    #[test]
    fn behaviors_follow_config() {
        let services = Services::in_memory();

        let defaults = build_mediator(&services, &Config::default()).unwrap();
        assert_eq!(
            defaults.behaviors(),
            vec!["LoggingBehavior", "DateValidationBehavior"]
        );

        let config = Config {
            metrics_enabled: true,
            date_validation: false,
            ..Config::default()
        };
        let with_metrics = build_mediator(&services, &config).unwrap();
        assert_eq!(
            with_metrics.behaviors(),
            vec!["LoggingBehavior", "MetricsBehavior"]
        );
    }

    #[test]
    fn sample_bookings_are_valid() {
        let samples = sample_bookings().unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|b| b.validate().is_ok()));
        assert_eq!(samples[0].id, BookingId::from_u128(1));
    }
}
