//! Reactions to [`BookingConfirmed`].

use crate::commands::BookingConfirmed;
use mediator_core::{BoxError, Context, NotificationHandler, async_trait};
use std::sync::Arc;

/// Outgoing email.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send one message.
    ///
    /// # Errors
    ///
    /// Delivery failures.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError>;
}

/// Writes emails to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEmailService;

#[async_trait]
impl EmailService for ConsoleEmailService {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError> {
        tracing::info!(%to, %subject, %body, "Sending email");
        Ok(())
    }
}

/// Subject line of confirmation emails
pub const CONFIRMATION_SUBJECT: &str = "Booking Confirmed";

/// Emails the guest a confirmation.
pub struct SendConfirmationEmail {
    email: Arc<dyn EmailService>,
}

impl SendConfirmationEmail {
    /// Send through `email`
    #[must_use]
    pub fn new(email: Arc<dyn EmailService>) -> Self {
        Self { email }
    }
}

#[async_trait]
impl NotificationHandler<BookingConfirmed> for SendConfirmationEmail {
    async fn handle(&self, event: &BookingConfirmed, _ctx: &Context) -> Result<(), BoxError> {
        let booking = &event.booking;
        let body = format!(
            "Dear {}, your booking at {} is confirmed. Booking ID: {}",
            booking.guest_name, booking.hotel_name, booking.id
        );
        self.email
            .send(&booking.email, CONFIRMATION_SUBJECT, &body)
            .await
    }
}

/// Updates room inventory for the booked hotel.
///
/// There is no inventory store in the demo; the update is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateInventory;

#[async_trait]
impl NotificationHandler<BookingConfirmed> for UpdateInventory {
    async fn handle(&self, event: &BookingConfirmed, _ctx: &Context) -> Result<(), BoxError> {
        let booking = &event.booking;
        tracing::info!(
            hotel = %booking.hotel_name,
            check_in = %booking.check_in,
            check_out = %booking.check_out,
            "Updating inventory for hotel {} (check-in: {}, check-out: {})",
            booking.hotel_name,
            booking.check_in,
            booking.check_out
        );
        Ok(())
    }
}
