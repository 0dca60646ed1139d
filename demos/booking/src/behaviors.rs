//! Booking-specific pipeline behaviors.

use crate::commands::{BookHotel, HasBookingDates, UpdateBooking};
use chrono::NaiveDate;
use mediator_core::{Behavior, Envelope, MediatorError, Next, async_trait};
use std::any::TypeId;
use std::collections::HashMap;

type DatesFn = fn(&Envelope) -> Option<(NaiveDate, NaiveDate)>;

fn dates_of<T: HasBookingDates + 'static>(request: &Envelope) -> Option<(NaiveDate, NaiveDate)> {
    request
        .downcast_ref::<T>()
        .map(|dated| (dated.check_in(), dated.check_out()))
}

/// Warns about requests whose check-in falls after their check-out.
///
/// Only request types registered with [`watch`](Self::watch) are inspected.
/// The request always continues down the chain; rejecting it is left to the
/// repository's validation.
#[derive(Default)]
pub struct DateValidationBehavior {
    watched: HashMap<TypeId, DatesFn>,
}

impl DateValidationBehavior {
    /// A behavior watching no request types
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Watching every booking request that carries dates
    #[must_use]
    pub fn for_booking_requests() -> Self {
        Self::new().watch::<BookHotel>().watch::<UpdateBooking>()
    }

    /// Also inspect requests of type `T`
    #[must_use]
    pub fn watch<T: HasBookingDates + 'static>(mut self) -> Self {
        self.watched.insert(TypeId::of::<T>(), dates_of::<T>);
        self
    }
}

impl std::fmt::Debug for DateValidationBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateValidationBehavior")
            .field("watched", &self.watched.len())
            .finish()
    }
}

#[async_trait]
impl Behavior for DateValidationBehavior {
    async fn handle(&self, request: Envelope, next: Next<'_>) -> Result<Envelope, MediatorError> {
        let dates = self
            .watched
            .get(&request.type_id())
            .and_then(|extract| extract(&request));

        let reversed = dates.filter(|(check_in, check_out)| check_in > check_out);
        if let Some((check_in, check_out)) = reversed {
            tracing::warn!(
                request = request.short_name(),
                %check_in,
                %check_out,
                "Invalid booking dates: checkIn {} is after checkOut {}",
                check_in,
                check_out
            );
        }

        next.run(request).await
    }

    fn name(&self) -> &'static str {
        "DateValidationBehavior"
    }
}
