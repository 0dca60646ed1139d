//! One handler per booking request, each backed by a [`BookingRepository`].

use crate::commands::{
    BookHotel, BookingConfirmed, DeleteBooking, GetBookingById, GetBookings, PatchBooking,
    UpdateBooking,
};
use crate::repository::BookingRepository;
use crate::types::{Booking, BookingId};
use mediator_core::{BoxError, Context, RequestHandler, async_trait};
use std::sync::Arc;

/// Stores a new booking and publishes [`BookingConfirmed`].
pub struct BookHotelHandler {
    repository: Arc<dyn BookingRepository>,
}

impl BookHotelHandler {
    /// Store bookings in `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<BookHotel> for BookHotelHandler {
    async fn handle(&self, request: BookHotel, ctx: &Context) -> Result<BookingId, BoxError> {
        let booking = request.into_booking(self.repository.next_id());
        let id = booking.id;

        self.repository.add(booking.clone())?;
        tracing::info!(%id, hotel = %booking.hotel_name, guest = %booking.guest_name, "Booked hotel");

        ctx.publish(BookingConfirmed { booking }).await?;
        Ok(id)
    }
}

/// Lists bookings.
pub struct GetBookingsHandler {
    repository: Arc<dyn BookingRepository>,
}

impl GetBookingsHandler {
    /// Read from `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetBookings> for GetBookingsHandler {
    async fn handle(&self, request: GetBookings, _ctx: &Context) -> Result<Vec<Booking>, BoxError> {
        let mut bookings = self.repository.query(&request.filter, &request.sort);
        if let Some(predicate) = &request.predicate {
            bookings.retain(|booking| predicate.test(booking));
        }
        Ok(bookings)
    }
}

/// Fetches one booking.
pub struct GetBookingByIdHandler {
    repository: Arc<dyn BookingRepository>,
}

impl GetBookingByIdHandler {
    /// Read from `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetBookingById> for GetBookingByIdHandler {
    async fn handle(
        &self,
        request: GetBookingById,
        _ctx: &Context,
    ) -> Result<Option<Booking>, BoxError> {
        Ok(self.repository.get_by_id(request.id))
    }
}

/// Replaces a booking.
pub struct UpdateBookingHandler {
    repository: Arc<dyn BookingRepository>,
}

impl UpdateBookingHandler {
    /// Write to `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<UpdateBooking> for UpdateBookingHandler {
    async fn handle(&self, request: UpdateBooking, _ctx: &Context) -> Result<bool, BoxError> {
        Ok(self.repository.update(request.booking)?)
    }
}

/// Applies a partial update.
pub struct PatchBookingHandler {
    repository: Arc<dyn BookingRepository>,
}

impl PatchBookingHandler {
    /// Write to `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<PatchBooking> for PatchBookingHandler {
    async fn handle(&self, request: PatchBooking, _ctx: &Context) -> Result<bool, BoxError> {
        Ok(self.repository.patch(request.id, &request.patch)?)
    }
}

/// Removes a booking.
pub struct DeleteBookingHandler {
    repository: Arc<dyn BookingRepository>,
}

impl DeleteBookingHandler {
    /// Write to `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<DeleteBooking> for DeleteBookingHandler {
    async fn handle(&self, request: DeleteBooking, _ctx: &Context) -> Result<bool, BoxError> {
        let removed = self.repository.delete(request.id);
        if removed {
            tracing::info!(id = %request.id, "Deleted booking");
        }
        Ok(removed)
    }
}
