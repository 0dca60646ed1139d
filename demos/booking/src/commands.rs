//! Requests and notifications of the booking domain.

use crate::error::BookingError;
use crate::filter::{BookingFilter, SortField, parse_sort};
use crate::patch::BookingPatch;
use crate::types::{Booking, BookingId};
use chrono::NaiveDate;
use mediator_core::{Notification, Request};
use std::fmt;
use std::sync::Arc;

/// Requests that carry a stay's dates.
pub trait HasBookingDates {
    /// First night
    fn check_in(&self) -> NaiveDate;
    /// Departure day
    fn check_out(&self) -> NaiveDate;
}

/// Book a stay. Responds with the new booking's id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookHotel {
    /// Hotel to stay at
    pub hotel_name: String,
    /// Guest's name
    pub guest_name: String,
    /// Where the confirmation goes
    pub email: String,
    /// First night
    pub check_in: NaiveDate,
    /// Departure day
    pub check_out: NaiveDate,
}

impl BookHotel {
    /// Book `guest_name` into `hotel_name` from `check_in` to `check_out`
    #[must_use]
    pub fn new(
        hotel_name: impl Into<String>,
        guest_name: impl Into<String>,
        email: impl Into<String>,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Self {
        Self {
            hotel_name: hotel_name.into(),
            guest_name: guest_name.into(),
            email: email.into(),
            check_in,
            check_out,
        }
    }

    /// The booking this request creates under `id`
    #[must_use]
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking::new(
            id,
            self.hotel_name,
            self.guest_name,
            self.email,
            self.check_in,
            self.check_out,
        )
    }
}

impl Request for BookHotel {
    type Response = BookingId;
}

impl HasBookingDates for BookHotel {
    fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    fn check_out(&self) -> NaiveDate {
        self.check_out
    }
}

/// An arbitrary in-process condition on bookings.
#[derive(Clone)]
pub struct BookingPredicate(Arc<dyn Fn(&Booking) -> bool + Send + Sync>);

impl BookingPredicate {
    /// Wrap a closure
    #[must_use]
    pub fn new(predicate: impl Fn(&Booking) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Whether `booking` satisfies the condition
    #[must_use]
    pub fn test(&self, booking: &Booking) -> bool {
        (self.0)(booking)
    }
}

impl fmt::Debug for BookingPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BookingPredicate(<fn>)")
    }
}

/// List bookings. Responds with the matching bookings.
///
/// The structured filter and the predicate must both hold. Without a sort
/// order, bookings come back in insertion order.
#[derive(Clone, Debug, Default)]
pub struct GetBookings {
    /// Structured conditions
    pub filter: BookingFilter,
    /// Sort keys, most significant first
    pub sort: Vec<SortField>,
    /// Extra condition applied after the filter
    pub predicate: Option<BookingPredicate>,
}

impl GetBookings {
    /// Every booking
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Bookings satisfying `predicate`
    #[must_use]
    pub fn matching(predicate: impl Fn(&Booking) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(BookingPredicate::new(predicate)),
            ..Self::default()
        }
    }

    /// Bookings matching `filter`
    #[must_use]
    pub fn with_filter(filter: BookingFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Order the results by `sort`
    #[must_use]
    pub fn sorted_by(mut self, sort: Vec<SortField>) -> Self {
        self.sort = sort;
        self
    }

    /// Build from textual filter and sort expressions; either may be blank.
    ///
    /// # Errors
    ///
    /// Any error of [`BookingFilter::parse`] or [`parse_sort`].
    pub fn parse(filter: &str, sort: &str) -> Result<Self, BookingError> {
        Ok(Self::with_filter(BookingFilter::parse(filter)?).sorted_by(parse_sort(sort)?))
    }
}

impl Request for GetBookings {
    type Response = Vec<Booking>;
}

/// Look up one booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GetBookingById {
    /// Booking to fetch
    pub id: BookingId,
}

impl Request for GetBookingById {
    type Response = Option<Booking>;
}

/// Replace a stored booking. Responds `false` if it does not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateBooking {
    /// The new version, matched on its id
    pub booking: Booking,
}

impl Request for UpdateBooking {
    type Response = bool;
}

impl HasBookingDates for UpdateBooking {
    fn check_in(&self) -> NaiveDate {
        self.booking.check_in
    }

    fn check_out(&self) -> NaiveDate {
        self.booking.check_out
    }
}

/// Change some fields of a stored booking. Responds `false` if it does not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchBooking {
    /// Booking to change
    pub id: BookingId,
    /// Fields to change
    pub patch: BookingPatch,
}

impl Request for PatchBooking {
    type Response = bool;
}

/// Remove a booking. Responds `false` if it was not stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteBooking {
    /// Booking to remove
    pub id: BookingId,
}

impl Request for DeleteBooking {
    type Response = bool;
}

/// Published after a booking has been stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingConfirmed {
    /// The stored booking
    pub booking: Booking,
}

impl Notification for BookingConfirmed {}
