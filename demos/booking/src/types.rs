//! Domain types for the booking demo.
//!
//! A booking is a guest's stay at one hotel between two dates. Bookings are
//! validated whenever they are stored.

use crate::error::BookingError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `BookingId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Creates a `BookingId` from a small number (`00000000-0000-0000-0000-00000000000a` for 10).
    ///
    /// Used for predictable ids in fixtures and tests.
    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(Uuid::from_u128(n))
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| BookingError::InvalidId(s.to_string()))
    }
}

/// A hotel booking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier
    pub id: BookingId,
    /// Hotel the guest is staying at
    pub hotel_name: String,
    /// Name of the guest
    pub guest_name: String,
    /// Address the confirmation is sent to
    pub email: String,
    /// First night of the stay
    pub check_in: NaiveDate,
    /// Day the guest leaves
    pub check_out: NaiveDate,
}

impl Booking {
    /// Creates a booking. Call [`validate`](Self::validate) before storing it.
    #[must_use]
    pub fn new(
        id: BookingId,
        hotel_name: impl Into<String>,
        guest_name: impl Into<String>,
        email: impl Into<String>,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Self {
        Self {
            id,
            hotel_name: hotel_name.into(),
            guest_name: guest_name.into(),
            email: email.into(),
            check_in,
            check_out,
        }
    }

    /// Check the booking's invariants.
    ///
    /// # Errors
    ///
    /// The first violated rule, checked in this order: hotel name present,
    /// guest name present, email present and containing `@`, check-in not
    /// after check-out.
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.hotel_name.trim().is_empty() {
            return Err(BookingError::MissingHotelName);
        }
        if self.guest_name.trim().is_empty() {
            return Err(BookingError::MissingGuestName);
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(BookingError::InvalidEmail);
        }
        if self.check_in > self.check_out {
            return Err(BookingError::CheckInAfterCheckOut);
        }
        Ok(())
    }

    /// Number of nights between check-in and check-out
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Parse a `yyyy-MM-dd` date supplied for `field`.
///
/// # Errors
///
/// Returns [`BookingError::InvalidDate`] naming the field and the rejected input.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| BookingError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
