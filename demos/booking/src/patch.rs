//! Partial updates to a stored booking.

use crate::error::BookingError;
use crate::filter::Field;
use crate::types::{Booking, parse_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A set of field changes. Fields left as `None` keep their stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPatch {
    /// New hotel name
    pub hotel_name: Option<String>,
    /// New guest name
    pub guest_name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New check-in date
    pub check_in: Option<NaiveDate>,
    /// New check-out date
    pub check_out: Option<NaiveDate>,
}

impl BookingPatch {
    /// An empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the hotel name
    #[must_use]
    pub fn hotel_name(mut self, value: impl Into<String>) -> Self {
        self.hotel_name = Some(value.into());
        self
    }

    /// Change the guest name
    #[must_use]
    pub fn guest_name(mut self, value: impl Into<String>) -> Self {
        self.guest_name = Some(value.into());
        self
    }

    /// Change the email
    #[must_use]
    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    /// Change the check-in date
    #[must_use]
    pub const fn check_in(mut self, value: NaiveDate) -> Self {
        self.check_in = Some(value);
        self
    }

    /// Change the check-out date
    #[must_use]
    pub const fn check_out(mut self, value: NaiveDate) -> Self {
        self.check_out = Some(value);
        self
    }

    /// Build a patch from raw `name -> value` pairs, as a form or query
    /// string would supply them. Dates must be `yyyy-MM-dd`.
    ///
    /// # Errors
    ///
    /// - [`BookingError::UnknownField`] for names outside the booking model
    /// - [`BookingError::ReadOnlyField`] for `id`
    /// - [`BookingError::InvalidDate`] for malformed dates
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, BookingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        fields
            .into_iter()
            .try_fold(Self::new(), |patch, (name, value)| {
                let value = value.as_ref();
                Ok(match name.as_ref().parse::<Field>()? {
                    Field::Id => return Err(BookingError::ReadOnlyField(Field::Id.name())),
                    Field::HotelName => patch.hotel_name(value),
                    Field::GuestName => patch.guest_name(value),
                    Field::Email => patch.email(value),
                    Field::CheckIn => patch.check_in(parse_date(Field::CheckIn.name(), value)?),
                    Field::CheckOut => {
                        patch.check_out(parse_date(Field::CheckOut.name(), value)?)
                    }
                })
            })
    }

    /// Whether the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.hotel_name.is_none()
            && self.guest_name.is_none()
            && self.email.is_none()
            && self.check_in.is_none()
            && self.check_out.is_none()
    }

    /// The booking with this patch's changes merged in. Not validated.
    #[must_use]
    pub fn apply(&self, booking: &Booking) -> Booking {
        Booking {
            id: booking.id,
            hotel_name: self
                .hotel_name
                .clone()
                .unwrap_or_else(|| booking.hotel_name.clone()),
            guest_name: self
                .guest_name
                .clone()
                .unwrap_or_else(|| booking.guest_name.clone()),
            email: self.email.clone().unwrap_or_else(|| booking.email.clone()),
            check_in: self.check_in.unwrap_or(booking.check_in),
            check_out: self.check_out.unwrap_or(booking.check_out),
        }
    }
}
