//! Domain errors for bookings, filters and patches.

use thiserror::Error;

/// Errors raised by the booking domain.
///
/// Handlers return these boxed; callers recover them with
/// `MediatorError::handler_error::<BookingError>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Hotel name is blank
    #[error("hotel name is required")]
    MissingHotelName,

    /// Guest name is blank
    #[error("guest name is required")]
    MissingGuestName,

    /// Email is blank or has no `@`
    #[error("a valid email is required")]
    InvalidEmail,

    /// Check-in date falls after the check-out date
    #[error("check-in cannot be after check-out")]
    CheckInAfterCheckOut,

    /// A booking with this id is already stored
    #[error("booking {0} already exists")]
    DuplicateId(String),

    /// Field name not known to the booking model
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Field exists but cannot be changed
    #[error("field {0} cannot be modified")]
    ReadOnlyField(&'static str),

    /// Operator keyword not recognised
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// Operator cannot be applied to the field's type
    #[error("operator {operator} is not supported for field {field}")]
    UnsupportedOperator {
        /// Field the clause targets
        field: &'static str,
        /// Offending operator
        operator: &'static str,
    },

    /// Filter expression does not follow `<field> <op> '<value>' [AND ...]`
    #[error("invalid filter expression near: {0}")]
    InvalidFilter(String),

    /// Sort expression does not follow `<field> [ASC|DESC], ...`
    #[error("invalid sort expression: {0}")]
    InvalidSort(String),

    /// Date value is not `yyyy-MM-dd`
    #[error("Expected ISO-8601 (yyyy-MM-dd) format for field {field}: {value}")]
    InvalidDate {
        /// Field being parsed
        field: &'static str,
        /// The rejected input
        value: String,
    },

    /// Id value is not a UUID
    #[error("invalid booking id: {0}")]
    InvalidId(String),
}

impl BookingError {
    /// Returns `true` for validation failures of the booking record itself.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingHotelName
                | Self::MissingGuestName
                | Self::InvalidEmail
                | Self::CheckInAfterCheckOut
        )
    }
}
