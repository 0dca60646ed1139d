//! Hotel booking demo for the typed request mediator.
//!
//! Bookings live in an in-memory repository. Every operation on them is a
//! typed request sent through a [`Mediator`](mediator_runtime::Mediator):
//!
//! - [`BookHotel`] stores a booking and publishes [`BookingConfirmed`]
//! - [`GetBookings`] lists bookings, optionally filtered and sorted
//! - [`GetBookingById`], [`UpdateBooking`], [`PatchBooking`] and
//!   [`DeleteBooking`] work on a single booking
//!
//! [`build_mediator`] wires the handlers, notification handlers and
//! behaviors together.

pub mod app;
pub mod behaviors;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod mocks;
pub mod notifications;
pub mod patch;
pub mod repository;
pub mod types;

pub use app::{Services, build_mediator, sample_bookings};
pub use commands::{
    BookHotel, BookingConfirmed, DeleteBooking, GetBookingById, GetBookings, PatchBooking,
    UpdateBooking,
};
pub use config::Config;
pub use error::BookingError;
pub use filter::{BookingFilter, Field, FieldFilter, Operator, SortField};
pub use patch::BookingPatch;
pub use repository::{BookingRepository, InMemoryBookingRepository, SequentialIds};
pub use types::{Booking, BookingId};
