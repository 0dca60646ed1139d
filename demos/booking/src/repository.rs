//! Booking storage.
//!
//! [`BookingRepository`] is the seam handlers depend on;
//! [`InMemoryBookingRepository`] is the only implementation. Ids come from an
//! [`IdGenerator`] so tests can use predictable ones.

use crate::error::BookingError;
use crate::filter::{BookingFilter, SortField, sort_bookings};
use crate::patch::BookingPatch;
use crate::types::{Booking, BookingId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Source of fresh booking ids.
pub trait IdGenerator: Send + Sync {
    /// Produce an id not handed out before
    fn next_id(&self) -> BookingId;
}

/// Random (v4) ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> BookingId {
        BookingId::new()
    }
}

/// Ids counting up from a starting number, for reproducible runs.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Start counting at `first`
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> BookingId {
        BookingId::from_u128(u128::from(self.next.fetch_add(1, Ordering::Relaxed)))
    }
}

/// Storage for bookings.
///
/// Writes validate the booking first; a booking that fails validation is
/// never stored.
pub trait BookingRepository: Send + Sync {
    /// Id for the next booking
    fn next_id(&self) -> BookingId;

    /// Store a new booking.
    ///
    /// # Errors
    ///
    /// Validation failures, or [`BookingError::DuplicateId`] if the id is taken.
    fn add(&self, booking: Booking) -> Result<(), BookingError>;

    /// Every booking, in insertion order
    fn get_all(&self) -> Vec<Booking>;

    /// Bookings matching `filter`, ordered by `sort` (insertion order when empty)
    fn query(&self, filter: &BookingFilter, sort: &[SortField]) -> Vec<Booking>;

    /// The booking with `id`, if stored
    fn get_by_id(&self, id: BookingId) -> Option<Booking>;

    /// Replace the stored booking with the same id.
    ///
    /// Returns `false` if no such booking exists.
    ///
    /// # Errors
    ///
    /// Validation failures of the new booking.
    fn update(&self, booking: Booking) -> Result<bool, BookingError>;

    /// Merge `patch` into the stored booking with `id`.
    ///
    /// Returns `false` if no such booking exists.
    ///
    /// # Errors
    ///
    /// Validation failures of the merged booking; the stored one is unchanged.
    fn patch(&self, id: BookingId, patch: &BookingPatch) -> Result<bool, BookingError>;

    /// Remove the booking with `id`. Returns `false` if it was not stored.
    fn delete(&self, id: BookingId) -> bool;
}

/// Keeps bookings in a `Vec` behind a lock.
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
    ids: Box<dyn IdGenerator>,
}

impl InMemoryBookingRepository {
    /// An empty repository handing out random ids
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(RandomIds)
    }

    /// An empty repository using `ids`
    #[must_use]
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            bookings: RwLock::new(Vec::new()),
            ids: Box::new(ids),
        }
    }

    /// Seed the repository with `bookings`.
    ///
    /// # Errors
    ///
    /// The first booking that [`add`](BookingRepository::add) rejects.
    pub fn with_bookings(
        self,
        bookings: impl IntoIterator<Item = Booking>,
    ) -> Result<Self, BookingError> {
        for booking in bookings {
            self.add(booking)?;
        }
        Ok(self)
    }

    /// Number of stored bookings
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Booking>> {
        self.bookings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Booking>> {
        self.bookings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryBookingRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBookingRepository")
            .field("bookings", &self.len())
            .finish_non_exhaustive()
    }
}

impl BookingRepository for InMemoryBookingRepository {
    fn next_id(&self) -> BookingId {
        self.ids.next_id()
    }

    fn add(&self, booking: Booking) -> Result<(), BookingError> {
        booking.validate()?;

        let mut bookings = self.write();
        if bookings.iter().any(|existing| existing.id == booking.id) {
            return Err(BookingError::DuplicateId(booking.id.to_string()));
        }
        tracing::debug!(id = %booking.id, hotel = %booking.hotel_name, "Stored booking");
        bookings.push(booking);
        Ok(())
    }

    fn get_all(&self) -> Vec<Booking> {
        self.read().clone()
    }

    fn query(&self, filter: &BookingFilter, sort: &[SortField]) -> Vec<Booking> {
        let mut matching: Vec<Booking> = self
            .read()
            .iter()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect();
        sort_bookings(&mut matching, sort);
        matching
    }

    fn get_by_id(&self, id: BookingId) -> Option<Booking> {
        self.read().iter().find(|booking| booking.id == id).cloned()
    }

    fn update(&self, booking: Booking) -> Result<bool, BookingError> {
        booking.validate()?;

        let mut bookings = self.write();
        let Some(slot) = bookings.iter_mut().find(|existing| existing.id == booking.id) else {
            return Ok(false);
        };
        *slot = booking;
        Ok(true)
    }

    fn patch(&self, id: BookingId, patch: &BookingPatch) -> Result<bool, BookingError> {
        let mut bookings = self.write();
        let Some(slot) = bookings.iter_mut().find(|existing| existing.id == id) else {
            return Ok(false);
        };

        let patched = patch.apply(slot);
        patched.validate()?;
        *slot = patched;
        Ok(true)
    }

    fn delete(&self, id: BookingId) -> bool {
        let mut bookings = self.write();
        let before = bookings.len();
        bookings.retain(|booking| booking.id != id);
        bookings.len() != before
    }
}
