//! Type-erased values travelling through the behavior chain.
//!
//! Behaviors apply to every request type, so they cannot be generic over the
//! request. Instead they see an [`Envelope`]: an owned, boxed value that
//! remembers its type and knows how to render itself with `Debug`. The typed
//! edges of the pipeline (the handler adapter and `Mediator::send`) recover
//! the concrete types with [`Envelope::downcast`].

use std::any::{Any, TypeId};
use std::fmt;

type DebugFn = fn(&(dyn Any + Send + Sync), &mut fmt::Formatter<'_>) -> fmt::Result;

/// An owned, type-erased request or response.
pub struct Envelope {
    type_id: TypeId,
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
    debug: DebugFn,
}

impl Envelope {
    /// Wrap a value.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value: Box::new(value),
            debug: debug_value::<T>,
        }
    }

    /// `TypeId` of the wrapped value
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type name of the wrapped value
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path (`booking::commands::BookHotel` → `BookHotel`)
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        strip_module_path(self.type_name)
    }

    /// Returns `true` if the wrapped value has type `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrow the wrapped value as `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the wrapped value out as `T`.
    ///
    /// # Errors
    ///
    /// Returns the envelope unchanged if it does not hold a `T`.
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }

        let Self {
            type_id,
            type_name,
            value,
            debug,
        } = self;

        value.downcast::<T>().map(|boxed| *boxed).map_err(|value| Self {
            type_id,
            type_name,
            value,
            debug,
        })
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.value, f)
    }
}

fn debug_value<T>(value: &(dyn Any + Send + Sync), f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    T: fmt::Debug + 'static,
{
    match value.downcast_ref::<T>() {
        Some(value) => fmt::Debug::fmt(value, f),
        None => f.write_str("<opaque>"),
    }
}

/// Short name of `T`, without its module path.
///
/// Only a leading path is stripped. Generic arguments keep their own paths
/// (`alloc::vec::Vec<booking::Booking>` → `Vec<booking::Booking>`), and
/// names that do not start with a path, such as tuples, references, arrays
/// and trait objects, are returned whole.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    strip_module_path(std::any::type_name::<T>())
}

fn strip_module_path(name: &'static str) -> &'static str {
    let base = name.split('<').next().unwrap_or(name);
    let is_path = !base.is_empty()
        && base
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == ':');
    if !is_path {
        return name;
    }
    match base.rfind("::") {
        Some(idx) => &name[idx + 2..],
        None => name,
    }
}
