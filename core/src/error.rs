//! Error types for mediator operations.

use thiserror::Error;

/// Boxed error returned by handlers for domain failures.
///
/// The mediator never inspects it; it travels back to the caller inside
/// [`MediatorError::Handler`] with its concrete type intact.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while registering or dispatching requests.
#[derive(Error, Debug)]
pub enum MediatorError {
    /// No handler is registered for the request type.
    ///
    /// Fatal to the `send` call that raised it. No handler or behavior ran.
    #[error("No handler registered for request type {request}")]
    UnregisteredHandler {
        /// Type name of the request
        request: &'static str,
    },

    /// A handler is already registered for the request type.
    ///
    /// Raised at startup; the first registration stays in effect.
    #[error("A handler is already registered for request type {request}")]
    DuplicateHandler {
        /// Type name of the request
        request: &'static str,
    },

    /// The handler returned a domain failure.
    #[error("Handler for {request} failed: {source}")]
    Handler {
        /// Type name of the request
        request: &'static str,
        /// The handler's own error
        #[source]
        source: BoxError,
    },

    /// A notification handler returned a failure.
    #[error("Notification handler for {notification} failed: {source}")]
    NotificationHandler {
        /// Type name of the notification
        notification: &'static str,
        /// The handler's own error
        #[source]
        source: BoxError,
    },

    /// A behavior failed the dispatch on purpose.
    #[error("Behavior {behavior} rejected the request: {source}")]
    Behavior {
        /// Name of the behavior
        behavior: &'static str,
        /// Why the behavior failed the request
        #[source]
        source: BoxError,
    },

    /// The handler received a request of a different type than it was registered for.
    ///
    /// Only possible when a behavior swaps the request envelope.
    #[error("Handler for {expected} received a request of type {actual}")]
    RequestTypeMismatch {
        /// Type the handler was registered for
        expected: &'static str,
        /// Type it actually received
        actual: &'static str,
    },

    /// A notification handler received a notification of a different type.
    ///
    /// Handlers are looked up by the notification's `TypeId`, so this signals
    /// a broken registry rather than a caller mistake.
    #[error("Notification handler for {expected} received a notification of type {actual}")]
    NotificationTypeMismatch {
        /// Type the handler was registered for
        expected: &'static str,
        /// Type it actually received
        actual: &'static str,
    },

    /// The pipeline produced a response of a different type than the request expects.
    ///
    /// Only possible when a short-circuiting behavior returns the wrong type.
    #[error("Expected response of type {expected} but the pipeline produced {actual}")]
    ResponseTypeMismatch {
        /// The request's declared response type
        expected: &'static str,
        /// Type actually produced
        actual: &'static str,
    },

    /// A process-wide mediator was already installed.
    #[error("A global mediator has already been installed")]
    GlobalAlreadySet,

    /// No process-wide mediator has been installed.
    #[error("No global mediator has been installed")]
    GlobalNotSet,
}

impl MediatorError {
    /// Wrap a behavior's own failure.
    #[must_use]
    pub fn behavior(behavior: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Behavior {
            behavior,
            source: source.into(),
        }
    }

    /// Returns the handler's domain error if it has type `E`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// match mediator.send(BookHotel { .. }).await {
    ///     Err(err) => {
    ///         if let Some(BookingError::InvalidEmail) = err.handler_error::<BookingError>() {
    ///             // ...
    ///         }
    ///     }
    ///     Ok(id) => { /* ... */ }
    /// }
    /// ```
    #[must_use]
    pub fn handler_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Handler { source, .. } | Self::NotificationHandler { source, .. } => {
                source.downcast_ref::<E>()
            }
            _ => None,
        }
    }

    /// Returns `true` for configuration errors raised before any request runs.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateHandler { .. } | Self::GlobalAlreadySet | Self::GlobalNotSet
        )
    }
}
