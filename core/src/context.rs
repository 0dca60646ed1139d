//! Per-call context handed to handlers.

use crate::envelope::Envelope;
use crate::error::MediatorError;
use crate::notification::Notification;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Sink for notifications published from inside a handler.
///
/// Implemented by the runtime's mediator; handlers only ever see it through
/// [`Context::publish`].
pub trait Publisher: Send + Sync {
    /// Deliver a type-erased notification to every handler registered for it.
    fn publish_envelope<'a>(
        &'a self,
        notification: Envelope,
        ctx: &'a Context,
    ) -> BoxFuture<'a, Result<(), MediatorError>>;
}

/// Data scoped to a single `send` or `publish` call.
///
/// The cancellation token is passed through untouched: the mediator never
/// checks it, handlers and behaviors may.
#[derive(Clone, Default)]
pub struct Context {
    cancellation: CancellationToken,
    publisher: Option<Arc<dyn Publisher>>,
}

impl Context {
    /// Create a context carrying the caller's cancellation token.
    #[must_use]
    pub const fn new(cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            publisher: None,
        }
    }

    /// Attach the publisher that [`Context::publish`] delivers to.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// The caller's cancellation token
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Whether the caller has cancelled this call
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Whether notifications published through this context reach anyone.
    #[must_use]
    pub const fn can_publish(&self) -> bool {
        self.publisher.is_some()
    }

    /// Publish a notification to all of its registered handlers.
    ///
    /// A context created outside the mediator (for example in a handler unit
    /// test) has no publisher; publishing through it is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`MediatorError::NotificationHandler`] if a notification handler fails.
    pub async fn publish<N: Notification>(&self, notification: N) -> Result<(), MediatorError> {
        match &self.publisher {
            Some(publisher) => {
                publisher
                    .publish_envelope(Envelope::new(notification), self)
                    .await
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.is_cancelled())
            .field("can_publish", &self.can_publish())
            .finish()
    }
}
