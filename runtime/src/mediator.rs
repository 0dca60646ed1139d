//! The dispatcher and its builder.

use crate::chain::BehaviorChain;
use crate::registry::{HandlerRegistry, NotificationRegistry};
use mediator_core::{
    Behavior, BoxError, BoxFuture, CancellationToken, Context, Envelope, MediatorError,
    Notification, NotificationHandler, Publisher, Request, RequestHandler, handler_fn,
    short_type_name,
};
use std::future::Future;
use std::sync::Arc;

/// Dispatches requests to their handlers through the behavior chain.
///
/// A `Mediator` is cheap to clone: all clones share the same frozen
/// registries and behaviors. It is `Send + Sync` and needs no locking, so any
/// number of tasks may `send` concurrently.
///
/// # Example
///
/// ```ignore
/// let mediator = Mediator::builder()
///     .behavior(LoggingBehavior::new())
///     .handler::<BookHotel, _>(BookHotelHandler::new(repository.clone()))
///     .handler::<GetBookings, _>(GetBookingsHandler::new(repository))
///     .build()?;
///
/// let id = mediator.send(BookHotel { .. }).await?;
/// let bookings = mediator.send(GetBookings::all()).await?;
/// ```
#[derive(Clone)]
pub struct Mediator {
    inner: Arc<Inner>,
}

struct Inner {
    handlers: HandlerRegistry,
    notifications: NotificationRegistry,
    chain: BehaviorChain,
}

impl Mediator {
    /// Start configuring a mediator
    #[must_use]
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    /// Dispatch a request and return its handler's response.
    ///
    /// # Errors
    ///
    /// - [`MediatorError::UnregisteredHandler`] if nothing handles `R`; no
    ///   behavior or handler runs
    /// - [`MediatorError::Handler`] carrying the handler's own failure
    /// - any error raised by a behavior
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, MediatorError> {
        self.send_with(request, CancellationToken::new()).await
    }

    /// Dispatch a request, handing `cancellation` to handlers and behaviors.
    ///
    /// The token is only passed through; the mediator never checks it.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    #[tracing::instrument(
        skip_all,
        name = "mediator_send",
        fields(request = short_type_name::<R>())
    )]
    pub async fn send_with<R: Request>(
        &self,
        request: R,
        cancellation: CancellationToken,
    ) -> Result<R::Response, MediatorError> {
        let handler = match self.inner.handlers.resolve::<R>() {
            Ok(handler) => handler,
            Err(err) => {
                tracing::error!(error = %err, "Request has no handler");
                return Err(err);
            }
        };

        let ctx = self.context(cancellation);
        let response = self
            .inner
            .chain
            .compose(&**handler, &ctx)
            .run(Envelope::new(request))
            .await?;

        response
            .downcast::<R::Response>()
            .map_err(|actual| MediatorError::ResponseTypeMismatch {
                expected: short_type_name::<R::Response>(),
                actual: actual.short_name(),
            })
    }

    /// Publish a notification to every handler registered for its type.
    ///
    /// Handlers run one after another in registration order. Publishing a
    /// notification nobody listens to succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`MediatorError::NotificationHandler`] from the first failing
    /// handler; the handlers after it do not run.
    pub async fn publish<N: Notification>(&self, notification: N) -> Result<(), MediatorError> {
        let ctx = self.context(CancellationToken::new());
        self.inner
            .deliver(Envelope::new(notification), &ctx)
            .await
    }

    /// Whether a handler is registered for `R`
    #[must_use]
    pub fn handles<R: Request>(&self) -> bool {
        self.inner.handlers.contains::<R>()
    }

    /// Short names of every handled request type, sorted
    #[must_use]
    pub fn request_types(&self) -> Vec<&'static str> {
        self.inner.handlers.request_types()
    }

    /// Behavior names, outermost first
    #[must_use]
    pub fn behaviors(&self) -> Vec<&'static str> {
        self.inner.chain.names()
    }

    /// Number of handlers registered for notification type `N`
    #[must_use]
    pub fn notification_handler_count<N: Notification>(&self) -> usize {
        self.inner.notifications.handler_count::<N>()
    }

    fn context(&self, cancellation: CancellationToken) -> Context {
        let publisher: Arc<dyn Publisher> = self.inner.clone();
        Context::new(cancellation).with_publisher(publisher)
    }
}

impl std::fmt::Debug for Mediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mediator")
            .field("handlers", &self.inner.handlers)
            .field("behaviors", &self.inner.chain)
            .field("notifications", &self.inner.notifications)
            .finish()
    }
}

impl Inner {
    async fn deliver(&self, notification: Envelope, ctx: &Context) -> Result<(), MediatorError> {
        let name = notification.short_name();
        tracing::debug!(notification = name, "Publishing notification");

        match self.notifications.dispatch(&notification, ctx).await {
            Ok(0) => {
                tracing::debug!(notification = name, "No handlers registered for notification");
                Ok(())
            }
            Ok(delivered) => {
                tracing::debug!(notification = name, delivered, "Notification delivered");
                Ok(())
            }
            Err(err) => {
                tracing::error!(notification = name, error = %err, "Notification handler failed");
                Err(err)
            }
        }
    }
}

impl Publisher for Inner {
    fn publish_envelope<'a>(
        &'a self,
        notification: Envelope,
        ctx: &'a Context,
    ) -> BoxFuture<'a, Result<(), MediatorError>> {
        Box::pin(self.deliver(notification, ctx))
    }
}

/// Collects handlers and behaviors, then freezes them into a [`Mediator`].
///
/// Registration errors are remembered and reported by [`build`](Self::build),
/// so registrations can be chained.
#[derive(Default)]
pub struct MediatorBuilder {
    handlers: HandlerRegistry,
    notifications: NotificationRegistry,
    chain: BehaviorChain,
    error: Option<MediatorError>,
}

impl MediatorBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for request type `R`.
    ///
    /// A second handler for the same type makes [`build`](Self::build) fail
    /// with [`MediatorError::DuplicateHandler`].
    #[must_use]
    pub fn handler<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
    {
        if let Err(err) = self.handlers.register::<R, H>(handler) {
            tracing::error!(error = %err, "Rejected handler registration");
            if self.error.is_none() {
                self.error = Some(err);
            }
        }
        self
    }

    /// Register an async closure as the handler for request type `R`.
    #[must_use]
    pub fn handler_fn<R, F, Fut>(self, f: F) -> Self
    where
        R: Request,
        F: Fn(R, Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R::Response, BoxError>> + Send + 'static,
    {
        self.handler::<R, _>(handler_fn(f))
    }

    /// Append a behavior. Behaviors wrap handlers in the order they are added,
    /// the first added being outermost.
    #[must_use]
    pub fn behavior<B: Behavior>(self, behavior: B) -> Self {
        self.shared_behavior(Arc::new(behavior))
    }

    /// Append a behavior that is shared with other owners.
    #[must_use]
    pub fn shared_behavior(mut self, behavior: Arc<dyn Behavior>) -> Self {
        self.chain.push(behavior);
        self
    }

    /// Add a handler for notification type `N`.
    #[must_use]
    pub fn notification_handler<N, H>(mut self, handler: H) -> Self
    where
        N: Notification,
        H: NotificationHandler<N>,
    {
        self.notifications.register::<N, H>(handler);
        self
    }

    /// Freeze the configuration into a [`Mediator`].
    ///
    /// # Errors
    ///
    /// Returns the first registration error, e.g.
    /// [`MediatorError::DuplicateHandler`].
    pub fn build(self) -> Result<Mediator, MediatorError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        tracing::info!(
            handlers = self.handlers.len(),
            behaviors = self.chain.len(),
            "Mediator built"
        );

        Ok(Mediator {
            inner: Arc::new(Inner {
                handlers: self.handlers,
                notifications: self.notifications,
                chain: self.chain,
            }),
        })
    }
}

impl std::fmt::Debug for MediatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediatorBuilder")
            .field("handlers", &self.handlers)
            .field("behaviors", &self.chain)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
