//! Handler registries keyed by message type.
//!
//! The registries provide:
//! - One handler per request type, with duplicate detection
//! - Zero or more handlers per notification type, in registration order
//! - Introspection of what is registered
//!
//! Both are populated during startup (by `MediatorBuilder`) and are
//! read-only once moved into a `Mediator`.

use mediator_core::{
    BoxFuture, Context, Envelope, ErasedHandler, MediatorError, Notification, NotificationHandler,
    Request, RequestHandler, TypedHandler, short_type_name,
};
use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Maps each request type to its single handler.
///
/// ## Example
///
/// ```ignore
/// let mut registry = HandlerRegistry::new();
/// registry.register::<BookHotel, _>(BookHotelHandler::new(repository))?;
///
/// assert!(registry.contains::<BookHotel>());
/// let handler = registry.resolve::<BookHotel>()?;
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<TypeId, Arc<dyn ErasedHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for request type `R`.
    ///
    /// # Errors
    ///
    /// Returns [`MediatorError::DuplicateHandler`] if `R` already has a
    /// handler. The existing registration is left in place.
    pub fn register<R, H>(&mut self, handler: H) -> Result<(), MediatorError>
    where
        R: Request,
        H: RequestHandler<R>,
    {
        let type_id = TypeId::of::<R>();
        if self.handlers.contains_key(&type_id) {
            return Err(MediatorError::DuplicateHandler {
                request: short_type_name::<R>(),
            });
        }

        self.handlers
            .insert(type_id, Arc::new(TypedHandler::<R, H>::new(handler)));
        tracing::debug!(request = short_type_name::<R>(), "Registered request handler");
        Ok(())
    }

    /// Look up the handler for request type `R`.
    ///
    /// # Errors
    ///
    /// Returns [`MediatorError::UnregisteredHandler`] if nothing handles `R`.
    pub fn resolve<R: Request>(&self) -> Result<&Arc<dyn ErasedHandler>, MediatorError> {
        self.resolve_id(TypeId::of::<R>(), short_type_name::<R>())
    }

    /// Look up a handler by the request's `TypeId`.
    ///
    /// `request` is only used to name the type in the error.
    ///
    /// # Errors
    ///
    /// Returns [`MediatorError::UnregisteredHandler`] if nothing handles the type.
    pub fn resolve_id(
        &self,
        type_id: TypeId,
        request: &'static str,
    ) -> Result<&Arc<dyn ErasedHandler>, MediatorError> {
        self.handlers
            .get(&type_id)
            .ok_or(MediatorError::UnregisteredHandler { request })
    }

    /// Whether request type `R` has a handler
    #[must_use]
    pub fn contains<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<R>())
    }

    /// Number of registered handlers
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Short names of every handled request type, sorted
    #[must_use]
    pub fn request_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .handlers
            .values()
            .map(|handler| handler.request_type())
            .collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("request_types", &self.request_types())
            .finish()
    }
}

/// A notification handler with its notification type erased.
pub(crate) trait ErasedNotificationHandler: Send + Sync + 'static {
    fn invoke<'a>(
        &'a self,
        notification: &'a Envelope,
        ctx: &'a Context,
    ) -> BoxFuture<'a, Result<(), MediatorError>>;
}

struct TypedNotificationHandler<N, H> {
    handler: H,
    _notification: PhantomData<fn() -> N>,
}

impl<N, H> ErasedNotificationHandler for TypedNotificationHandler<N, H>
where
    N: Notification,
    H: NotificationHandler<N>,
{
    fn invoke<'a>(
        &'a self,
        notification: &'a Envelope,
        ctx: &'a Context,
    ) -> BoxFuture<'a, Result<(), MediatorError>> {
        Box::pin(async move {
            let Some(typed) = notification.downcast_ref::<N>() else {
                return Err(MediatorError::NotificationTypeMismatch {
                    expected: short_type_name::<N>(),
                    actual: notification.short_name(),
                });
            };

            self.handler
                .handle(typed, ctx)
                .await
                .map_err(|source| MediatorError::NotificationHandler {
                    notification: short_type_name::<N>(),
                    source,
                })
        })
    }
}

/// Maps each notification type to its handlers, in registration order.
#[derive(Default)]
pub struct NotificationRegistry {
    handlers: HashMap<TypeId, Vec<Arc<dyn ErasedNotificationHandler>>>,
}

impl NotificationRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler for notification type `N`.
    ///
    /// Handlers for the same type run in the order they were added.
    pub fn register<N, H>(&mut self, handler: H)
    where
        N: Notification,
        H: NotificationHandler<N>,
    {
        self.handlers
            .entry(TypeId::of::<N>())
            .or_default()
            .push(Arc::new(TypedNotificationHandler::<N, H> {
                handler,
                _notification: PhantomData,
            }));
        tracing::debug!(
            notification = short_type_name::<N>(),
            "Registered notification handler"
        );
    }

    /// Number of handlers registered for `N`
    #[must_use]
    pub fn handler_count<N: Notification>(&self) -> usize {
        self.handlers
            .get(&TypeId::of::<N>())
            .map_or(0, Vec::len)
    }

    /// Whether no notification handlers are registered at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Deliver a notification to each of its handlers in turn.
    ///
    /// Stops at the first failing handler; later handlers do not run.
    pub(crate) async fn dispatch(
        &self,
        notification: &Envelope,
        ctx: &Context,
    ) -> Result<usize, MediatorError> {
        let Some(handlers) = self.handlers.get(&notification.type_id()) else {
            return Ok(0);
        };

        for handler in handlers {
            handler.invoke(notification, ctx).await?;
        }
        Ok(handlers.len())
    }
}

impl std::fmt::Debug for NotificationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationRegistry")
            .field("notification_types", &self.handlers.len())
            .finish()
    }
}
