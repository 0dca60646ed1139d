//! The behavior pipeline.
//!
//! A dispatch runs through the registered behaviors in order and ends at the
//! request's handler:
//!
//! ```text
//! send(req) ─▶ B1 pre ─▶ B2 pre ─▶ handler ─▶ B2 post ─▶ B1 post ─▶ response
//! ```
//!
//! Each behavior receives the request and a [`Next`] continuation. Calling
//! [`Next::run`] invokes the rest of the chain; not calling it short-circuits.
//! `Next` is consumed by `run`, so the rest of the chain runs at most once
//! per behavior invocation.

use crate::context::Context;
use crate::envelope::{Envelope, short_type_name};
use crate::error::MediatorError;
use crate::handler::RequestHandler;
use crate::request::Request;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::marker::PhantomData;
use std::sync::Arc;

/// A request handler with its request and response types erased.
///
/// This is the terminal stage of every pipeline. Registries store handlers
/// in this form so that requests of any type can share one chain.
pub trait ErasedHandler: Send + Sync + 'static {
    /// Short type name of the request this handler accepts
    fn request_type(&self) -> &'static str;

    /// Run the handler on a type-erased request.
    fn invoke<'a>(
        &'a self,
        request: Envelope,
        ctx: &'a Context,
    ) -> BoxFuture<'a, Result<Envelope, MediatorError>>;
}

/// Adapts a typed [`RequestHandler`] to [`ErasedHandler`].
pub struct TypedHandler<R, H> {
    handler: H,
    _request: PhantomData<fn() -> R>,
}

impl<R, H> TypedHandler<R, H>
where
    R: Request,
    H: RequestHandler<R>,
{
    /// Wrap a handler
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self {
            handler,
            _request: PhantomData,
        }
    }
}

impl<R, H> ErasedHandler for TypedHandler<R, H>
where
    R: Request,
    H: RequestHandler<R>,
{
    fn request_type(&self) -> &'static str {
        short_type_name::<R>()
    }

    fn invoke<'a>(
        &'a self,
        request: Envelope,
        ctx: &'a Context,
    ) -> BoxFuture<'a, Result<Envelope, MediatorError>> {
        Box::pin(async move {
            let request =
                request
                    .downcast::<R>()
                    .map_err(|actual| MediatorError::RequestTypeMismatch {
                        expected: short_type_name::<R>(),
                        actual: actual.short_name(),
                    })?;

            let response = self.handler.handle(request, ctx).await.map_err(|source| {
                MediatorError::Handler {
                    request: short_type_name::<R>(),
                    source,
                }
            })?;

            Ok(Envelope::new(response))
        })
    }
}

/// Cross-cutting logic wrapped around every request dispatch.
///
/// Behaviors are registered once and apply to all request types, so they see
/// requests and responses as [`Envelope`]s. A behavior may inspect or log the
/// request, call `next.run(request)` to continue, inspect or log the
/// response, or return without calling `next` to short-circuit.
///
/// # Example
///
/// ```ignore
/// struct Timing;
///
/// #[async_trait]
/// impl Behavior for Timing {
///     async fn handle(&self, request: Envelope, next: Next<'_>) -> Result<Envelope, MediatorError> {
///         let start = Instant::now();
///         let result = next.run(request).await;
///         tracing::debug!(elapsed = ?start.elapsed());
///         result
///     }
/// }
/// ```
#[async_trait]
pub trait Behavior: Send + Sync + 'static {
    /// Process a request, optionally delegating to the rest of the chain.
    ///
    /// # Errors
    ///
    /// Whatever the rest of the chain returned, or the behavior's own
    /// failure (see [`MediatorError::behavior`]).
    async fn handle(&self, request: Envelope, next: Next<'_>) -> Result<Envelope, MediatorError>;

    /// Name used in logs and errors.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

/// The remainder of a pipeline: the behaviors after the current one, then
/// the handler.
pub struct Next<'a> {
    behaviors: &'a [Arc<dyn Behavior>],
    handler: &'a dyn ErasedHandler,
    ctx: &'a Context,
}

impl<'a> Next<'a> {
    /// A continuation that runs `behaviors` in order and then `handler`.
    #[must_use]
    pub const fn new(
        behaviors: &'a [Arc<dyn Behavior>],
        handler: &'a dyn ErasedHandler,
        ctx: &'a Context,
    ) -> Self {
        Self {
            behaviors,
            handler,
            ctx,
        }
    }

    /// Context of the call being dispatched
    #[must_use]
    pub const fn context(&self) -> &'a Context {
        self.ctx
    }

    /// Number of behaviors still to run before the handler
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.behaviors.len()
    }

    /// Short type name of the request the terminal handler accepts
    #[must_use]
    pub fn request_type(&self) -> &'static str {
        self.handler.request_type()
    }

    /// Run the rest of the chain.
    pub fn run(self, request: Envelope) -> BoxFuture<'a, Result<Envelope, MediatorError>> {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                let next = Next {
                    behaviors: rest,
                    handler: self.handler,
                    ctx: self.ctx,
                };
                behavior.handle(request, next)
            }
            None => self.handler.invoke(request, self.ctx),
        }
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.remaining())
            .field("request_type", &self.request_type())
            .finish_non_exhaustive()
    }
}
