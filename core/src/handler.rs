//! Request handlers.

use crate::context::Context;
use crate::error::BoxError;
use crate::request::Request;
use async_trait::async_trait;
use std::future::Future;

/// Fulfils one request type.
///
/// Exactly one handler may be registered per request type. The handler owns
/// whatever collaborators it needs (repositories, clients) and receives the
/// request by value.
///
/// # Example
///
/// ```ignore
/// struct BookHotelHandler {
///     repository: Arc<dyn BookingRepository>,
/// }
///
/// #[async_trait]
/// impl RequestHandler<BookHotel> for BookHotelHandler {
///     async fn handle(&self, request: BookHotel, _ctx: &Context) -> Result<BookingId, BoxError> {
///         let booking = Booking::new(self.repository.next_id(), request);
///         self.repository.add(booking.clone())?;
///         Ok(booking.id)
///     }
/// }
/// ```
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    /// Handle the request and produce its response.
    ///
    /// # Errors
    ///
    /// Any domain failure. It reaches the caller wrapped in
    /// `MediatorError::Handler` with its concrete type preserved.
    async fn handle(&self, request: R, ctx: &Context) -> Result<R::Response, BoxError>;
}

/// A [`RequestHandler`] built from a closure. See [`handler_fn`].
#[derive(Clone, Debug)]
pub struct FnHandler<F> {
    f: F,
}

/// Turn an async closure into a [`RequestHandler`].
///
/// The closure receives the request and an owned clone of the call's
/// [`Context`].
///
/// # Example
///
/// ```ignore
/// let handler = handler_fn(|request: Ping, _ctx| async move { Ok::<_, BoxError>(request.0 + 1) });
/// ```
#[must_use]
pub const fn handler_fn<R, F, Fut>(f: F) -> FnHandler<F>
where
    R: Request,
    F: Fn(R, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Response, BoxError>> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait]
impl<R, F, Fut> RequestHandler<R> for FnHandler<F>
where
    R: Request,
    F: Fn(R, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Response, BoxError>> + Send + 'static,
{
    async fn handle(&self, request: R, ctx: &Context) -> Result<R::Response, BoxError> {
        (self.f)(request, ctx.clone()).await
    }
}
