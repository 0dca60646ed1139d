//! The `Request` trait.

use std::fmt::Debug;

/// A typed request dispatched through the mediator.
///
/// A request's identity is its Rust type: the mediator keys its handler
/// registry by `TypeId`, so exactly one handler can fulfil each request type.
/// The associated `Response` is what the caller gets back from `send`.
///
/// Requests must be `Debug` so behaviors can log them without knowing their
/// concrete type.
///
/// # Example
///
/// ```
/// use mediator_core::Request;
///
/// #[derive(Debug)]
/// struct GetGreeting {
///     name: String,
/// }
///
/// impl Request for GetGreeting {
///     type Response = String;
/// }
/// ```
pub trait Request: Debug + Send + Sync + 'static {
    /// The value produced by a successful dispatch of this request
    type Response: Debug + Send + Sync + 'static;
}
