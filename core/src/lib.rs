//! # Mediator Core
//!
//! Core traits and types for the typed request mediator.
//!
//! This crate provides the abstractions the runtime dispatches through. It
//! holds no state and performs no I/O.
//!
//! ## Core Concepts
//!
//! - **Request**: A typed value naming an operation and the response it expects
//! - **Handler**: The single function that fulfils one request type
//! - **Behavior**: A cross-cutting interceptor wrapped around every handler call
//! - **Next**: The continuation a behavior calls to run the rest of the pipeline
//! - **Notification**: A fire-and-collect message delivered to zero or more handlers
//! - **Context**: Per-call data handed to handlers (cancellation, publishing)
//!
//! ## Request Flow
//!
//! ```text
//! send(request)
//!   └─ Behavior 1 (pre)
//!        └─ Behavior 2 (pre)
//!             └─ Handler
//!        ┌─ Behavior 2 (post)
//!   ┌─ Behavior 1 (post)
//! response
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use mediator_core::{async_trait, BoxError, Context, Request, RequestHandler};
//!
//! #[derive(Debug)]
//! struct Ping(u32);
//!
//! impl Request for Ping {
//!     type Response = u32;
//! }
//!
//! struct PingHandler;
//!
//! #[async_trait]
//! impl RequestHandler<Ping> for PingHandler {
//!     async fn handle(&self, request: Ping, _ctx: &Context) -> Result<u32, BoxError> {
//!         Ok(request.0 + 1)
//!     }
//! }
//! ```

pub mod context;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod notification;
pub mod pipeline;
pub mod request;

// Re-export commonly used types
pub use async_trait::async_trait;
pub use context::{Context, Publisher};
pub use envelope::{Envelope, short_type_name};
pub use error::{BoxError, MediatorError};
pub use futures::future::BoxFuture;
pub use handler::{FnHandler, RequestHandler, handler_fn};
pub use notification::{Notification, NotificationHandler};
pub use pipeline::{Behavior, ErasedHandler, Next, TypedHandler};
pub use request::Request;
pub use tokio_util::sync::CancellationToken;
