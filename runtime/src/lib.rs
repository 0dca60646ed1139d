//! # Mediator Runtime
//!
//! Runtime implementation of the typed request mediator.
//!
//! This crate turns the traits in `mediator-core` into a working dispatcher:
//! handlers and behaviors are registered once on a [`MediatorBuilder`], frozen
//! into a [`Mediator`], and requests are then sent through it from any number
//! of tasks.
//!
//! ## Core Components
//!
//! - **Registries**: one handler per request type, many per notification type
//! - **Behavior Chain**: ordered behaviors composed around every handler call
//! - **Mediator**: resolves the handler, composes the chain, recovers the typed response
//! - **Behaviors**: stock logging and metrics behaviors
//! - **Global**: an optional process-wide mediator slot
//!
//! ## Example
//!
//! ```ignore
//! use mediator_runtime::{Mediator, behaviors::LoggingBehavior};
//!
//! let mediator = Mediator::builder()
//!     .behavior(LoggingBehavior::new())
//!     .handler_fn(|request: Ping, _ctx| async move { Ok::<_, BoxError>(request.0 + 1) })
//!     .build()?;
//!
//! let pong = mediator.send(Ping(1)).await?;
//! ```

/// Stock behaviors (logging, metrics)
pub mod behaviors;

/// Ordered behavior list and composition
pub mod chain;

/// Optional process-wide mediator
pub mod global;

/// The dispatcher and its builder
pub mod mediator;

/// Prometheus metrics for observability
pub mod metrics;

/// Handler registries
pub mod registry;

pub use chain::BehaviorChain;
pub use mediator::{Mediator, MediatorBuilder};
pub use registry::{HandlerRegistry, NotificationRegistry};

// Re-export the core vocabulary so applications need only this crate
pub use mediator_core::{
    Behavior, BoxError, CancellationToken, Context, Envelope, MediatorError, Next, Notification,
    NotificationHandler, Request, RequestHandler, async_trait, handler_fn,
};
