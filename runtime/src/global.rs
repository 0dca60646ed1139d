//! Optional process-wide mediator.
//!
//! Applications that cannot thread a [`Mediator`] through their call graph
//! may install one at startup and reach it from anywhere. The slot can be set
//! once; it is never replaced or cleared.

use crate::mediator::Mediator;
use mediator_core::{MediatorError, Notification, Request};
use std::sync::OnceLock;

static GLOBAL: OnceLock<Mediator> = OnceLock::new();

/// Install the process-wide mediator.
///
/// # Errors
///
/// Returns [`MediatorError::GlobalAlreadySet`] if one is already installed;
/// the installed mediator is kept.
pub fn set_global(mediator: Mediator) -> Result<(), MediatorError> {
    GLOBAL
        .set(mediator)
        .map_err(|_| MediatorError::GlobalAlreadySet)?;
    tracing::info!("Global mediator installed");
    Ok(())
}

/// The process-wide mediator.
///
/// # Errors
///
/// Returns [`MediatorError::GlobalNotSet`] before [`set_global`] has been called.
pub fn global() -> Result<&'static Mediator, MediatorError> {
    GLOBAL.get().ok_or(MediatorError::GlobalNotSet)
}

/// Dispatch a request through the process-wide mediator.
///
/// # Errors
///
/// [`MediatorError::GlobalNotSet`], or anything [`Mediator::send`] returns.
pub async fn send<R: Request>(request: R) -> Result<R::Response, MediatorError> {
    global()?.send(request).await
}

/// Publish a notification through the process-wide mediator.
///
/// # Errors
///
/// [`MediatorError::GlobalNotSet`], or anything [`Mediator::publish`] returns.
pub async fn publish<N: Notification>(notification: N) -> Result<(), MediatorError> {
    global()?.publish(notification).await
}
