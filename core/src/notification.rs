//! Notifications: messages delivered to every registered handler.
//!
//! Unlike requests, a notification type may have zero or many handlers and
//! produces no response. Behaviors do not wrap notification delivery.

use crate::context::Context;
use crate::error::BoxError;
use async_trait::async_trait;
use std::fmt::Debug;

/// A message published to zero or more [`NotificationHandler`]s.
pub trait Notification: Debug + Send + Sync + 'static {}

/// Reacts to one notification type.
#[async_trait]
pub trait NotificationHandler<N: Notification>: Send + Sync + 'static {
    /// Handle a published notification.
    ///
    /// # Errors
    ///
    /// A failure stops delivery to the remaining handlers and is returned to
    /// the publisher.
    async fn handle(&self, notification: &N, ctx: &Context) -> Result<(), BoxError>;
}
