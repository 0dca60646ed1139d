//! Ordered list of behaviors applied to every dispatch.

use mediator_core::{Behavior, Context, ErasedHandler, Next};
use std::sync::Arc;

/// Behaviors in registration order.
///
/// The first behavior pushed is the outermost wrapper: it runs first on the
/// way in and last on the way out.
#[derive(Clone, Default)]
pub struct BehaviorChain {
    behaviors: Vec<Arc<dyn Behavior>>,
}

impl BehaviorChain {
    /// Create an empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a behavior. It wraps inside every behavior pushed before it.
    pub fn push(&mut self, behavior: Arc<dyn Behavior>) {
        tracing::debug!(
            behavior = behavior.name(),
            position = self.behaviors.len(),
            "Registered behavior"
        );
        self.behaviors.push(behavior);
    }

    /// Number of behaviors
    #[must_use]
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    /// Whether the chain has no behaviors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Behavior names, outermost first
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|behavior| behavior.name()).collect()
    }

    /// Compose the chain around `handler`.
    ///
    /// With no behaviors the returned continuation calls the handler directly.
    #[must_use]
    pub fn compose<'a>(&'a self, handler: &'a dyn ErasedHandler, ctx: &'a Context) -> Next<'a> {
        Next::new(&self.behaviors, handler, ctx)
    }
}

impl std::fmt::Debug for BehaviorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
