//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging event handlers into the
//! feed. Each subscriber is driven by a dedicated worker loop fed by a bounded
//! queue owned by the [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow; they never delay a status line.
//! - Each subscriber declares its queue capacity via [`Subscribe::queue_capacity`].
//!   If a queue overflows, events for that subscriber are **dropped**.
//! - Subscribers must not write to stdout: it carries the status lines.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        256
    }
}
