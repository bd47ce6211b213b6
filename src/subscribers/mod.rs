//! # Event subscribers for the status feed.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Bar / Composer ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit(&Event)
//!                                                                │
//!                                                     ┌──────────┼──────────┐
//!                                                     ▼          ▼          ▼
//!                                                 LogWriter   Metrics    Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use statusfeed::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct Outages;
//!
//! #[async_trait]
//! impl Subscribe for Outages {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::ProviderSilent {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "outages" }
//! }
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod embedded;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
