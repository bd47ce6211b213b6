//! # Runtime events emitted by the status feed.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Desktop events**: a desktop-state line was applied or rejected, input closed
//! - **Composition events**: a provider went silent or recovered, the line saturated
//! - **Subscriber events**: a subscriber queue overflowed or a subscriber panicked
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! source name, reasons and byte counts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use statusfeed::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ProviderSilent).with_source("music");
//!
//! assert_eq!(ev.kind, EventKind::ProviderSilent);
//! assert_eq!(ev.source.as_deref(), Some("music"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Desktop state ===
    /// A desktop-state line was parsed and replaced the store contents.
    ///
    /// Sets:
    /// - `bytes`: size of the new store contents
    DesktopsUpdated,

    /// A desktop-state line was rejected; the store is unchanged.
    ///
    /// Sets:
    /// - `reason`: parse error label and message
    DesktopsRejected,

    /// The desktop-state input reached end of file. Later cycles only wait on the timer.
    InputClosed,

    // === Composition ===
    /// A provider stopped producing output (its collaborator is unavailable).
    ///
    /// Sets:
    /// - `source`: provider name
    ProviderSilent,

    /// A provider that was silent produced output again.
    ///
    /// Sets:
    /// - `source`: provider name
    /// - `bytes`: bytes written this cycle
    ProviderRecovered,

    /// The line buffer filled up; trailing providers were skipped.
    ///
    /// Sets:
    /// - `skipped`: number of providers not invoked
    LineSaturated,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: "full" or "closed"
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Provider or subscriber name, if applicable.
    pub source: Option<Arc<str>>,
    /// Human-readable reason (parse errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Byte count (store size, fragment size).
    pub bytes: Option<usize>,
    /// Providers skipped because the line was full.
    pub skipped: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            source: None,
            reason: None,
            bytes: None,
            skipped: None,
        }
    }

    /// Attaches a provider or subscriber name.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a byte count.
    #[inline]
    pub fn with_bytes(mut self, n: usize) -> Self {
        self.bytes = Some(n);
        self
    }

    /// Attaches the number of skipped providers.
    #[inline]
    pub fn with_skipped(mut self, n: usize) -> Self {
        self.skipped = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_source(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_source(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
