//! # Composition engine.
//!
//! Walks the ordered providers once per cycle and assembles a single
//! newline-terminated status line.
//!
//! ```text
//! line (capacity C, 1 byte reserved)
//! ┌──────────┬──────────┬─────┬──────────────┬────┐
//! │ provider │ provider │ ... │ (unused)     │ \n │
//! └──────────┴──────────┴─────┴──────────────┴────┘
//!  remaining -= written after every provider; stop at 0
//! ```
//!
//! ## Rules
//! - Providers are invoked in order; once the line is full the rest are skipped.
//! - A provider that writes nothing does not stop composition.
//! - The terminator always fits: it lives in the reserved byte.
//! - Transitions are published on the [`Bus`], steady states are not:
//!   `ProviderSilent`/`ProviderRecovered` when a provider stops/starts
//!   producing, `LineSaturated` when the line first fills up.
//! - A provider's first observed state is a baseline, not a transition.
//! - Byte accounting uses what actually landed in the line, whatever the
//!   provider reports.

use crate::buffer::LineBuffer;
use crate::events::{Bus, Event, EventKind};
use crate::providers::{ProviderRef, RenderContext};

/// Builds one status line per call from a fixed provider list.
pub struct Composer {
    providers: Vec<ProviderRef>,
    line: LineBuffer,
    /// Last observed state per provider; `None` until it has been invoked.
    producing: Vec<Option<bool>>,
    saturated: bool,
    bus: Bus,
}

impl Composer {
    /// Creates a composer whose lines never exceed `capacity` bytes, terminator included.
    pub fn new(providers: Vec<ProviderRef>, capacity: usize, bus: Bus) -> Self {
        let producing = vec![None; providers.len()];
        Self {
            providers,
            line: LineBuffer::with_reserve(capacity.max(1), 1),
            producing,
            saturated: false,
            bus,
        }
    }

    /// Number of providers walked per cycle.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Maximum line length, terminator included.
    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    /// Composes a fresh line and returns it, `\n` included.
    pub async fn compose(&mut self, ctx: &RenderContext<'_>) -> &[u8] {
        self.line.clear();
        let mut skipped = 0;

        for (i, provider) in self.providers.iter().enumerate() {
            if self.line.is_full() {
                skipped = self.providers.len() - i;
                break;
            }

            let before = self.line.len();
            provider.render(ctx, &mut self.line).await;
            let written = self.line.len() - before;

            let producing = written > 0;
            let previous = self.producing[i].replace(producing);
            if previous.is_some_and(|was| was != producing) {
                let kind = if producing {
                    EventKind::ProviderRecovered
                } else {
                    EventKind::ProviderSilent
                };
                let mut ev = Event::new(kind).with_source(provider.name());
                if producing {
                    ev = ev.with_bytes(written);
                }
                self.bus.publish(ev);
            }
        }

        let saturated = self.line.is_full();
        if saturated && !self.saturated {
            self.bus
                .publish(Event::new(EventKind::LineSaturated).with_skipped(skipped));
        }
        self.saturated = saturated;

        self.line.terminate(b"\n");
        self.line.as_bytes()
    }
}
