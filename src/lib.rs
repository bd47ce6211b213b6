//! # statusfeed
//!
//! **statusfeed** composes one status line per cycle for text status bars
//! (lemonbar-style markup): system readings, the playing song, the clock and
//! the window manager's desktop state, in a configured order.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   stdin (desktop-state lines)
//!        │
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bar (cycle driver)                                               │
//! │  - DesktopParser ──► DesktopStore (last good desktop fragment)    │
//! │  - Composer (ordered providers, bounded LineBuffer)               │
//! │  - Bus (broadcast events)                                         │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        │ RenderContext { &DesktopStore }              │
//!        ▼                                              ▼
//!   ┌──────────┬──────────┬────────┬───────┬───────┬──────────┐   stdout
//!   │ Desktops │  Music   │ Memory │  Cpu  │ Volume│  Clock   │ ──► one line
//!   └──────────┴──────────┴────────┴───────┴───────┴──────────┘     per cycle
//!                                                       │
//!                                                       ▼
//!                               Bus ──► listener ──► SubscriberSet ──► LogWriter (stderr)
//! ```
//!
//! ### Cycle
//! ```text
//! loop {
//!   ├─► wait for a desktop-state line (at most Config::timeout)
//!   │       ├─ line    ──► parse into the store (rejected lines change nothing)
//!   │       ├─ timeout ──► keep the stored state
//!   │       └─ EOF     ──► InputClosed, keep cycling on the timer
//!   ├─► compose: providers in order, skip the rest once the line is full
//!   └─► write the line + '\n', flush
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                     |
//! |-------------------|----------------------------------------------------------|----------------------------------------|
//! | **Driver**        | Wait, parse, compose, emit.                              | [`Bar`]                                |
//! | **Composition**   | Bounded assembly of provider fragments.                  | [`Composer`], [`LineBuffer`]           |
//! | **Providers**     | Fragment sources; implement your own.                    | [`Provider`], [`ProviderRef`]          |
//! | **Desktops**      | Window-manager line grammar and last-good state.         | [`DesktopParser`], [`DesktopStore`]    |
//! | **Subscriber API**| Hook into runtime events.                                | [`Subscribe`]                          |
//! | **Errors**        | Typed errors for the driver, parser and collaborators.   | [`RuntimeError`], [`ParseError`]       |
//! | **Configuration** | Slots, decorations, name tables, paths and timeouts.     | [`Config`]                             |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`] that prints events to stderr.
//! - `multi-monitor`: defaults [`Config::grammar`] to the seven-field grammar.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use statusfeed::{Affix, Bar, Config, ProviderRef};
//! use statusfeed::providers::{Desktops, Marker};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), statusfeed::RuntimeError> {
//!     let providers: Vec<ProviderRef> = vec![
//!         Arc::new(Marker::new("left", "%{l}")),
//!         Arc::new(Desktops::new(Affix::new("", ""))),
//!     ];
//!     let mut bar = Bar::with_providers(Config::default(), providers, Vec::new());
//!
//!     let input: &[u8] = b"0:2:0:1:0 fail\n";
//!     let mut output = Vec::new();
//!     let token = CancellationToken::new();
//!
//!     let stop = token.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(std::time::Duration::from_millis(10)).await;
//!         stop.cancel();
//!     });
//!     bar.run(input, &mut output, token).await?;
//!     assert!(output.starts_with(b"%{l}"));
//!     Ok(())
//! }
//! ```
mod buffer;
mod config;
mod core;
mod desktops;
mod error;
mod events;
mod subscribers;

pub mod providers;

// ---- Public re-exports ----

pub use buffer::LineBuffer;
pub use config::{Affix, Config, Decorations, DesktopTheme, Grammar, MixerConfig, Slot};
pub use core::{Bar, Composer};
pub use desktops::{Desktop, DesktopParser, DesktopStore};
pub use error::{ParseError, ProviderError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use providers::{Provider, ProviderRef, RenderContext};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
