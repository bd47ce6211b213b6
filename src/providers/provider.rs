//! # Provider abstraction.
//!
//! A [`Provider`] renders one fragment of the status line into a bounded
//! [`LineBuffer`]. Providers are shared as [`ProviderRef`] (`Arc<dyn Provider>`)
//! and invoked in configured order by the [`Composer`](crate::Composer).
//!
//! ## Contract
//! - Write at most `out.remaining()` bytes (the buffer enforces it) and return
//!   the number of bytes written.
//! - Return `0` when there is nothing to show; never fail the cycle.
//! - Do not keep state between cycles; the only shared state is the
//!   [`DesktopStore`], reachable read-only through [`RenderContext`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::buffer::LineBuffer;
use crate::config::Affix;
use crate::desktops::DesktopStore;

/// Read-only state handed to every provider for one cycle.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub desktops: &'a DesktopStore,
}

impl<'a> RenderContext<'a> {
    pub fn new(desktops: &'a DesktopStore) -> Self {
        Self { desktops }
    }
}

/// # One fragment source of the status line.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use statusfeed::{LineBuffer, Provider, RenderContext};
///
/// struct Hostname;
///
/// #[async_trait]
/// impl Provider for Hostname {
///     fn name(&self) -> &str { "hostname" }
///
///     async fn render(&self, _ctx: &RenderContext<'_>, out: &mut LineBuffer) -> usize {
///         out.push_str("box")
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Stable, human-readable provider name (for logs).
    fn name(&self) -> &str;

    /// Renders this provider's fragment; returns the number of bytes written.
    async fn render(&self, ctx: &RenderContext<'_>, out: &mut LineBuffer) -> usize;
}

/// Shared handle to a provider.
pub type ProviderRef = Arc<dyn Provider>;

/// Writes `prefix`, the body produced by `args` and `suffix` as one fragment.
pub(crate) fn decorated(out: &mut LineBuffer, affix: &Affix, args: std::fmt::Arguments<'_>) -> usize {
    out.push_str(&affix.prefix) + out.push_fmt(args) + out.push_str(&affix.suffix)
}
