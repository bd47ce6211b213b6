//! Window-manager desktop state: token grammar, line parser and the store.
//!
//! ## Contents
//! - [`Desktop`] one decoded token (per-cycle, never retained)
//! - [`DesktopParser`] renders a whole input line into a bounded buffer
//! - [`DesktopStore`] the rendered fragment that survives between cycles
//!
//! ## Flow
//! ```text
//! stdin line ──► DesktopParser::render(line, scratch)
//!                    ├─ Ok  ──► DesktopStore swaps scratch in (wholesale replace)
//!                    └─ Err ──► store untouched, DesktopsRejected published
//! ```

mod grammar;
pub(crate) mod parser;
mod store;

pub use grammar::Desktop;
pub use parser::DesktopParser;
pub use store::DesktopStore;
