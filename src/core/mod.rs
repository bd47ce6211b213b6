//! Runtime core: composition and the cycle driver.
//!
//! - [`Composer`]: walks the providers and builds one bounded status line;
//! - [`Bar`]: owns the desktop store and runs wait, parse, compose, emit;
//! - `input`: bounded line reader behind the wait.

mod bar;
mod composer;
mod input;

pub use bar::Bar;
pub use composer::Composer;
