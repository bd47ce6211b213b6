//! # Built-in subscribers
//!
//! - [`LogWriter`]: prints events in a human-readable form to stderr.

mod log;

pub use log::LogWriter;
