//! Error types used by the statusfeed runtime, parser and providers.
//!
//! This module defines three error enums:
//!
//! - [`RuntimeError`]: fatal failures of the cycle driver (input or output gone bad).
//! - [`ParseError`]: a desktop-state line was rejected; the store keeps its previous contents.
//! - [`ProviderError`]: an I/O collaborator could not deliver data; always downgraded
//!   to an empty fragment at the provider boundary.
//!
//! All of them provide `as_label` (stable snake_case, for logs) and `as_message`.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// # Fatal errors of the cycle driver.
///
/// These are the only conditions that stop the status feed.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Waiting on / reading the desktop-state input failed.
    #[error("desktop-state input failed: {0}")]
    Input(#[source] io::Error),

    /// Writing the composed line to the output failed.
    #[error("status line output failed: {0}")]
    Output(#[source] io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use statusfeed::RuntimeError;
    ///
    /// let err = RuntimeError::Input(std::io::Error::other("closed"));
    /// assert_eq!(err.as_label(), "runtime_input");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Input(_) => "runtime_input",
            RuntimeError::Output(_) => "runtime_output",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::Input(e) => format!("input: {e}"),
            RuntimeError::Output(e) => format!("output: {e}"),
        }
    }
}

/// # Rejections of a desktop-state line.
///
/// A rejected line never touches the desktop store.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token failed the grammar but was not the last token of the line.
    #[error("malformed token #{position}: {token:?}")]
    MalformedToken {
        /// Zero-based index of the token among the non-empty tokens of the line.
        position: usize,
        /// The offending token.
        token: String,
    },

    /// Every token matched the grammar; the terminating sentinel is missing.
    #[error("line ended without a sentinel token")]
    MissingSentinel,

    /// Desktop identifier outside the configured name table.
    #[error("desktop id {id} out of range (have {known} names)")]
    UnknownDesktop {
        /// Identifier reported by the window manager.
        id: u32,
        /// Size of the name table.
        known: usize,
    },

    /// Layout mode outside the configured layout table.
    #[error("layout mode {mode} out of range (have {known} layouts)")]
    UnknownLayout {
        /// Mode code reported for the active desktop.
        mode: u32,
        /// Size of the layout table.
        known: usize,
    },

    /// The line exceeded the input limit and was discarded unread.
    #[error("line of {len} bytes exceeds the {limit} byte input limit")]
    LineTooLong {
        /// Length of the discarded line, terminator excluded.
        len: usize,
        /// Configured input limit.
        limit: usize,
    },
}

impl ParseError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use statusfeed::ParseError;
    ///
    /// assert_eq!(ParseError::MissingSentinel.as_label(), "parse_missing_sentinel");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ParseError::MalformedToken { .. } => "parse_malformed_token",
            ParseError::MissingSentinel => "parse_missing_sentinel",
            ParseError::UnknownDesktop { .. } => "parse_unknown_desktop",
            ParseError::UnknownLayout { .. } => "parse_unknown_layout",
            ParseError::LineTooLong { .. } => "parse_line_too_long",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        format!("{}: {self}", self.as_label())
    }
}

/// # Failures of an I/O collaborator.
///
/// Providers turn every one of these into "zero bytes written".
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Underlying file, socket or process failed.
    #[error("i/o: {0}")]
    Io(#[from] io::Error),

    /// The source answered but the wanted figure is absent or zero.
    #[error("{what} unavailable")]
    Unavailable {
        /// What was missing.
        what: &'static str,
    },

    /// The peer spoke something we did not expect.
    #[error("protocol: {detail}")]
    Protocol {
        /// Offending line or explanation.
        detail: String,
    },

    /// The peer did not answer in time.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The configured timeout.
        timeout: Duration,
    },
}

impl ProviderError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProviderError::Io(_) => "provider_io",
            ProviderError::Unavailable { .. } => "provider_unavailable",
            ProviderError::Protocol { .. } => "provider_protocol",
            ProviderError::Timeout { .. } => "provider_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProviderError::Io(e) => format!("io: {e}"),
            ProviderError::Unavailable { what } => format!("unavailable: {what}"),
            ProviderError::Protocol { detail } => format!("protocol: {detail}"),
            ProviderError::Timeout { timeout } => format!("timeout: {timeout:?}"),
        }
    }
}
