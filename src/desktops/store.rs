//! # Desktop state store.
//!
//! [`DesktopStore`] keeps the most recent rendered desktop fragment between
//! cycles. It is owned by the cycle driver: the parser writes it through
//! [`DesktopStore::update`], the desktops provider reads it through
//! [`DesktopStore::as_bytes`].
//!
//! ## Rules
//! - Starts empty.
//! - A successful update replaces the contents wholesale (no appending).
//! - A failed update leaves the previous contents untouched; the partial
//!   rendering lives in a scratch buffer that is never exposed.

use crate::buffer::LineBuffer;
use crate::desktops::DesktopParser;
use crate::error::ParseError;

/// Bounded, double-buffered storage of the rendered desktop fragment.
#[derive(Clone, Debug)]
pub struct DesktopStore {
    current: LineBuffer,
    scratch: LineBuffer,
}

impl DesktopStore {
    /// Creates an empty store holding at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            current: LineBuffer::new(capacity),
            scratch: LineBuffer::new(capacity),
        }
    }

    /// Current rendered fragment.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.current.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.current.capacity()
    }

    /// Parses `line` and, on success, replaces the stored fragment.
    ///
    /// Returns the size of the new fragment.
    pub fn update(&mut self, parser: &DesktopParser, line: &str) -> Result<usize, ParseError> {
        self.scratch.clear();
        parser.render(line, &mut self.scratch)?;
        std::mem::swap(&mut self.current, &mut self.scratch);
        Ok(self.current.len())
    }
}
