//! # Bounded byte buffer.
//!
//! [`LineBuffer`] is the one place where capacity accounting happens. Every
//! fragment of the status line, and every desktop entry of the desktop store,
//! goes through it.
//!
//! ## Rules
//! - **Never overruns**: a write that does not fit is cut at the remaining capacity.
//! - **Honest counts**: every `push_*` returns the number of bytes actually stored,
//!   which is always `<= remaining()` at the time of the call.
//! - **Byte truncation**: cuts may land inside a multi-byte UTF-8 sequence.
//! - **Reserve**: an optional tail reserve is kept out of reach of `push_*` and can
//!   only be filled by [`LineBuffer::terminate`].
//!
//! ## Example
//! ```
//! use statusfeed::LineBuffer;
//!
//! let mut buf = LineBuffer::with_reserve(8, 1);
//! assert_eq!(buf.push_str("cpu: "), 5);
//! assert_eq!(buf.push_str("3.2GHz"), 2); // only 7 usable bytes
//! assert_eq!(buf.remaining(), 0);
//! assert_eq!(buf.terminate(b"\n"), 1);
//! assert_eq!(buf.as_bytes(), b"cpu: 3.\n");
//! ```

use std::fmt;

/// Fixed-capacity byte buffer with truncating writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    reserve: usize,
}

impl LineBuffer {
    /// Creates an empty buffer that holds at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self::with_reserve(capacity, 0)
    }

    /// Creates an empty buffer of `capacity` bytes whose last `reserve` bytes
    /// are only reachable through [`terminate`](Self::terminate).
    ///
    /// `reserve` is clamped to `capacity`.
    pub fn with_reserve(capacity: usize, reserve: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
            reserve: reserve.min(capacity),
        }
    }

    /// Total capacity, reserve included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes stored so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes still available to `push_*` calls.
    #[inline]
    pub fn remaining(&self) -> usize {
        (self.capacity - self.reserve).saturating_sub(self.bytes.len())
    }

    /// `true` once `push_*` calls can no longer store anything.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Empties the buffer, keeping its allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Appends as much of `src` as fits and returns the number of bytes stored.
    pub fn push_bytes(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.remaining());
        self.bytes.extend_from_slice(&src[..n]);
        n
    }

    /// Appends as much of `s` as fits and returns the number of bytes stored.
    #[inline]
    pub fn push_str(&mut self, s: &str) -> usize {
        self.push_bytes(s.as_bytes())
    }

    /// Formats `args` into the buffer, truncating at the remaining capacity.
    ///
    /// Returns the number of bytes stored. A formatting error from a `Display`
    /// impl stops the write; whatever was stored before the error stays and is
    /// counted.
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> usize {
        let before = self.bytes.len();
        let _ = fmt::Write::write_fmt(self, args);
        self.bytes.len() - before
    }

    /// Appends `tail` using the reserved bytes (and any unused capacity).
    ///
    /// Returns the number of bytes stored.
    pub fn terminate(&mut self, tail: &[u8]) -> usize {
        let room = self.capacity.saturating_sub(self.bytes.len());
        let n = tail.len().min(room);
        self.bytes.extend_from_slice(&tail[..n]);
        n
    }
}

impl fmt::Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_truncates_at_capacity() {
        let mut buf = LineBuffer::new(5);
        assert_eq!(buf.push_str("abc"), 3);
        assert_eq!(buf.push_str("defg"), 2);
        assert_eq!(buf.push_str("h"), 0);
        assert_eq!(buf.as_bytes(), b"abcde");
        assert!(buf.is_full());
    }

    #[test]
    fn test_push_fmt_reports_stored_bytes_only() {
        let mut buf = LineBuffer::new(6);
        let n = buf.push_fmt(format_args!("Mem: {} Mb", 1234));
        assert_eq!(n, 6);
        assert_eq!(buf.as_bytes(), b"Mem: 1");
    }

    #[test]
    fn test_reserve_is_only_reachable_through_terminate() {
        let mut buf = LineBuffer::with_reserve(4, 1);
        assert_eq!(buf.push_str("abcdef"), 3);
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.terminate(b"\n"), 1);
        assert_eq!(buf.as_bytes(), b"abc\n");
        assert_eq!(buf.terminate(b"\n"), 0);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut buf = LineBuffer::with_reserve(0, 1);
        assert_eq!(buf.push_str("x"), 0);
        assert_eq!(buf.terminate(b"\n"), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_truncation_may_split_multibyte_sequences() {
        let mut buf = LineBuffer::new(2);
        assert_eq!(buf.push_str("é!"), 2);
        assert_eq!(buf.as_bytes(), "é".as_bytes());

        let mut buf = LineBuffer::new(1);
        assert_eq!(buf.push_str("é"), 1);
        assert_eq!(buf.as_bytes(), &"é".as_bytes()[..1]);
    }

    #[test]
    fn test_clear_restores_full_budget() {
        let mut buf = LineBuffer::with_reserve(4, 1);
        buf.push_str("abc");
        buf.clear();
        assert_eq!(buf.remaining(), 3);
        assert_eq!(buf.capacity(), 4);
    }
}
