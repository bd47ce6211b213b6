//! # Bounded line reader for the desktop-state input.
//!
//! [`LineReader`] hands out one `\n`-terminated line at a time and never keeps
//! more than `limit` bytes of it:
//!
//! ```text
//! fill_buf ──► [ body ......... | \n ] ──► pending (first `limit` bytes)
//!                                          seen += body.len()
//!          ──► consume(used)
//! ```
//!
//! ## Rules
//! - A line longer than `limit` is dropped up to its terminator and reported
//!   as [`Line::Overlong`] with its full length.
//! - Bytes of an unfinished line stay in the reader; dropping a pending
//!   [`LineReader::next_line`] future loses nothing.
//! - An unterminated tail before end of input is still a line.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Outcome of [`LineReader::next_line`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Line {
    /// A complete line, terminator stripped.
    Complete(Vec<u8>),
    /// A line past the limit; its bytes were discarded.
    Overlong { len: usize },
    /// End of input with nothing pending.
    Eof,
}

pub(crate) struct LineReader<R> {
    reader: R,
    pending: Vec<u8>,
    seen: usize,
    limit: usize,
}

impl<R> LineReader<R>
where
    R: AsyncBufRead + Unpin,
{
    pub(crate) fn new(reader: R, limit: usize) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            seen: 0,
            limit,
        }
    }

    pub(crate) async fn next_line(&mut self) -> io::Result<Line> {
        loop {
            let chunk = self.reader.fill_buf().await?;
            if chunk.is_empty() {
                return Ok(if self.seen == 0 {
                    Line::Eof
                } else {
                    self.finish()
                });
            }

            let (body, used, done) = match chunk.iter().position(|&b| b == b'\n') {
                Some(i) => (&chunk[..i], i + 1, true),
                None => (chunk, chunk.len(), false),
            };
            let room = self.limit.saturating_sub(self.pending.len());
            self.pending
                .extend_from_slice(&body[..body.len().min(room)]);
            self.seen += body.len();
            self.reader.consume(used);

            if done {
                return Ok(self.finish());
            }
        }
    }

    fn finish(&mut self) -> Line {
        let seen = std::mem::take(&mut self.seen);
        let line = std::mem::take(&mut self.pending);
        if seen > self.limit {
            Line::Overlong { len: seen }
        } else {
            Line::Complete(line)
        }
    }
}
