// SPDX-License-Identifier: MIT
//
// Output buffering.
//
// The presenter never writes to the terminal directly. Everything — cursor
// moves and cell bytes alike — accumulates in an `OutputBuffer` and goes
// out in a single write() at the end of the frame. One syscall per frame
// instead of one per diff run, and the terminal never displays a half
// painted update.

use std::io::{self, Write};

/// Initial buffer capacity.
///
/// Cells are single bytes in this crate, so even a full repaint of a
/// large terminal stays moderate: 200×50 is 10,000 cell bytes plus one
/// cursor move per run. 4 KB covers typical diffs without reallocation
/// and grows transparently when a repaint needs more.
const DEFAULT_CAPACITY: usize = 4096;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates escape sequences and cell bytes for a
/// single `write()` syscall.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append a single cell byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&self.buf)?;
            stdout.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing via flush_stdout() / flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_reasonable() {
        assert!(DEFAULT_CAPACITY >= 1024);
        assert!(DEFAULT_CAPACITY <= 65536);
    }

    #[test]
    fn new_buffer_is_empty() {
        let buf = OutputBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn push_accumulates_bytes() {
        let mut buf = OutputBuffer::new();
        buf.push(b'x');
        buf.push(b'y');
        assert_eq!(buf.as_bytes(), b"xy");
    }

    #[test]
    fn write_trait_accumulates() {
        let mut buf = OutputBuffer::new();
        write!(buf, "\x1b[{};{}H", 3, 7).unwrap();
        assert_eq!(buf.as_bytes(), b"\x1b[3;7H");
    }

    #[test]
    fn write_flush_is_a_no_op() {
        let mut buf = OutputBuffer::new();
        buf.push(b'a');
        Write::flush(&mut buf).unwrap();
        assert_eq!(buf.as_bytes(), b"a");
    }

    #[test]
    fn clear_keeps_nothing() {
        let mut buf = OutputBuffer::new();
        buf.push(b'a');
        buf.clear();
        assert!(buf.is_empty());
    }

    #[test]
    fn flush_to_writes_and_clears() {
        let mut buf = OutputBuffer::new();
        buf.push(b'h');
        buf.push(b'i');

        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();

        assert_eq!(sink, b"hi");
        assert!(buf.is_empty());
    }

    #[test]
    fn flush_to_empty_writes_nothing() {
        let mut buf = OutputBuffer::new();
        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert!(sink.is_empty());
    }
}
