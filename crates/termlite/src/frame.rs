// SPDX-License-Identifier: MIT
//
// Frame — the 2D character grid that everything paints to.
//
// One byte per cell. The alphabet is printable ASCII (32..=126); anything
// else is replaced by `?` before it is stored, so a frame can never hold a
// byte that would misrender or act as a control code on the wire. The diff
// engine compares two frames of equal size and emits escape sequences only
// for the cells that differ.
//
// Design:
//
//   - Flat `Vec<u8>` with row-major indexing. A row's cells are contiguous
//     in memory, so the renderer's left-to-right scan is a linear walk.
//
//   - `rows * cols` is computed in exactly one place (`cell_count`), with
//     checked arithmetic. Construction and resize both go through it;
//     nothing else in the crate multiplies dimensions.
//
//   - Resize preserves the overlapping top-left rectangle and zero-fills
//     the rest. A zero cell is deliberately outside the alphabet: it can
//     never equal a stored character, which is what makes zero-filling
//     usable as a "repaint everything" marker.

use std::io::{self, Write};

use crate::error::{Error, Result};

/// Replacement for bytes outside the printable range.
pub const PLACEHOLDER: u8 = b'?';

/// The blank cell apps clear to between ticks.
pub const BLANK: u8 = b' ';

/// Map a byte into the printable-ASCII alphabet.
///
/// Bytes 32..=126 pass through; everything else becomes [`PLACEHOLDER`].
///
/// # Examples
///
/// ```
/// use termlite::frame::sanitize;
///
/// assert_eq!(sanitize(b'a'), b'a');
/// assert_eq!(sanitize(b' '), b' ');
/// assert_eq!(sanitize(b'\x1b'), b'?');
/// assert_eq!(sanitize(0x7f), b'?');
/// ```
#[inline]
#[must_use]
pub const fn sanitize(byte: u8) -> u8 {
    if matches!(byte, 32..=126) { byte } else { PLACEHOLDER }
}

/// Checked `rows * cols`.
///
/// The single place dimension arithmetic happens. Zero dimensions and
/// overflowing products are both rejected here, so `new` and `resize`
/// never repeat the check.
fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions { rows, cols });
    }
    rows.checked_mul(cols)
        .ok_or(Error::InvalidDimensions { rows, cols })
}

// ─── Frame ──────────────────────────────────────────────────────────────────

/// A rows×cols grid of printable-ASCII cells.
///
/// Flat `Vec<u8>` with row-major indexing: `index = row * cols + col`.
/// Freshly constructed frames are zero-filled (every cell outside the
/// alphabet), so the first diff against one repaints everything written
/// since.
///
/// # Examples
///
/// ```
/// use termlite::frame::Frame;
///
/// let mut frame = Frame::new(24, 80).unwrap();
/// assert_eq!(frame.rows(), 24);
/// assert_eq!(frame.cols(), 80);
///
/// frame.set(3, 5, b'X');
/// assert_eq!(frame.get(3, 5), Some(b'X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Frame {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a zero-filled frame.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if either dimension is zero or the
    /// `rows * cols` product overflows `usize`. Nothing is allocated on
    /// failure.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let size = cell_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![0; size],
        })
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Frame height in rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Frame width in columns.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `(row, col)` is within the frame.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Convert `(row, col)` to a flat index.
    #[inline]
    const fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// The stored byte at `(row, col)`, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if self.in_bounds(row, col) {
            Some(self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    /// The raw cell slice (for the diff engine's hot loop).
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// A single row as a slice. Returns `None` if `row` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row < self.rows {
            let start = self.index(row, 0);
            Some(&self.cells[start..start + self.cols])
        } else {
            None
        }
    }

    /// A single mutable row slice. Returns `None` if `row` is out of bounds.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> Option<&mut [u8]> {
        if row < self.rows {
            let start = self.index(row, 0);
            let w = self.cols;
            Some(&mut self.cells[start..start + w])
        } else {
            None
        }
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Write a sanitized byte at `(row, col)`.
    ///
    /// Out-of-alphabet bytes are stored as [`PLACEHOLDER`], never raw.
    /// Returns `true` if the position was in bounds; an out-of-bounds
    /// write changes nothing.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, byte: u8) -> bool {
        if !self.in_bounds(row, col) {
            return false;
        }
        let idx = self.index(row, col);
        self.cells[idx] = sanitize(byte);
        true
    }

    /// Fill every cell with the sanitized `byte`.
    pub fn clear(&mut self, byte: u8) {
        self.cells.fill(sanitize(byte));
    }

    /// Zero-fill every cell.
    ///
    /// Zero is outside the alphabet, so after this call no cell can equal
    /// any character a frame write could have stored. The screen uses this
    /// on the front frame after a resize to force a full repaint.
    pub(crate) fn invalidate(&mut self) {
        self.cells.fill(0);
    }

    /// Resize the frame, preserving the overlapping top-left rectangle.
    ///
    /// Cells at `(r, c)` with `r < min(old_rows, new_rows)` and
    /// `c < min(old_cols, new_cols)` keep their values; everything else is
    /// zero-filled.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] under the same conditions as [`new`]
    /// (zero dimension or overflowing product). The frame is left
    /// unchanged on failure.
    ///
    /// [`new`]: Frame::new
    pub fn resize(&mut self, new_rows: usize, new_cols: usize) -> Result<()> {
        let size = cell_count(new_rows, new_cols)?;
        let mut cells = vec![0; size];

        let keep_rows = self.rows.min(new_rows);
        let keep_cols = self.cols.min(new_cols);
        for r in 0..keep_rows {
            let src = r * self.cols;
            let dst = r * new_cols;
            cells[dst..dst + keep_cols].copy_from_slice(&self.cells[src..src + keep_cols]);
        }

        self.rows = new_rows;
        self.cols = new_cols;
        self.cells = cells;
        Ok(())
    }

    // ─── Dump ────────────────────────────────────────────────────────────

    /// Write the whole grid to `w`, one row per line, and flush.
    ///
    /// A debugging aid; the rendering path is the diff engine. Bytes are
    /// sanitized on the way out like every other write path, so a
    /// zero-filled frame dumps as placeholders rather than NULs.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        for row in 0..self.rows {
            // Safety: row < rows, so the lookup succeeds.
            let line: Vec<u8> = self.row(row).unwrap().iter().map(|&b| sanitize(b)).collect();
            w.write_all(&line)?;
            w.write_all(b"\n")?;
        }
        w.flush()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({}x{})", self.rows, self.cols)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
