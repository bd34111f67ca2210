// SPDX-License-Identifier: MIT
//
// Differential presenter — the core of the rendering path.
//
// Instead of redrawing the entire screen every tick, we compare the back
// frame (what the application wants shown) against the front frame (what
// the terminal currently shows) and emit escape sequences only for the
// cells that differ. In a typical session a keystroke changes one or two
// short spans out of the whole grid; presenting becomes a surgical update.
//
// The pipeline per tick:
//
//   1. Application paints into the back frame.
//   2. Presenter.render() walks both frames row by row.
//   3. Each maximal contiguous mismatched run costs one cursor move plus
//      its cell bytes — never one move per cell.
//   4. The sanitized bytes written out are also written into the front
//      frame, so after render() the front is an exact model of the
//      terminal and the next diff starts from truth.
//   5. A single flush pushes the whole tick's output in one write().
//
// Optimizations:
//
//   - Row-level skip: entire unchanged rows are detected with a single
//     slice comparison and skipped without touching individual cells.
//   - Run coalescing: adjacent mismatches share one cursor move; output
//     volume is proportional to changed spans, not frame area.

use std::io::{self, Write};

use crate::ansi;
use crate::frame::{Frame, sanitize};
use crate::output::OutputBuffer;

// ─── PresentStats ────────────────────────────────────────────────────────────

/// Statistics from a present pass, for profiling and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentStats {
    /// Contiguous mismatched runs emitted (one cursor move each).
    pub spans: usize,
    /// Cells that differed and were written to the sink.
    pub cells_written: usize,
    /// Cells that matched the front frame and were skipped.
    pub cells_skipped: usize,
    /// Total bytes of output generated, escapes included.
    pub bytes_written: usize,
}

impl PresentStats {
    /// Total cells processed (written + skipped).
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_written + self.cells_skipped
    }
}

// ─── Presenter ───────────────────────────────────────────────────────────────

/// Diff engine that reconciles a front frame with a back frame.
///
/// Owns only the output buffer; the two frames belong to the caller (in
/// practice the [`Screen`](crate::screen::Screen), which keeps them in
/// dimension lockstep). All output is buffered for a single `write()`
/// per tick.
///
/// # Usage
///
/// ```no_run
/// use termlite::diff::Presenter;
/// use termlite::frame::Frame;
///
/// let mut presenter = Presenter::new();
/// let mut front = Frame::new(24, 80).unwrap();
/// let mut back = Frame::new(24, 80).unwrap();
///
/// // Paint into `back`...
///
/// let stats = presenter.render(&back, &mut front);
/// presenter.flush().unwrap();
/// // stats.spans tells you how many runs it took.
/// ```
pub struct Presenter {
    output: OutputBuffer,
}

impl Presenter {
    /// Create a presenter with an empty output buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
        }
    }

    /// Diff `back` against `front` and generate the reconciling output.
    ///
    /// Walks each row left to right. A run starts at the first mismatched
    /// column and extends while mismatches continue; the run costs one
    /// cursor move plus one byte per cell. Every byte emitted is sanitized
    /// and simultaneously stored into `front`, so a second call without
    /// intervening mutation emits nothing.
    ///
    /// After calling this, use [`flush`](Self::flush) or
    /// [`flush_to`](Self::flush_to) to write the output to the terminal,
    /// or [`output_bytes`](Self::output_bytes) to inspect it (for tests).
    ///
    /// # Panics
    ///
    /// Panics if the frames differ in dimensions. That is a contract
    /// violation, not a runtime condition: the screen resizes both frames
    /// together, always.
    pub fn render(&mut self, back: &Frame, front: &mut Frame) -> PresentStats {
        assert_eq!(
            (back.rows(), back.cols()),
            (front.rows(), front.cols()),
            "front/back frame dimension mismatch"
        );

        self.output.clear();

        let cols = back.cols();
        let mut stats = PresentStats::default();

        for row in 0..back.rows() {
            // Safety: row < rows, so both row lookups succeed.
            let back_row = back.row(row).unwrap();
            let front_row = front.row_mut(row).unwrap();

            // Row-skip optimization: one slice compare per unchanged row.
            if back_row == front_row {
                stats.cells_skipped += cols;
                continue;
            }

            let mut col = 0;
            while col < cols {
                if back_row[col] == front_row[col] {
                    col += 1;
                    stats.cells_skipped += 1;
                    continue;
                }

                // Mismatch: one cursor move covers the whole run.
                ansi::cursor_to(&mut self.output, row, col).ok();
                while col < cols && back_row[col] != front_row[col] {
                    let byte = sanitize(back_row[col]);
                    self.output.push(byte);
                    front_row[col] = byte;
                    col += 1;
                    stats.cells_written += 1;
                }
                stats.spans += 1;
            }
        }

        stats.bytes_written = self.output.len();
        stats
    }

    /// The raw bytes from the last render (for testing and debugging).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::frame::BLANK;

    /// Helper: a front/back pair both cleared to blanks, as after session
    /// setup.
    fn blank_pair(rows: usize, cols: usize) -> (Frame, Frame) {
        let mut front = Frame::new(rows, cols).unwrap();
        let mut back = Frame::new(rows, cols).unwrap();
        front.clear(BLANK);
        back.clear(BLANK);
        (front, back)
    }

    /// Helper: render and return (stats, output string).
    fn render_str(
        presenter: &mut Presenter,
        back: &Frame,
        front: &mut Frame,
    ) -> (PresentStats, String) {
        let stats = presenter.render(back, front);
        let output = String::from_utf8(presenter.output_bytes().to_vec()).unwrap();
        (stats, output)
    }

    // ── Idempotence ─────────────────────────────────────────────────────

    #[test]
    fn identical_frames_emit_nothing() {
        let (mut front, back) = blank_pair(5, 10);
        let mut presenter = Presenter::new();

        let (stats, output) = render_str(&mut presenter, &back, &mut front);

        assert_eq!(stats.spans, 0);
        assert_eq!(stats.cells_written, 0);
        assert_eq!(stats.cells_skipped, 50);
        assert_eq!(stats.bytes_written, 0);
        assert_eq!(output, "");
    }

    #[test]
    fn second_render_without_mutation_emits_nothing() {
        let (mut front, mut back) = blank_pair(5, 10);
        let mut presenter = Presenter::new();

        back.set(2, 3, b'X');
        let (first, _) = render_str(&mut presenter, &back, &mut front);
        assert_eq!(first.cells_written, 1);

        let (second, output) = render_str(&mut presenter, &back, &mut front);
        assert_eq!(second.spans, 0);
        assert_eq!(second.bytes_written, 0);
        assert_eq!(output, "");
    }

    // ── Single Changes ──────────────────────────────────────────────────

    #[test]
    fn single_cell_change_is_one_span() {
        let (mut front, mut back) = blank_pair(5, 10);
        let mut presenter = Presenter::new();

        back.set(2, 3, b'X');
        let (stats, output) = render_str(&mut presenter, &back, &mut front);

        assert_eq!(stats.spans, 1);
        assert_eq!(stats.cells_written, 1);
        assert_eq!(stats.cells_skipped, 49);
        // Row 2, col 3 → 1-indexed 3;4.
        assert_eq!(output, "\x1b[3;4HX");
    }

    #[test]
    fn front_mirrors_back_after_render() {
        let (mut front, mut back) = blank_pair(4, 6);
        let mut presenter = Presenter::new();

        back.set(0, 0, b'a');
        back.set(1, 5, b'b');
        back.set(3, 2, b'c');
        presenter.render(&back, &mut front);

        for r in 0..4 {
            for c in 0..6 {
                assert_eq!(front.get(r, c), back.get(r, c), "mismatch at ({r}, {c})");
            }
        }
    }

    // ── Run Coalescing ──────────────────────────────────────────────────

    #[test]
    fn adjacent_changes_share_one_cursor_move() {
        let (mut front, mut back) = blank_pair(3, 10);
        let mut presenter = Presenter::new();

        back.set(1, 2, b'a');
        back.set(1, 3, b'b');
        back.set(1, 4, b'c');
        let (stats, output) = render_str(&mut presenter, &back, &mut front);

        assert_eq!(stats.spans, 1);
        assert_eq!(stats.cells_written, 3);
        assert_eq!(output, "\x1b[2;3Habc");
    }

    #[test]
    fn disjoint_runs_get_one_move_each() {
        let (mut front, mut back) = blank_pair(3, 12);
        let mut presenter = Presenter::new();

        // Two runs on row 1: cols 2-3 and cols 6-8.
        back.set(1, 2, b'a');
        back.set(1, 3, b'b');
        back.set(1, 6, b'x');
        back.set(1, 7, b'y');
        back.set(1, 8, b'z');
        let (stats, output) = render_str(&mut presenter, &back, &mut front);

        assert_eq!(stats.spans, 2);
        assert_eq!(stats.cells_written, 5);
        assert_eq!(output, "\x1b[2;3Hab\x1b[2;7Hxyz");
    }

    #[test]
    fn run_extends_to_last_column() {
        let (mut front, mut back) = blank_pair(2, 5);
        let mut presenter = Presenter::new();

        back.set(0, 3, b'-');
        back.set(0, 4, b'-');
        let (stats, output) = render_str(&mut presenter, &back, &mut front);

        assert_eq!(stats.spans, 1);
        assert_eq!(output, "\x1b[1;4H--");
    }

    #[test]
    fn runs_never_cross_row_boundaries() {
        let (mut front, mut back) = blank_pair(2, 4);
        let mut presenter = Presenter::new();

        // Last cell of row 0 and first cell of row 1 are adjacent in the
        // flat buffer but must still produce two spans.
        back.set(0, 3, b'1');
        back.set(1, 0, b'2');
        let (stats, output) = render_str(&mut presenter, &back, &mut front);

        assert_eq!(stats.spans, 2);
        assert_eq!(output, "\x1b[1;4H1\x1b[2;1H2");
    }

    // ── Row Skipping ────────────────────────────────────────────────────

    #[test]
    fn unchanged_rows_are_skipped() {
        let (mut front, mut back) = blank_pair(50, 100);
        let mut presenter = Presenter::new();

        for c in 0..100 {
            back.set(25, c, b'#');
        }
        let (stats, _) = render_str(&mut presenter, &back, &mut front);

        assert_eq!(stats.spans, 1);
        assert_eq!(stats.cells_written, 100);
        assert_eq!(stats.cells_skipped, 4900);
    }

    // ── Sanitization at Emit ────────────────────────────────────────────

    #[test]
    fn invalidated_front_forces_full_repaint() {
        let (mut front, mut back) = blank_pair(2, 3);
        let mut presenter = Presenter::new();
        presenter.render(&back, &mut front);

        // Simulate the post-resize state: front zeroed, back blank.
        front.invalidate();
        back.clear(BLANK);
        let (stats, output) = render_str(&mut presenter, &back, &mut front);

        // Every cell mismatches (0 vs ' '), one run per row.
        assert_eq!(stats.spans, 2);
        assert_eq!(stats.cells_written, 6);
        assert_eq!(output, "\x1b[1;1H   \x1b[2;1H   ");
    }

    #[test]
    fn emitted_bytes_are_always_printable() {
        let mut front = Frame::new(1, 4).unwrap();
        front.clear(BLANK);
        // A zero-filled back frame reaches the diff with out-of-alphabet
        // cells; the emit path must still produce only printable bytes.
        let back = Frame::new(1, 4).unwrap();
        let mut presenter = Presenter::new();

        let (_, output) = render_str(&mut presenter, &back, &mut front);

        assert_eq!(output, "\x1b[1;1H????");
        assert_eq!(front.get(0, 0), Some(b'?'));
    }

    // ── Flushing ────────────────────────────────────────────────────────

    #[test]
    fn flush_to_drains_the_buffer() {
        let (mut front, mut back) = blank_pair(2, 4);
        let mut presenter = Presenter::new();

        back.set(0, 0, b'k');
        presenter.render(&back, &mut front);

        let mut sink = Vec::new();
        presenter.flush_to(&mut sink).unwrap();

        assert_eq!(sink, b"\x1b[1;1Hk");
        assert!(presenter.output_bytes().is_empty());
    }

    // ── Contract ────────────────────────────────────────────────────────

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn mismatched_dimensions_panic() {
        let mut front = Frame::new(2, 4).unwrap();
        let back = Frame::new(2, 5).unwrap();
        Presenter::new().render(&back, &mut front);
    }

    // ── Stats ───────────────────────────────────────────────────────────

    #[test]
    fn stats_total_cells() {
        let stats = PresentStats {
            spans: 2,
            cells_written: 10,
            cells_skipped: 40,
            bytes_written: 30,
        };
        assert_eq!(stats.total_cells(), 50);
    }

    #[test]
    fn consecutive_renders_converge() {
        let (mut front, mut back) = blank_pair(5, 10);
        let mut presenter = Presenter::new();

        // Tick 1: no change.
        let s1 = presenter.render(&back, &mut front);
        assert_eq!(s1.cells_written, 0);

        // Tick 2: one change.
        back.set(0, 0, b'!');
        let s2 = presenter.render(&back, &mut front);
        assert_eq!(s2.cells_written, 1);

        // Tick 3: revert.
        back.set(0, 0, BLANK);
        let s3 = presenter.render(&back, &mut front);
        assert_eq!(s3.cells_written, 1);

        // Tick 4: steady state.
        let s4 = presenter.render(&back, &mut front);
        assert_eq!(s4.cells_written, 0);
        assert_eq!(s4.bytes_written, 0);
    }
}
