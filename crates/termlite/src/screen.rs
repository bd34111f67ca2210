// SPDX-License-Identifier: MIT
//
// Screen — the session context that ties the engine together.
//
// Owns the two frames (front models what the terminal shows, back
// receives the application's paints), the presenter that reconciles
// them, and the raw-mode guard for the session. An application's loop
// talks to this type almost exclusively: paint into `back()`, call
// `present()`, service resizes with `handle_resize()`, repeat.
//
// Two constructors, two lifestyles:
//
//   - `new()` runs the full session setup: size query with a 24x80
//     fallback, raw mode (best-effort: a host without a tty still
//     renders), and the SIGWINCH relay.
//   - `with_size()` builds a fixed-size context and touches nothing
//     process-wide. For tests, and for hosts that render into a pipe.
//
// Resize discipline: when a resize is pending, both frames move to the
// new size together, back is cleared to blanks, and front is
// invalidated (zero-filled). Zero is outside the storable alphabet, so
// every cell mismatches on the next present and the terminal repaints
// in full.

use std::io::{self, Write};

use crate::ansi;
use crate::diff::{PresentStats, Presenter};
use crate::error::{Error, Result};
use crate::frame::{BLANK, Frame};
use crate::resize;
use crate::terminal::{self, DEFAULT_SIZE, RawModeGuard, Size};

// ─── ResizeOutcome ───────────────────────────────────────────────────────────

/// What [`Screen::handle_resize`] found when it checked the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// A resize was pending; both frames now match the new terminal size
    /// and the next present will repaint everything.
    Resized,
    /// No resize was pending; nothing changed.
    Unchanged,
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Double-buffered terminal session.
///
/// The front frame is the engine's model of the physical terminal; the
/// back frame is the application's canvas. [`present`](Self::present)
/// diffs them, writes the changed runs, and brings the model up to
/// date. The two frames always share dimensions — every resize goes
/// through this type, never through the frames individually.
///
/// # Example
///
/// ```no_run
/// use termlite::input::poll_key;
/// use termlite::screen::Screen;
///
/// let mut screen = Screen::new()?;
/// screen.hide_cursor()?;
/// screen.clear_screen()?;
///
/// loop {
///     screen.handle_resize()?;
///
///     screen.back().clear(b' ');
///     screen.back().set(0, 0, b'>');
///     screen.present()?;
///
///     if poll_key(200) == Some(b'q') {
///         break;
///     }
/// }
///
/// screen.show_cursor()?;
/// # Ok::<(), termlite::error::Error>(())
/// ```
pub struct Screen {
    /// Model of what the terminal currently displays.
    front: Frame,
    /// What the application wants displayed next.
    back: Frame,
    /// Diff engine and its output buffer.
    presenter: Presenter,
    /// Raw-mode guard for the session; `None` when stdin is not a tty
    /// (or on a headless construction). Dropping it restores the mode.
    raw: Option<RawModeGuard>,
}

impl Screen {
    // ─── Construction ────────────────────────────────────────────────────

    /// Open a full terminal session.
    ///
    /// Queries the terminal size (falling back to [`DEFAULT_SIZE`] when
    /// the query fails), allocates both frames filled with blanks,
    /// enables raw mode, and installs the resize relay.
    ///
    /// Raw mode is best-effort here: if stdin is not an interactive
    /// terminal the screen still constructs and renders — it just cannot
    /// read keys, and there is no mode to restore on drop.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if frame allocation for the queried
    /// size fails.
    pub fn new() -> Result<Self> {
        let size = terminal::get_size().unwrap_or(DEFAULT_SIZE);
        let mut screen = Self::with_size(usize::from(size.rows), usize::from(size.cols))?;

        screen.raw = terminal::enable_raw_mode().ok();
        resize::install();

        Ok(screen)
    }

    /// Build a fixed-size context with no terminal side effects.
    ///
    /// No raw mode, no signal handler, no size query — just the two
    /// blank frames and a presenter. Pair it with
    /// [`present_to`](Self::present_to) to render into any writer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if either dimension is zero or the
    /// cell count overflows.
    pub fn with_size(rows: usize, cols: usize) -> Result<Self> {
        let mut front = Frame::new(rows, cols)?;
        let mut back = Frame::new(rows, cols)?;
        front.clear(BLANK);
        back.clear(BLANK);

        Ok(Self {
            front,
            back,
            presenter: Presenter::new(),
            raw: None,
        })
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Current height in rows (both frames agree).
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.back.rows()
    }

    /// Current width in columns (both frames agree).
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.back.cols()
    }

    /// The application's canvas. Paint here, then call
    /// [`present`](Self::present).
    #[inline]
    pub fn back(&mut self) -> &mut Frame {
        &mut self.back
    }

    /// The engine's model of the terminal, as of the last present.
    #[inline]
    #[must_use]
    pub const fn front(&self) -> &Frame {
        &self.front
    }

    // ─── Presentation ────────────────────────────────────────────────────

    /// Diff back against front, write the changed runs to stdout, and
    /// flush once.
    ///
    /// After this returns, the front frame matches the back frame and a
    /// second call with no intervening paints writes nothing.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the flush to stdout fails. The front frame is
    /// already updated at that point; the next present will not re-emit
    /// the lost bytes.
    pub fn present(&mut self) -> Result<PresentStats> {
        let stats = self.presenter.render(&self.back, &mut self.front);
        self.presenter.flush()?;
        Ok(stats)
    }

    /// [`present`](Self::present), but into an arbitrary writer.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if writing to `w` fails.
    pub fn present_to(&mut self, w: &mut impl Write) -> Result<PresentStats> {
        let stats = self.presenter.render(&self.back, &mut self.front);
        self.presenter.flush_to(w)?;
        Ok(stats)
    }

    // ─── Resize ──────────────────────────────────────────────────────────

    /// Service a pending terminal resize, if any.
    ///
    /// Checks (and clears) the relay's flag. When a resize was pending,
    /// re-queries the terminal size, resizes both frames to it, clears
    /// the back frame to blanks, and invalidates the front frame so the
    /// next present repaints every cell.
    ///
    /// # Errors
    ///
    /// [`Error::SizeUnavailable`] if the size query fails mid-session
    /// (there is no silent fallback after startup);
    /// [`Error::InvalidDimensions`] if frame reallocation fails.
    pub fn handle_resize(&mut self) -> Result<ResizeOutcome> {
        if !resize::check_and_clear() {
            return Ok(ResizeOutcome::Unchanged);
        }

        let size = terminal::get_size().ok_or(Error::SizeUnavailable)?;
        self.apply_resize(size)?;
        Ok(ResizeOutcome::Resized)
    }

    /// Move both frames to `size` and reset them for a full repaint.
    ///
    /// Both resizes validate the same dimensions through the same
    /// checked arithmetic, so the second cannot fail once the first has
    /// succeeded — the frames never diverge.
    fn apply_resize(&mut self, size: Size) -> Result<()> {
        let (rows, cols) = (usize::from(size.rows), usize::from(size.cols));

        self.back.resize(rows, cols)?;
        self.front.resize(rows, cols)?;

        // New terminal region is visually blank; the zero-filled front
        // can't match any storable byte, so everything repaints.
        self.back.clear(BLANK);
        self.front.invalidate();
        Ok(())
    }

    // ─── Session Helpers ─────────────────────────────────────────────────

    /// Hide the terminal cursor.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if writing to stdout fails.
    pub fn hide_cursor(&self) -> Result<()> {
        let mut out = io::stdout().lock();
        ansi::cursor_hide(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Show the terminal cursor.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if writing to stdout fails.
    pub fn show_cursor(&self) -> Result<()> {
        let mut out = io::stdout().lock();
        ansi::cursor_show(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Clear the terminal and home the cursor.
    ///
    /// Also resets the front frame to blanks, keeping the model truthful
    /// about the wipe: the next present repaints exactly the non-blank
    /// back cells.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if writing to stdout fails.
    pub fn clear_screen(&mut self) -> Result<()> {
        let mut out = io::stdout().lock();
        ansi::clear_screen(&mut out)?;
        out.flush()?;
        self.front.clear(BLANK);
        Ok(())
    }

    /// Whether this session holds the raw-mode guard.
    #[inline]
    #[must_use]
    pub const fn is_raw_session(&self) -> bool {
        self.raw.is_some()
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Screen({}x{}, raw: {})",
            self.rows(),
            self.cols(),
            self.raw.is_some()
        )
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
//
// Everything here goes through `with_size` + `present_to`: no raw mode,
// no stdout, and no reads of the process-wide resize flag (the relay's
// own test owns that). Resizes are driven through `apply_resize`
// directly.
