// SPDX-License-Identifier: MIT
//
// Error type for the crate.
//
// One enum covers everything a caller can be asked to handle: rejected
// frame dimensions, raw mode on a stream that is not a terminal, a failed
// size query, and plain I/O errors from the OS seams. Per-cell bounds
// results stay at the call site as `bool`/`Option` — a miss there is not
// an error, it is an answer.

use std::io;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Frame dimensions were zero or their product overflows `usize`.
    ///
    /// Returned by frame construction and resize; the frame involved is
    /// left untouched.
    #[error("invalid frame dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Raw mode was requested but stdin is not an interactive terminal.
    #[error("stdin is not a terminal")]
    NotATty,

    /// The terminal size query failed while a session was already running.
    ///
    /// At session start a failed query falls back to 24x80; during a
    /// resize there is no sane fallback, so the failure surfaces here.
    #[error("terminal size query failed")]
    SizeUnavailable,

    /// An OS call failed (mode get/set, write, flush).
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

// ─── Tests ──────────────────────────────────────────────────────────────────
