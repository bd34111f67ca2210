// SPDX-License-Identifier: MIT
//
// termlite — a minimal double-buffered terminal core.
//
// Keeps two frames of printable-ASCII cells: the front frame models
// what the terminal currently shows, the back frame is the
// application's canvas. Presenting diffs the two and writes only the
// changed runs, one cursor move per run and one flush per tick, so
// redraw cost tracks what changed rather than screen area. Around that
// core sit raw-mode control with guaranteed restoration, a signal-safe
// resize relay, and a timed single-byte key poll.
//
// No ratatui, no crossterm. The whole wire protocol is a cursor move,
// a clear, cursor hide/show, and printable bytes; owning those few
// sequences directly is the reason this crate exists.

pub mod ansi;
pub mod diff;
pub mod error;
pub mod frame;
pub mod input;
pub mod output;
pub mod resize;
pub mod screen;
pub mod terminal;
