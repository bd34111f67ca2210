// SPDX-License-Identifier: MIT
//
// termlite-demo — a moving marker over a double-buffered session.
//
// The demo exists to exercise every part of the library in one loop:
//
//   Screen::new      → size query, raw mode, resize relay
//   handle_resize    → frames follow the terminal, marker gets clamped
//   back() painting  → blank canvas, centered title, marker on top
//   present          → minimal diff to stdout
//   poll_key(200)    → bounded wait; a timeout just re-ticks the loop
//
// Keys: w/a/s/d move the marker, q (or Q) quits.

use std::process;

use termlite::error::Result;
use termlite::frame::BLANK;
use termlite::input::poll_key;
use termlite::screen::{ResizeOutcome, Screen};

/// Poll cadence per tick. Bounded, so pending resizes get serviced even
/// while no key is pressed.
const FRAME_POLL_MS: i32 = 200;

/// Title line, centered on the middle row.
const TITLE: &str = "termlite demo (w/a/s/d move, q quit)";

/// The marker glyph.
const MARKER: u8 = b'#';

// ─── Marker ─────────────────────────────────────────────────────────────────

/// Marker position, kept inside the screen bounds at all times.
struct Marker {
    row: usize,
    col: usize,
}

impl Marker {
    /// Start in the middle of the screen.
    fn centered(rows: usize, cols: usize) -> Self {
        Self {
            row: rows / 2,
            col: cols / 2,
        }
    }

    /// Pull the marker back inside after the screen shrank.
    fn clamp(&mut self, rows: usize, cols: usize) {
        self.row = self.row.min(rows.saturating_sub(1));
        self.col = self.col.min(cols.saturating_sub(1));
    }

    /// Apply a movement key, staying in bounds. Unknown keys do nothing.
    fn step(&mut self, key: u8, rows: usize, cols: usize) {
        match key {
            b'w' => self.row = self.row.saturating_sub(1),
            b's' if self.row + 1 < rows => self.row += 1,
            b'a' => self.col = self.col.saturating_sub(1),
            b'd' if self.col + 1 < cols => self.col += 1,
            _ => {}
        }
    }
}

// ─── Painting ───────────────────────────────────────────────────────────────

/// Paint one tick: blank canvas, centered title, then the marker, so the
/// marker overdraws the title when they meet.
fn paint(screen: &mut Screen, marker: &Marker) {
    let rows = screen.rows();
    let cols = screen.cols();
    let back = screen.back();

    back.clear(BLANK);

    let title_row = rows / 2;
    let title_col = cols.saturating_sub(TITLE.len()) / 2;
    for (i, byte) in TITLE.bytes().enumerate() {
        // set() drops the overflow when the terminal is narrower than
        // the title.
        back.set(title_row, title_col + i, byte);
    }

    back.set(marker.row, marker.col, MARKER);
}

// ─── Event loop ─────────────────────────────────────────────────────────────

fn run(screen: &mut Screen) -> Result<()> {
    screen.hide_cursor()?;
    screen.clear_screen()?;

    let mut marker = Marker::centered(screen.rows(), screen.cols());

    loop {
        if screen.handle_resize()? == ResizeOutcome::Resized {
            marker.clamp(screen.rows(), screen.cols());
        }

        paint(screen, &marker);
        screen.present()?;

        let Some(key) = poll_key(FRAME_POLL_MS) else {
            continue;
        };
        if matches!(key, b'q' | b'Q') {
            return Ok(());
        }
        marker.step(key, screen.rows(), screen.cols());
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let mut screen = Screen::new().unwrap_or_else(|e| {
        eprintln!("termlite-demo: failed to open terminal session: {e}");
        process::exit(1);
    });

    let result = run(&mut screen);

    // Cosmetic teardown on every path, then an explicit drop: exit()
    // below skips destructors, and the raw-mode restore lives in the
    // guard the screen owns.
    let _ = screen.show_cursor();
    let _ = screen.clear_screen();
    drop(screen);

    if let Err(e) = result {
        eprintln!("termlite-demo: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
