// SPDX-License-Identifier: MIT
//
// Terminal control — size query, raw mode, and panic-safe restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control — there is no safe
// alternative. Each unsafe block is minimal and documented.
#![allow(unsafe_code)]
//
// Raw mode is a process-wide resource: termios settings belong to the
// terminal, not to any struct we could hand out. So the saved settings
// live in one module-private slot, and the whole state machine is two
// states — Normal (slot empty) and Raw (slot holds the restoration
// baseline). The first successful capture wins; enabling again while
// already raw is a no-op and never overwrites the baseline.
//
// `enable_raw_mode()` hands back an RAII guard so a session cannot forget
// to restore: drop the guard (or the `Screen` that owns it) and the
// terminal comes back. A panic hook covers the unwinding path, writing a
// pre-built restore sequence directly to fd 1 — bypassing Rust's stdout
// lock, which may be held by the frame that panicked.
//
// No crossterm, no termion: this crate's reason to exist is direct
// control over a handful of escape sequences and one termios toggle.

#[cfg(unix)]
use std::io;
#[cfg(unix)]
use std::sync::{Mutex, Once};

use crate::error::{Error, Result};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of rows (height in character cells).
    pub rows: u16,
    /// Number of columns (width in character cells).
    pub cols: u16,
}

/// Fallback dimensions when the size query fails at session start.
pub const DEFAULT_SIZE: Size = Size { rows: 24, cols: 80 };

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_row > 0 && ws.ws_col > 0 {
        Some(Size {
            rows: ws.ws_row,
            cols: ws.ws_col,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Saved Settings ─────────────────────────────────────────────────────────

/// The restoration baseline — the one piece of process-wide terminal state.
///
/// `Some` means raw mode is active and this holds the settings to restore;
/// `None` means the terminal is in its normal mode. Written only by
/// [`enable_raw_mode`] and [`disable_raw_mode`]; read by the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn lock_saved() -> std::sync::MutexGuard<'static, Option<libc::termios>> {
    // A poisoned lock means a panic elsewhere while the lock was held;
    // the slot contents are still just plain-old-data and usable.
    SAVED_TERMIOS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Whether raw mode is currently active (the saved-settings slot is full).
#[cfg(unix)]
#[must_use]
pub fn is_raw() -> bool {
    lock_saved().is_some()
}

#[cfg(not(unix))]
#[must_use]
pub fn is_raw() -> bool {
    false
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Restore sequence for emergency use: show the cursor.
///
/// The cursor is the only visible mode this crate changes besides termios,
/// so one sequence is the whole emergency story.
#[cfg(unix)]
const EMERGENCY_RESTORE: &[u8] = b"\x1b[?25h";

/// Restore termios from the saved slot. Best-effort, ignores errors.
///
/// Uses `TCSANOW` rather than `TCSAFLUSH`: during a panic we want the
/// terminal usable immediately, pending input be damned.
#[cfg(unix)]
fn restore_termios_from_slot() {
    if let Ok(guard) = SAVED_TERMIOS.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Panic hook guard — ensures the hook is installed at most once per process.
#[cfg(unix)]
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message. The hook
/// writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing Rust's stdout
/// lock to avoid deadlock), restores termios, then delegates to the
/// original panic handler so the error prints to a working terminal.
#[cfg(unix)]
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            restore_termios_from_slot();
            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor,
/// bypassing Rust's `io::stdout()` lock.
#[cfg(unix)]
fn emergency_restore() {
    // Safety: a plain write(2) of a static byte string to fd 1. This runs
    // inside the panic hook, where taking the stdout lock could deadlock.
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// RAII guard for raw mode. Dropping it restores the terminal.
///
/// Returned by [`enable_raw_mode`]. The restore happens at most once per
/// capture: redundant guards from redundant `enable_raw_mode()` calls are
/// harmless because the first drop empties the saved-settings slot and
/// later drops find nothing to do.
#[must_use = "raw mode is restored when the guard is dropped"]
pub struct RawModeGuard {
    _priv: (),
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Enter raw mode.
///
/// Disables line buffering, echo, signal-generating keys (ISIG), extended
/// input processing (IEXTEN), flow control (IXON), CR-to-NL translation
/// (ICRNL), and output post-processing (OPOST). Reads are configured with
/// `VMIN = 0`, `VTIME = 1`: they return immediately with whatever is
/// available, waiting at most a tenth of a second between bytes.
///
/// Idempotent: if raw mode is already active, this is a no-op success and
/// the original restoration baseline is kept.
///
/// # Errors
///
/// [`Error::NotATty`] if stdin is not an interactive terminal;
/// [`Error::Io`] if a termios call fails. On failure the terminal mode is
/// unchanged and the saved-settings slot is left empty.
#[cfg(unix)]
pub fn enable_raw_mode() -> Result<RawModeGuard> {
    use std::os::unix::io::AsRawFd;

    if !is_tty() {
        return Err(Error::NotATty);
    }

    install_panic_hook();

    let mut saved = lock_saved();
    if saved.is_some() {
        // Already raw. The first capture stays the restoration baseline.
        return Ok(RawModeGuard { _priv: () });
    }

    let fd = io::stdin().as_raw_fd();

    // Safety: tcgetattr/tcsetattr on a valid fd, with a zeroed termios as
    // the out-param. The standard POSIX raw-mode dance.
    unsafe {
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &raw mut termios) != 0 {
            return Err(Error::Io(io::Error::last_os_error()));
        }

        *saved = Some(termios);

        termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        termios.c_iflag &= !(libc::IXON | libc::ICRNL);
        termios.c_oflag &= !libc::OPOST;

        // VMIN=0, VTIME=1: non-blocking reads with a short inter-byte wait.
        termios.c_cc[libc::VMIN] = 0;
        termios.c_cc[libc::VTIME] = 1;

        if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
            *saved = None;
            return Err(Error::Io(io::Error::last_os_error()));
        }
    }

    Ok(RawModeGuard { _priv: () })
}

#[cfg(not(unix))]
pub fn enable_raw_mode() -> Result<RawModeGuard> {
    Err(Error::NotATty)
}

/// Leave raw mode, restoring the captured settings.
///
/// Idempotent: a no-op success if the terminal is already in normal mode.
/// The restore is applied only while stdin is still a terminal; either
/// way the saved-settings slot is emptied, so restoration happens exactly
/// once no matter how many guards exist.
///
/// # Errors
///
/// [`Error::Io`] if the termios restore call fails.
#[cfg(unix)]
pub fn disable_raw_mode() -> Result<()> {
    use std::os::unix::io::AsRawFd;

    let Some(original) = lock_saved().take() else {
        return Ok(());
    };

    if !is_tty() {
        return Ok(());
    }

    let fd = io::stdin().as_raw_fd();

    // Safety: restoring a termios we captured earlier on the same fd.
    unsafe {
        if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const original) != 0 {
            return Err(Error::Io(io::Error::last_os_error()));
        }
    }

    Ok(())
}

#[cfg(not(unix))]
pub fn disable_raw_mode() -> Result<()> {
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
