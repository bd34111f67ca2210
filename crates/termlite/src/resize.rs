// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Resize signal relay — SIGWINCH in, one atomic flag out.
//
// A signal handler may interrupt the main thread between any two
// instructions, so it must not allocate, lock, or touch a frame. The
// handler here does the only thing that is safe: set a process-wide
// `AtomicBool`. The main loop consumes the flag from normal control flow
// with a test-and-clear, so a burst of resize notifications during one
// drag collapses into a single observed "pending" — one repaint, not one
// per notification.
//
// This module owns the flag outright. Nothing else in the crate reads or
// writes it; the screen asks `check_and_clear()` and that is the whole
// interface.

use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the SIGWINCH handler, cleared by [`check_and_clear`].
static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

/// Install the SIGWINCH handler.
///
/// The handler simply sets [`RESIZE_PENDING`]. Writing an atomic is one
/// of the few operations permitted inside a signal handler. `SA_RESTART`
/// keeps interrupted reads transparent to the rest of the crate.
///
/// Safe to call more than once; reinstalling the same handler is
/// harmless. On platforms without SIGWINCH this is a no-op and the flag
/// simply never becomes pending.
#[cfg(unix)]
pub fn install() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
pub fn install() {}

/// Atomically test and clear the pending-resize flag.
///
/// Returns whether a resize was pending. Consuming reads happen only
/// here, and only from normal control flow, so each physical resize
/// burst is acted on at most once per check.
#[must_use]
pub fn check_and_clear() -> bool {
    RESIZE_PENDING.swap(false, Ordering::Relaxed)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // The flag is process-wide, so a single test drives the whole
    // lifecycle; splitting it up would let the harness race the steps.
    // No other test in the crate touches the flag.

    #[test]
    fn pending_flag_is_test_and_clear() {
        // A burst of stores coalesces into one pending observation.
        RESIZE_PENDING.store(true, Ordering::Relaxed);
        RESIZE_PENDING.store(true, Ordering::Relaxed);
        RESIZE_PENDING.store(true, Ordering::Relaxed);

        assert!(check_and_clear());
        assert!(!check_and_clear());
        assert!(!check_and_clear());
    }

    #[cfg(unix)]
    #[test]
    fn install_does_not_panic() {
        install();
        install();
    }
}
