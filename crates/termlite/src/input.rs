// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Timed keyboard input — one byte at a time, on the caller's schedule.
//
// There is no reader thread and no event queue here. The intended shape
// of a program using this crate is a frame loop: draw, present, then ask
// "did a key arrive before the next tick?" and go around again. A single
// `poll()` on stdin followed by a single one-byte `read()` is the whole
// mechanism, and the timeout doubles as the frame pacing.
//
// Escape sequences (arrow keys, function keys) arrive as multiple bytes
// and come out of `poll_key` one byte per call. Callers that care can
// reassemble them; callers that only want plain keys can ignore bytes
// they don't recognize.

/// Wait up to `timeout_ms` milliseconds for a byte on stdin.
///
/// Returns `Some(byte)` if one was read, `None` on timeout, end of
/// input, or a poll/read error. A negative timeout blocks until a byte
/// arrives, following `poll(2)` semantics. A timeout of zero checks for
/// already-pending input and returns immediately.
///
/// In raw mode (`VMIN = 0`) the read itself never blocks, so the
/// timeout is an upper bound on how long this call takes.
#[cfg(unix)]
pub fn poll_key(timeout_ms: i32) -> Option<u8> {
    // Poll stdin for readability with the caller's timeout.
    let ready = unsafe {
        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        libc::poll(&raw mut pfd, 1, timeout_ms)
    };

    // Timeout or error: no byte this frame.
    if ready <= 0 {
        return None;
    }

    // Data available — read exactly one byte.
    let mut byte = 0u8;
    let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

    if n <= 0 {
        // EOF or error.
        return None;
    }

    Some(byte)
}

/// Non-unix fallback: input is unavailable, every poll times out.
#[cfg(not(unix))]
pub fn poll_key(_timeout_ms: i32) -> Option<u8> {
    None
}

// ─── Tests ───────────────────────────────────────────────────────────────────
