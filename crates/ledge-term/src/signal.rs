// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Signal flags — SIGINT and SIGWINCH turned into atomics.
//
// Handlers do nothing but store `true` into a static `AtomicBool`, which is
// async-signal-safe. The game loop polls the interrupt flag once per frame
// and the screen polls the resize flag before painting. Neither ever blocks
// on a signal.
//
// The interrupt store uses Release and the loop's load uses Acquire, so
// anything the handler's thread wrote before the signal is visible to the
// loop once it observes the flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the SIGINT handler. Never cleared by this module.
static INTERRUPT_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Set by the SIGWINCH handler, cleared by [`take_resize`].
static RESIZE_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install handlers for SIGINT and SIGWINCH.
///
/// Safe to call more than once; later calls reinstall the same handlers.
#[cfg(unix)]
pub fn install_handlers() {
    unsafe {
        install(libc::SIGINT, sigint_handler as *const () as usize);
        install(libc::SIGWINCH, sigwinch_handler as *const () as usize);
    }
}

#[cfg(not(unix))]
pub fn install_handlers() {}

#[cfg(unix)]
unsafe fn install(signal: libc::c_int, handler: usize) {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = handler;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(signal, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigint_handler(_sig: libc::c_int) {
    INTERRUPT_RECEIVED.store(true, Ordering::Release);
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    RESIZE_RECEIVED.store(true, Ordering::Release);
}

/// The flag the SIGINT handler sets, for handing to the game loop.
#[must_use]
pub fn interrupt_flag() -> &'static AtomicBool {
    &INTERRUPT_RECEIVED
}

/// Whether a resize arrived since the last call. Clears the flag.
#[must_use]
pub fn take_resize() -> bool {
    RESIZE_RECEIVED.swap(false, Ordering::AcqRel)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
