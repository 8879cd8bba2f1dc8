// SPDX-License-Identifier: MIT
//
// ledge-term — Terminal output layer for ledge.
//
// The game paints each frame into a character grid; this crate diffs the
// grid against the previous frame and writes only the changed cells in a
// single synchronized write. It also owns the terminal's mode (cbreak,
// alternate screen, hidden cursor) and the signal flags the game loop
// polls.
//
// Direct ANSI sequences and termios, no TUI framework.

pub mod ansi;
pub mod buffer;
pub mod diff;
pub mod output;
pub mod signal;
pub mod terminal;
