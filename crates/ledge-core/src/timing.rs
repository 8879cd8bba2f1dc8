//! Frame budget arithmetic.
//!
//! All durations here are `Duration`s combined with saturating subtraction,
//! so a frame that overruns its budget produces "no sleep" instead of an
//! underflowed, enormous one.

use std::time::Duration;

/// Time allotted to one update + render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBudget {
    frame: Duration,
}

impl FrameBudget {
    /// Budget for `fps` frames per second. Zero is treated as one.
    #[must_use]
    pub fn from_fps(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs(1) / fps.max(1),
        }
    }

    /// The full frame duration.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> Duration {
        self.frame
    }

    /// Time left to sleep after the update and render phases, or `None` if
    /// they used the whole budget (a dropped frame).
    ///
    /// Never exceeds [`frame`](Self::frame).
    #[must_use]
    pub fn remaining(&self, update: Duration, render: Duration) -> Option<Duration> {
        let left = self.frame.saturating_sub(update).saturating_sub(render);
        if left.is_zero() { None } else { Some(left) }
    }
}
