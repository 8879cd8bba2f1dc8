//! Fixed-rate game loop.
//!
//! Each frame runs the update phase (scroll clock) and the render phase
//! back to back, then sleeps whatever is left of the frame budget. A frame
//! that overruns skips its sleep and the next one starts at once; that is a
//! dropped frame, not an error.
//!
//! The loop stops when the interrupt flag is set. The flag is polled only
//! between frames, so an update or render in progress always completes, and
//! [`Renderer::end_screen`] always runs before [`GameLoop::run`] returns.
//!
//! ```text
//!   Running ──(flag set)──▶ Terminating ──(end_screen)──▶ Stopped
//! ```

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, trace};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::session::Session;
use crate::timing::FrameBudget;

// ─── Renderer ───────────────────────────────────────────────────────────────

/// Screen collaborator driven by the loop.
///
/// Only [`render`](Renderer::render) is required.
pub trait Renderer {
    /// Prepare the screen. Called once before the first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen cannot be set up.
    fn init_screen(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Draw the session and return how long drawing took.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails; the loop then tears down and stops.
    fn render(&mut self, session: &Session) -> io::Result<Duration>;

    /// Restore the screen. Called exactly once when the loop ends, however
    /// it ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen cannot be restored.
    fn end_screen(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── State ──────────────────────────────────────────────────────────────────

/// Lifecycle of a [`GameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not yet run.
    Idle,
    /// Running frames.
    Running,
    /// Interrupt observed; tearing the screen down.
    Terminating,
    /// Screen restored; `run` has returned.
    Stopped,
}

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    /// Frames run to completion.
    pub frames: u64,
    /// Frames whose update + render used the whole budget.
    pub overruns: u64,
    /// Buffer advances made during the run.
    pub tiles_scrolled: u64,
}

// ─── GameLoop ───────────────────────────────────────────────────────────────

pub struct GameLoop {
    budget: FrameBudget,
    state: LoopState,
    stats: LoopStats,
}

impl GameLoop {
    #[must_use]
    pub const fn new(budget: FrameBudget) -> Self {
        Self {
            budget,
            state: LoopState::Idle,
            stats: LoopStats {
                frames: 0,
                overruns: 0,
                tiles_scrolled: 0,
            },
        }
    }

    /// A loop running at the config's frame rate.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(FrameBudget::from_fps(config.frames_per_second))
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn budget(&self) -> FrameBudget {
        self.budget
    }

    #[inline]
    #[must_use]
    pub const fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Run frames until `interrupt` is set.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Render`] if the renderer fails to set up, draw,
    /// or restore the screen. The screen is restored first in every case.
    pub fn run(
        &mut self,
        session: &mut Session,
        renderer: &mut impl Renderer,
        interrupt: &AtomicBool,
    ) -> Result<LoopStats, GameError> {
        if let Err(err) = renderer.init_screen() {
            let _ = renderer.end_screen();
            self.state = LoopState::Stopped;
            return Err(err.into());
        }

        self.state = LoopState::Running;
        let frames = self.run_frames(session, renderer, interrupt);

        self.state = LoopState::Terminating;
        let ended = renderer.end_screen();
        self.state = LoopState::Stopped;

        info!(
            frames = self.stats.frames,
            overruns = self.stats.overruns,
            tiles = self.stats.tiles_scrolled,
            "game loop stopped"
        );

        frames?;
        ended?;
        Ok(self.stats)
    }

    fn run_frames(
        &mut self,
        session: &mut Session,
        renderer: &mut impl Renderer,
        interrupt: &AtomicBool,
    ) -> io::Result<()> {
        while !interrupt.load(Ordering::Acquire) {
            if let Some(sleep) = self.step(session, renderer)? {
                thread::sleep(sleep);
            }
        }
        Ok(())
    }

    /// One frame: update, render, and the sleep the frame has left.
    ///
    /// Returns `None` when the frame overran its budget.
    ///
    /// # Errors
    ///
    /// Propagates a render failure.
    pub fn step(
        &mut self,
        session: &mut Session,
        renderer: &mut impl Renderer,
    ) -> io::Result<Option<Duration>> {
        let start = Instant::now();
        session.update();
        let update = start.elapsed();

        let render = renderer.render(session)?;

        self.stats.frames += 1;
        self.stats.tiles_scrolled = session.tiles_scrolled();

        let sleep = self.budget.remaining(update, render);
        if sleep.is_none() {
            self.stats.overruns += 1;
            trace!(?update, ?render, budget = ?self.budget.frame(), "frame overran its budget");
        }
        Ok(sleep)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
