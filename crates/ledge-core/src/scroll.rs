//! Scrolling terrain — the tile ring and the frame-to-tile clock.
//!
//! [`ScrollBuffer`] holds a fixed number of tiles, oldest to newest. Each
//! advance drops the oldest tile and appends one generated tile, so the
//! length never changes. Storage is a ring with a moving head: an advance
//! overwrites one slot and bumps an index instead of shifting every tile.
//!
//! [`ScrollController`] converts a scroll speed (seconds per tile) into
//! "advance on every Nth frame", letting the terrain move slower than one
//! tile per frame at a fixed frame rate.

use rand::Rng;

use crate::config::TerrainRules;
use crate::error::GameError;
use crate::terrain::{self, GenerationWindow, Tile};

// ─── ScrollBuffer ───────────────────────────────────────────────────────────

/// Fixed-length terrain history.
///
/// Logical index 0 is the oldest tile, `len() - 1` the newest. Renderers
/// read it through [`sample`](Self::sample) or [`iter`](Self::iter); only
/// [`advance`](Self::advance) mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollBuffer {
    tiles: Vec<Tile>,
    /// Storage slot of logical index 0.
    head: usize,
    rules: TerrainRules,
}

impl ScrollBuffer {
    /// Allocate a buffer of `len` tiles, all `Floor(start_height)`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::BufferAllocation`] if the tiles cannot be
    /// allocated.
    pub fn new(len: usize, start_height: u16, rules: TerrainRules) -> Result<Self, GameError> {
        let mut tiles = Vec::new();
        tiles
            .try_reserve_exact(len)
            .map_err(|source| GameError::BufferAllocation { len, source })?;
        tiles.resize(len, Tile::Floor(start_height));
        Ok(Self {
            tiles,
            head: 0,
            rules,
        })
    }

    /// Build a buffer from explicit history, oldest first.
    #[must_use]
    pub const fn from_tiles(tiles: Vec<Tile>, rules: TerrainRules) -> Self {
        Self {
            tiles,
            head: 0,
            rules,
        }
    }

    /// Number of tiles. Constant for the buffer's lifetime.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn rules(&self) -> &TerrainRules {
        &self.rules
    }

    /// The tile at logical `index` (0 = oldest), or `None` past the end.
    #[must_use]
    pub fn sample(&self, index: usize) -> Option<Tile> {
        let len = self.tiles.len();
        if index >= len {
            return None;
        }
        Some(self.tiles[(self.head + index) % len])
    }

    /// The newest tile.
    #[inline]
    #[must_use]
    pub fn newest(&self) -> Option<Tile> {
        self.window().newest()
    }

    /// Tiles from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        let (wrapped, front) = self.tiles.split_at(self.head);
        front.iter().chain(wrapped).copied()
    }

    /// The generator's view of this buffer.
    #[inline]
    #[must_use]
    pub fn window(&self) -> GenerationWindow<'_> {
        GenerationWindow::new(&self.tiles, self.head)
    }

    /// Drop the oldest tile and append a freshly generated one.
    ///
    /// Returns the new tile. Does nothing (and returns `None`) on an empty
    /// buffer.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Tile> {
        if self.tiles.is_empty() {
            return None;
        }
        let next = terrain::next_sample(self.window(), &self.rules, rng);
        // The oldest slot becomes the newest.
        self.tiles[self.head] = next;
        self.head = (self.head + 1) % self.tiles.len();
        Some(next)
    }

    /// Run `count` advances to build history before the first frame.
    pub fn seed<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        for _ in 0..count {
            self.advance(rng);
        }
    }
}

// ─── ScrollController ───────────────────────────────────────────────────────

/// Per-frame scroll accounting.
///
/// Holds the scroll state: frames left until the next advance, and the
/// period it resets to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollController {
    ticks_left: u32,
    period: u32,
}

impl ScrollController {
    /// A controller that advances once every `period` ticks. A period of
    /// zero is treated as one.
    #[must_use]
    pub const fn new(period: u32) -> Self {
        let period = if period == 0 { 1 } else { period };
        Self {
            ticks_left: period,
            period,
        }
    }

    /// Frames between advances.
    #[inline]
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Frames left before the next advance.
    #[inline]
    #[must_use]
    pub const fn ticks_left(&self) -> u32 {
        self.ticks_left
    }

    /// Count one frame. On every `period`-th call the buffer advances and
    /// the new tile is returned.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        buffer: &mut ScrollBuffer,
        rng: &mut R,
    ) -> Option<Tile> {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left > 0 {
            return None;
        }
        self.ticks_left = self.period;
        buffer.advance(rng)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
