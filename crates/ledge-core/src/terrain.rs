//! Terrain generation — a constrained random walk over floor heights.
//!
//! Each call to [`next_sample`] looks at the newest tiles of the scroll
//! buffer through a [`GenerationWindow`] and produces the tile that follows
//! them. The walk is shaped by three rules from [`TerrainRules`]:
//!
//! - **Minimum run**: a run of identical tiles (floor or gap) must reach
//!   `min_floor_length` before anything else may follow it.
//! - **Step limit**: the next floor run sits within `max_height_diff` rows of
//!   the previous one.
//! - **Gap limit**: no more than `max_gap_length` gap tiles in a row.
//!
//! Once a run is long enough the walk holds its height 80% of the time, so
//! platforms are usually much longer than the minimum.
//!
//! The gap limit is enforced by redrawing, and redrawing is bounded: after
//! [`MAX_RESAMPLE_ATTEMPTS`] gap draws in a row the generator falls back to
//! the most recent floor height. A broken or adversarial random source can
//! make the terrain dull, never make it hang.

use rand::Rng;
use tracing::warn;

use crate::config::TerrainRules;

/// Redraws allowed when a gap would exceed the gap limit.
pub const MAX_RESAMPLE_ATTEMPTS: usize = 32;

/// Sides of the inertia die.
const INERTIA_SIDES: u32 = 10;

/// Rolls below this keep the current floor height.
const INERTIA_HOLD: u32 = 8;

// ─── Tile ───────────────────────────────────────────────────────────────────

/// One horizontal slot of terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    /// No floor. The player would fall here.
    Gap,
    /// Solid floor whose top is at this row (0 = bottom row).
    Floor(u16),
}

impl Tile {
    /// Signed level used by the generator arithmetic. Gaps are `-1`, one
    /// below the lowest floor.
    #[inline]
    #[must_use]
    pub const fn level(self) -> i32 {
        match self {
            Self::Gap => -1,
            Self::Floor(h) => h as i32,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_gap(self) -> bool {
        matches!(self, Self::Gap)
    }

    #[inline]
    #[must_use]
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Floor(_))
    }

    /// The floor height, or `None` for a gap.
    #[inline]
    #[must_use]
    pub const fn height(self) -> Option<u16> {
        match self {
            Self::Gap => None,
            Self::Floor(h) => Some(h),
        }
    }
}

// ─── GenerationWindow ───────────────────────────────────────────────────────

/// Read-only view of buffer history, addressed backwards from the newest
/// tile.
///
/// The scroll buffer is a ring, so the window carries the ring's storage and
/// the slot of its oldest tile. `back(0)` is the newest tile, `back(1)` the
/// one before it, and so on.
#[derive(Debug, Clone, Copy)]
pub struct GenerationWindow<'a> {
    tiles: &'a [Tile],
    head: usize,
}

impl<'a> GenerationWindow<'a> {
    /// A window over ring storage whose oldest tile sits at `head`.
    #[must_use]
    pub const fn new(tiles: &'a [Tile], head: usize) -> Self {
        Self { tiles, head }
    }

    /// A window over plain oldest-to-newest history.
    #[must_use]
    pub const fn linear(tiles: &'a [Tile]) -> Self {
        Self { tiles, head: 0 }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tile `k` positions behind the newest one.
    #[must_use]
    pub fn back(&self, k: usize) -> Option<Tile> {
        let len = self.tiles.len();
        if k >= len {
            return None;
        }
        let slot = (self.head + len - 1 - k) % len;
        Some(self.tiles[slot])
    }

    /// The newest tile.
    #[inline]
    #[must_use]
    pub fn newest(&self) -> Option<Tile> {
        self.back(0)
    }

    /// The newest `n` tiles, newest first.
    pub fn recent(self, n: usize) -> impl Iterator<Item = Tile> + 'a {
        (0..n.min(self.len())).filter_map(move |k| self.back(k))
    }

    /// Height of the most recent floor tile anywhere in the window.
    #[must_use]
    pub fn last_floor(self) -> Option<u16> {
        self.recent(self.len()).find_map(Tile::height)
    }
}

// ─── Generator ──────────────────────────────────────────────────────────────

/// Produce the tile that follows the window's newest tile.
///
/// An empty window behaves like a bottom-row floor.
pub fn next_sample<R: Rng + ?Sized>(
    window: GenerationWindow<'_>,
    rules: &TerrainRules,
    rng: &mut R,
) -> Tile {
    let last = window.newest().unwrap_or(Tile::Floor(0));

    // The current run spans fewer than `min_floor_length` tiles.
    let run_anchor = window.back(rules.min_floor_length.saturating_sub(1));
    if run_anchor.is_some_and(|anchor| anchor != last) {
        return last;
    }

    if last.is_floor() && rng.random_range(0..INERTIA_SIDES) < INERTIA_HOLD {
        return last;
    }

    let level = last.level();
    let diff = i32::from(rules.max_height_diff);
    let hi = i32::from(rules.max_floor_height()).min(level + diff);
    let lo = (level - diff).max(0).min(hi);

    let candidate = draw(lo, hi, rng);
    if candidate.is_floor() {
        return candidate;
    }

    // Another gap is fine while a floor remains inside the gap limit.
    if window.recent(rules.max_gap_length).any(Tile::is_floor) {
        return candidate;
    }

    for _ in 0..MAX_RESAMPLE_ATTEMPTS {
        let redraw = draw(lo, hi, rng);
        if redraw.is_floor() {
            return redraw;
        }
    }

    let fallback = window
        .last_floor()
        .map_or(lo, |h| i32::from(h).clamp(lo, hi));
    warn!(
        attempts = MAX_RESAMPLE_ATTEMPTS,
        fallback, "gap limit reached and every redraw was a gap; using fallback floor"
    );
    u16::try_from(fallback).map_or(Tile::Floor(0), Tile::Floor)
}

/// Uniform draw over `[lo - 1, hi]`, where `lo - 1` stands for a gap.
fn draw<R: Rng + ?Sized>(lo: i32, hi: i32, rng: &mut R) -> Tile {
    let value = rng.random_range(lo - 1..=hi);
    if value < lo {
        Tile::Gap
    } else {
        u16::try_from(value).map_or(Tile::Gap, Tile::Floor)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{RngCore, SeedableRng};

    /// A random source that only ever produces zero bits. Every range draw
    /// lands on its lowest value.
    pub struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    /// A random source that only ever produces one bits. Every range draw
    /// lands on its highest value.
    pub struct MaxRng;

    impl RngCore for MaxRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }
        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xFF);
        }
    }

    fn rules() -> TerrainRules {
        TerrainRules {
            height: 10,
            min_floor_length: 3,
            max_gap_length: 4,
            max_height_diff: 2,
        }
    }

    // ── Tile ────────────────────────────────────────────────────────

    #[test]
    fn tile_levels() {
        assert_eq!(Tile::Gap.level(), -1);
        assert_eq!(Tile::Floor(0).level(), 0);
        assert_eq!(Tile::Floor(7).level(), 7);
    }

    #[test]
    fn tile_queries() {
        assert!(Tile::Gap.is_gap());
        assert!(!Tile::Gap.is_floor());
        assert_eq!(Tile::Gap.height(), None);
        assert!(Tile::Floor(3).is_floor());
        assert_eq!(Tile::Floor(3).height(), Some(3));
    }

    // ── GenerationWindow ────────────────────────────────────────────

    #[test]
    fn linear_window_reads_backwards() {
        let tiles = [Tile::Floor(1), Tile::Floor(2), Tile::Gap];
        let w = GenerationWindow::linear(&tiles);
        assert_eq!(w.newest(), Some(Tile::Gap));
        assert_eq!(w.back(1), Some(Tile::Floor(2)));
        assert_eq!(w.back(2), Some(Tile::Floor(1)));
        assert_eq!(w.back(3), None);
    }

    #[test]
    fn ring_window_wraps() {
        // Storage after two advances of a 4-slot ring: oldest is slot 2.
        let tiles = [Tile::Floor(5), Tile::Floor(6), Tile::Floor(3), Tile::Floor(4)];
        let w = GenerationWindow::new(&tiles, 2);
        let newest_first: Vec<_> = w.recent(4).collect();
        assert_eq!(
            newest_first,
            vec![Tile::Floor(6), Tile::Floor(5), Tile::Floor(4), Tile::Floor(3)]
        );
    }

    #[test]
    fn recent_is_clamped_to_len() {
        let tiles = [Tile::Floor(1), Tile::Floor(2)];
        assert_eq!(GenerationWindow::linear(&tiles).recent(10).count(), 2);
    }

    #[test]
    fn last_floor_skips_gaps() {
        let tiles = [Tile::Floor(4), Tile::Gap, Tile::Gap];
        assert_eq!(GenerationWindow::linear(&tiles).last_floor(), Some(4));
        let gaps = [Tile::Gap; 3];
        assert_eq!(GenerationWindow::linear(&gaps).last_floor(), None);
    }

    #[test]
    fn empty_window() {
        let w = GenerationWindow::linear(&[]);
        assert!(w.is_empty());
        assert_eq!(w.newest(), None);
        assert_eq!(w.back(0), None);
    }

    // ── Minimum run ─────────────────────────────────────────────────

    #[test]
    fn short_floor_run_is_extended() {
        // Run of 5 is only two long; min run is 3.
        let tiles = [Tile::Floor(2), Tile::Floor(2), Tile::Floor(2), Tile::Floor(5), Tile::Floor(5)];
        let mut rng = MaxRng; // would otherwise change height
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut rng),
            Tile::Floor(5)
        );
    }

    #[test]
    fn short_gap_run_is_extended() {
        let tiles = [Tile::Floor(2), Tile::Floor(2), Tile::Floor(2), Tile::Gap];
        let mut rng = MaxRng; // would otherwise draw the highest floor
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut rng),
            Tile::Gap
        );
    }

    // ── Inertia ─────────────────────────────────────────────────────

    #[test]
    fn low_roll_holds_height() {
        let tiles = [Tile::Floor(4); 5];
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut ZeroRng),
            Tile::Floor(4)
        );
    }

    // ── Height change ───────────────────────────────────────────────

    #[test]
    fn rise_is_capped_by_height_diff() {
        let tiles = [Tile::Floor(2); 5];
        // MaxRng skips inertia and draws the top of the range: 2 + 2.
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut MaxRng),
            Tile::Floor(4)
        );
    }

    #[test]
    fn rise_is_capped_by_ceiling() {
        let tiles = [Tile::Floor(7); 5];
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut MaxRng),
            Tile::Floor(7)
        );
    }

    #[test]
    fn landing_after_gap_is_low() {
        // After a gap the level is -1, so the top of the range is diff - 1.
        let tiles = [Tile::Floor(6), Tile::Gap, Tile::Gap, Tile::Gap];
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut MaxRng),
            Tile::Floor(1)
        );
    }

    // ── Gap bounding ────────────────────────────────────────────────

    #[test]
    fn gap_accepted_while_floor_is_in_reach() {
        let tiles = [Tile::Floor(2), Tile::Gap, Tile::Gap, Tile::Gap];
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut ZeroRng),
            Tile::Gap
        );
    }

    #[test]
    fn degenerate_rng_falls_back_to_last_floor() {
        // Four gaps fill the gap limit; ZeroRng would draw gaps forever.
        let tiles = [Tile::Floor(1), Tile::Gap, Tile::Gap, Tile::Gap, Tile::Gap];
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut ZeroRng),
            Tile::Floor(1)
        );
    }

    #[test]
    fn fallback_is_clamped_into_reach() {
        // The last floor (6) is out of reach from a gap (max 1 with diff 2).
        let tiles = [Tile::Floor(6), Tile::Gap, Tile::Gap, Tile::Gap, Tile::Gap];
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut ZeroRng),
            Tile::Floor(1)
        );
    }

    #[test]
    fn fallback_without_any_floor_uses_bottom_row() {
        let tiles = [Tile::Gap; 6];
        assert_eq!(
            next_sample(GenerationWindow::linear(&tiles), &rules(), &mut ZeroRng),
            Tile::Floor(0)
        );
    }

    #[test]
    fn full_gap_run_ends_with_real_draw() {
        let tiles = [Tile::Floor(3), Tile::Gap, Tile::Gap, Tile::Gap, Tile::Gap];
        let mut rng = SmallRng::seed_from_u64(0x1ED6E);
        for _ in 0..50 {
            let tile = next_sample(GenerationWindow::linear(&tiles), &rules(), &mut rng);
            assert!(tile.is_floor(), "gap limit exceeded: {tile:?}");
        }
    }

    #[test]
    fn empty_window_yields_floor() {
        let tile = next_sample(GenerationWindow::linear(&[]), &rules(), &mut ZeroRng);
        assert_eq!(tile, Tile::Floor(0));
    }
}
