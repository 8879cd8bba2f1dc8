// SPDX-License-Identifier: MIT
//
// FrameBuffer — the 2D character grid a frame is painted into.
//
// The game paints terrain and the player into this buffer; the diff
// renderer then compares it against the previous frame and emits escape
// sequences only for the cells that changed.
//
// Design:
//
//   - Flat `Vec<char>` with row-major indexing. A row's cells are contiguous
//     in memory, so the renderer's left-to-right scan is linear and a whole
//     row compares with one slice equality.
//
//   - Every cell holds exactly one single-column character. Wide glyphs
//     would push the rest of the row one column right, so callers pick
//     symbols with `char_width(ch) == 1`.
//
// Memory: 200×50 terminal = 10,000 cells × 4 bytes = 40 KB per buffer.

use unicode_width::UnicodeWidthChar;

/// The character a cleared cell holds.
pub const BLANK: char = ' ';

// ─── FrameBuffer ────────────────────────────────────────────────────────────────

/// A 2D grid of terminal cells.
///
/// Flat `Vec<char>` with row-major indexing: `index = y * width + x`.
///
/// # Examples
///
/// ```
/// use ledge_term::buffer::FrameBuffer;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// assert_eq!(buf.width(), 80);
/// assert_eq!(buf.height(), 24);
///
/// buf.set(5, 3, '@');
/// assert_eq!(buf.get(5, 3), Some('@'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl FrameBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a buffer filled with blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![BLANK; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Buffer width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells (`width × height`).
    #[inline]
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Whether `(x, y)` is within the buffer.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Convert `(x, y)` to a flat index.
    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The character at `(x, y)`, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<char> {
        if self.in_bounds(x, y) {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// A single row as a slice. Returns `None` if `y` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[char]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// A single mutable row slice. Returns `None` if `y` is out of bounds.
    #[inline]
    pub fn row_mut(&mut self, y: u16) -> Option<&mut [char]> {
        if y < self.height {
            let start = self.index(0, y);
            let w = usize::from(self.width);
            Some(&mut self.cells[start..start + w])
        } else {
            None
        }
    }

    /// Each row collected into a `String`, top to bottom.
    ///
    /// Handy for snapshot-style assertions.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.height)
            .filter_map(|y| self.row(y))
            .map(|row| row.iter().collect())
            .collect()
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Clear every cell to [`BLANK`].
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Fill every cell with `ch`.
    pub fn fill(&mut self, ch: char) {
        self.cells.fill(ch);
    }

    /// Resize the buffer, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, BLANK);
    }

    /// Copy another buffer's cells into this one.
    ///
    /// Reuses the existing allocation. Both buffers must have the same
    /// dimensions; a mismatch leaves `self` unchanged and returns `false`.
    pub fn copy_from(&mut self, other: &Self) -> bool {
        if self.width != other.width || self.height != other.height {
            return false;
        }
        self.cells.copy_from_slice(&other.cells);
        true
    }

    // ─── Direct Cell Access ──────────────────────────────────────────────

    /// Write a character to `(x, y)`.
    ///
    /// Returns `true` if the position was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, ch: char) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = ch;
        true
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ─────────────────────────────────────────────────────────────────

/// Display width of a character in terminal columns.
///
/// Returns 0 for control characters, 1 for most characters, and 2 for
/// wide characters (CJK, some emoji). Uses the `unicode-width` crate
/// for accuracy per Unicode Standard Annex #11.
///
/// # Examples
///
/// ```
/// use ledge_term::buffer::char_width;
///
/// assert_eq!(char_width('='), 1);
/// assert_eq!(char_width('中'), 2);
/// assert_eq!(char_width('\n'), 0);
/// ```
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

// ─── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn new_buffer_is_blank() {
        let buf = FrameBuffer::new(4, 3);
        assert_eq!(buf.total_cells(), 12);
        assert_eq!(buf.lines(), vec!["    ", "    ", "    "]);
    }

    #[test]
    fn zero_size_buffer() {
        let buf = FrameBuffer::new(0, 0);
        assert_eq!(buf.total_cells(), 0);
        assert!(buf.lines().is_empty());
        assert_eq!(buf.get(0, 0), None);
    }

    // ── Cell access ─────────────────────────────────────────────────────

    #[test]
    fn set_and_get() {
        let mut buf = FrameBuffer::new(5, 2);
        assert!(buf.set(4, 1, '='));
        assert_eq!(buf.get(4, 1), Some('='));
        assert_eq!(buf.lines(), vec!["     ", "    ="]);
    }

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let mut buf = FrameBuffer::new(5, 2);
        assert!(!buf.set(5, 0, 'x'));
        assert!(!buf.set(0, 2, 'x'));
        assert_eq!(buf, FrameBuffer::new(5, 2));
    }

    #[test]
    fn row_slices() {
        let mut buf = FrameBuffer::new(3, 2);
        buf.row_mut(1).unwrap().copy_from_slice(&['a', 'b', 'c']);
        assert_eq!(buf.row(1), Some(&['a', 'b', 'c'][..]));
        assert_eq!(buf.row(2), None);
    }

    // ── Clear, fill, resize ─────────────────────────────────────────────

    #[test]
    fn fill_then_clear() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.fill('#');
        assert_eq!(buf.lines(), vec!["##", "##"]);
        buf.clear();
        assert_eq!(buf.lines(), vec!["  ", "  "]);
    }

    #[test]
    fn resize_clears_content() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.fill('#');
        buf.resize(3, 1);
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 1);
        assert_eq!(buf.lines(), vec!["   "]);
    }

    #[test]
    fn copy_from_same_size() {
        let mut a = FrameBuffer::new(3, 2);
        let mut b = FrameBuffer::new(3, 2);
        b.set(1, 1, '@');
        assert!(a.copy_from(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn copy_from_size_mismatch() {
        let mut a = FrameBuffer::new(3, 2);
        let b = FrameBuffer::new(2, 2);
        assert!(!a.copy_from(&b));
        assert_eq!(a.width(), 3);
    }

    #[test]
    fn debug_shows_dimensions() {
        assert_eq!(format!("{:?}", FrameBuffer::new(80, 24)), "FrameBuffer(80x24)");
    }

    // ── Width ───────────────────────────────────────────────────────────

    #[test]
    fn char_widths() {
        assert_eq!(char_width('@'), 1);
        assert_eq!(char_width(' '), 1);
        assert_eq!(char_width('█'), 1);
        assert_eq!(char_width('中'), 2);
        assert_eq!(char_width('\t'), 0);
    }
}
