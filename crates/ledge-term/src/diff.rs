// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Each frame is painted into a FrameBuffer and compared against the frame
// before it. Only cells that changed produce output. When the terrain
// scrolls one tile, every row with floor on it changes, but rows of open
// air above the terrain stay identical and are skipped whole.
//
// The pipeline per frame:
//
//   1. The game paints the scene into a FrameBuffer (the "current" frame).
//   2. DiffRenderer.render() compares it against the stored previous frame.
//   3. Changed cells go through CellWriter, which skips redundant cursor moves.
//   4. Everything accumulates in OutputBuffer, with no terminal writes yet.
//   5. DiffRenderer.flush() issues a single write() to the terminal.
//
// Synchronized output (DEC 2026) wraps the frame so it never tears. The
// previous-frame buffer is reused via copy_from(); only the first render
// or a resize allocates.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::output::{CellWriter, OutputBuffer};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// Statistics from a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame and were rendered.
    pub cells_rendered: usize,
    /// Cells that matched the previous frame and were skipped.
    pub cells_skipped: usize,
    /// Total bytes of output generated.
    pub bytes_written: usize,
}

impl RenderStats {
    /// Total cells processed (rendered + skipped).
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_rendered + self.cells_skipped
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Renderer that emits output only for changed cells.
///
/// # Usage
///
/// ```no_run
/// use ledge_term::buffer::FrameBuffer;
/// use ledge_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let mut frame = FrameBuffer::new(80, 10);
/// frame.set(0, 9, '=');
///
/// let stats = renderer.render(&frame);
/// renderer.flush().unwrap();
/// ```
pub struct DiffRenderer {
    output: OutputBuffer,
    writer: CellWriter,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// Create a renderer with no previous frame (first render draws everything).
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            writer: CellWriter::new(),
            previous: None,
        }
    }

    /// Diff the current frame against the previous and generate output.
    ///
    /// Follow with [`flush`](Self::flush) or [`flush_to`](Self::flush_to).
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        self.writer.reset_state();

        let width = current.width();
        let height = current.height();
        let mut stats = RenderStats::default();

        if width == 0 || height == 0 {
            self.store_frame(current);
            return stats;
        }

        ansi::begin_sync(&mut self.output).ok();

        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);

        if previous.is_none() {
            ansi::clear_screen(&mut self.output).ok();
            ansi::cursor_to(&mut self.output, 0, 0).ok();
        }

        for y in 0..height {
            let Some(curr_row) = current.row(y) else {
                continue;
            };
            let prev_row = previous.and_then(|prev| prev.row(y));

            if prev_row == Some(curr_row) {
                stats.cells_skipped += curr_row.len();
                continue;
            }

            for (x, &ch) in (0..width).zip(curr_row) {
                let changed = prev_row.is_none_or(|row| row[usize::from(x)] != ch);
                if changed {
                    self.writer.render_cell(&mut self.output, x, y, ch);
                    stats.cells_rendered += 1;
                } else {
                    stats.cells_skipped += 1;
                }
            }
        }

        ansi::reset(&mut self.output).ok();
        ansi::end_sync(&mut self.output).ok();

        stats.bytes_written = self.output.len();
        self.store_frame(current);
        stats
    }

    /// The raw bytes from the last render (for testing and debugging).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Discard the previous frame so the next render draws everything.
    ///
    /// Call after entering the alternate screen or a terminal resize.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn store_frame(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev)
                if prev.width() == current.width() && prev.height() == current.height() =>
            {
                prev.copy_from(current);
            }
            _ => {
                self.previous = Some(current.clone());
            }
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
