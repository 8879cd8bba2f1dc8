// SPDX-License-Identifier: MIT
//
// TerminalScreen — the game loop's Renderer on a real terminal.
//
// Each frame the scene is painted into a char-grid FrameBuffer and handed to
// the differential renderer, which writes only the changed cells in one
// synchronized write. Painting is a pure function of the session so it can
// be tested without a terminal.
//
// Mapping from game space to the screen:
//
//   screen column x  ←  buffer index x (oldest tile at the left edge)
//   screen row y     ←  game row (rows - 1 - y), so game row 0 is the bottom
//
// New tiles enter at the newest end of the buffer, so the terrain scrolls
// left past the player's fixed column.

use std::io;
use std::time::{Duration, Instant};

use ledge_core::character::CharacterState;
use ledge_core::scroll::ScrollBuffer;
use ledge_core::{GameConfig, Renderer, Session, Tile};
use ledge_term::buffer::FrameBuffer;
use ledge_term::diff::DiffRenderer;
use ledge_term::signal;
use ledge_term::terminal::{Size, Terminal};
use tracing::debug;

// ─── Layout ─────────────────────────────────────────────────────────────────

/// Frame dimensions for a terminal of `size`: as wide as the buffer allows
/// and as tall as the game, each clamped to what the terminal can show.
#[must_use]
pub fn frame_size(size: Size, config: &GameConfig) -> (u16, u16) {
    let buffer_cols = u16::try_from(config.buffer_length).unwrap_or(u16::MAX);
    (
        size.cols.min(buffer_cols),
        size.rows.min(config.terrain.height),
    )
}

/// Paint terrain and the player into `frame`.
///
/// When the frame is shorter than the game, the bottom rows are kept.
pub fn paint_scene(
    frame: &mut FrameBuffer,
    buffer: &ScrollBuffer,
    character: &CharacterState,
    config: &GameConfig,
) {
    let symbols = config.symbols;
    let rows = frame.height();
    let marker_row = character.marker_row();

    for (x, tile) in (0..frame.width()).zip(buffer.iter()) {
        for y in 0..rows {
            let game_row = rows - 1 - y;
            let ch = if x == config.player_column && game_row == marker_row {
                symbols.player
            } else if tile == Tile::Floor(game_row) {
                symbols.floor
            } else {
                symbols.air
            };
            frame.set(x, y, ch);
        }
    }
}

// ─── TerminalScreen ─────────────────────────────────────────────────────────

pub struct TerminalScreen {
    terminal: Terminal,
    diff: DiffRenderer,
    frame: FrameBuffer,
}

impl TerminalScreen {
    /// # Errors
    ///
    /// Returns an error if the terminal handle cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            diff: DiffRenderer::new(),
            frame: FrameBuffer::new(0, 0),
        })
    }

    fn fit_frame(&mut self, config: &GameConfig) {
        let (width, height) = frame_size(self.terminal.size(), config);
        if self.frame.width() != width || self.frame.height() != height {
            debug!(width, height, "resizing frame");
            self.frame.resize(width, height);
        }
    }
}

impl Renderer for TerminalScreen {
    fn init_screen(&mut self) -> io::Result<()> {
        self.terminal.enter()?;
        self.diff.force_redraw();
        Ok(())
    }

    fn render(&mut self, session: &Session) -> io::Result<Duration> {
        let start = Instant::now();

        if signal::take_resize() {
            let size = self.terminal.refresh_size();
            debug!(cols = size.cols, rows = size.rows, "terminal resized");
            self.diff.force_redraw();
        }
        self.fit_frame(session.config());

        paint_scene(
            &mut self.frame,
            session.buffer(),
            session.character(),
            session.config(),
        );
        self.diff.render(&self.frame);
        self.diff.flush()?;

        Ok(start.elapsed())
    }

    fn end_screen(&mut self) -> io::Result<()> {
        self.terminal.leave()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ledge_core::TerrainRules;
    use pretty_assertions::assert_eq;

    fn small_config() -> GameConfig {
        GameConfig {
            terrain: TerrainRules {
                height: 5,
                min_floor_length: 2,
                max_gap_length: 3,
                max_height_diff: 1,
            },
            buffer_length: 8,
            player_column: 2,
            start_height: 1,
            warmup: 0,
            ..GameConfig::default()
        }
    }

    fn paint(
        tiles: Vec<Tile>,
        character: CharacterState,
        config: &GameConfig,
        size: Size,
    ) -> Vec<String> {
        let buffer = ScrollBuffer::from_tiles(tiles, config.terrain);
        let (w, h) = frame_size(size, config);
        let mut frame = FrameBuffer::new(w, h);
        paint_scene(&mut frame, &buffer, &character, config);
        frame.lines()
    }

    const ROOMY: Size = Size { cols: 80, rows: 24 };

    // ── Layout ──────────────────────────────────────────────────────────

    #[test]
    fn frame_fits_game_inside_terminal() {
        let config = GameConfig::default();
        assert_eq!(frame_size(ROOMY, &config), (80, 10));
        assert_eq!(frame_size(Size { cols: 2000, rows: 6 }, &config), (1000, 6));
    }

    // ── Painting ────────────────────────────────────────────────────────

    #[test]
    fn flat_floor_with_player_above_it() {
        let config = small_config();
        let lines = paint(
            vec![Tile::Floor(1); 8],
            CharacterState::standing_on(Tile::Floor(1)),
            &config,
            ROOMY,
        );
        assert_eq!(
            lines,
            vec![
                "        ",
                "        ",
                "  @     ",
                "========",
                "        ",
            ]
        );
    }

    #[test]
    fn gaps_and_steps_are_drawn_on_their_rows() {
        let config = small_config();
        let tiles = vec![
            Tile::Floor(0),
            Tile::Floor(0),
            Tile::Floor(0),
            Tile::Gap,
            Tile::Gap,
            Tile::Floor(2),
            Tile::Floor(2),
            Tile::Floor(1),
        ];
        let lines = paint(
            tiles,
            CharacterState::standing_on(Tile::Floor(0)),
            &config,
            ROOMY,
        );
        assert_eq!(
            lines,
            vec![
                "        ",
                "        ",
                "     == ",
                "  @    =",
                "===     ",
            ]
        );
    }

    #[test]
    fn custom_symbols() {
        let mut config = small_config();
        config.symbols.player = 'P';
        config.symbols.floor = '#';
        config.symbols.air = '.';
        let lines = paint(
            vec![Tile::Floor(0); 8],
            CharacterState::standing_on(Tile::Floor(0)),
            &config,
            ROOMY,
        );
        assert_eq!(lines[3], "..P.....");
        assert_eq!(lines[4], "########");
    }

    #[test]
    fn narrow_terminal_shows_oldest_tiles() {
        let config = small_config();
        let mut tiles = vec![Tile::Floor(0); 4];
        tiles.extend([Tile::Floor(3); 4]);
        let lines = paint(
            tiles,
            CharacterState::standing_on(Tile::Floor(0)),
            &config,
            Size { cols: 4, rows: 24 },
        );
        assert_eq!(lines, vec!["    ", "    ", "    ", "  @ ", "===="]);
    }

    #[test]
    fn short_terminal_keeps_bottom_rows() {
        let config = small_config();
        let lines = paint(
            vec![Tile::Floor(0); 8],
            CharacterState::standing_on(Tile::Floor(0)),
            &config,
            Size { cols: 80, rows: 2 },
        );
        assert_eq!(lines, vec!["  @     ", "========"]);
    }

    #[test]
    fn session_scene_tracks_the_buffer() {
        let config = GameConfig {
            warmup: 6,
            ..small_config()
        };
        let mut session = Session::new(config, 11).unwrap();
        for _ in 0..session.scroll().period() * 3 {
            session.update();
        }

        let (w, h) = frame_size(ROOMY, session.config());
        let mut frame = FrameBuffer::new(w, h);
        paint_scene(
            &mut frame,
            session.buffer(),
            session.character(),
            session.config(),
        );

        for (x, tile) in (0..w).zip(session.buffer().iter()) {
            for y in 0..h {
                let game_row = h - 1 - y;
                let ch = frame.get(x, y).unwrap();
                if x == 2 && game_row == session.character().marker_row() {
                    assert_eq!(ch, '@');
                } else {
                    assert_eq!(ch == '=', tile == Tile::Floor(game_row), "x {x} y {y}");
                }
            }
        }
    }
}
