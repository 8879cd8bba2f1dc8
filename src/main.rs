// SPDX-License-Identifier: MIT
//
// ledge — an endless runner in the terminal.
//
// This binary wires the crates together:
//
//   ledge-core → terrain generation, scroll buffer, session, fixed-rate loop
//   ledge-term → terminal mode, char-grid frames, diff output, signal flags
//
// Startup order matters: the configuration is validated and the session is
// built (buffer allocated, terrain warmed up) before the terminal is touched,
// so a bad flag prints a plain error to a normal shell. Ctrl-C sets the
// interrupt flag; the loop finishes its frame, restores the terminal, and
// the process exits cleanly.
//
// Logs go to `--log-file` when given and are discarded otherwise, since the
// game owns the screen.

mod screen;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ledge_core::{GameConfig, GameLoop, Session, Symbols, TerrainRules};
use ledge_term::buffer::char_width;
use ledge_term::signal;
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::screen::TerminalScreen;

// ─── CLI ────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ledge")]
#[command(about = "Endless runner over procedurally generated terrain")]
#[command(version)]
struct Args {
    /// Rows in the playfield.
    #[arg(long, env = "LEDGE_HEIGHT", default_value_t = 10)]
    height: u16,

    /// Tiles kept in the scroll buffer.
    #[arg(long, env = "LEDGE_BUFFER_LENGTH", default_value_t = 1000)]
    buffer_length: usize,

    /// Shortest run of equal tiles before the terrain may change.
    #[arg(long, env = "LEDGE_MIN_FLOOR_LENGTH", default_value_t = 6)]
    min_floor_length: usize,

    /// Longest allowed gap, in tiles.
    #[arg(long, env = "LEDGE_MAX_GAP_LENGTH", default_value_t = 6)]
    max_gap_length: usize,

    /// Largest step between neighbouring floors.
    #[arg(long, env = "LEDGE_MAX_HEIGHT_DIFF", default_value_t = 2)]
    max_height_diff: u16,

    /// Frames per second.
    #[arg(long, env = "LEDGE_FPS", default_value_t = 60)]
    fps: u32,

    /// Seconds for the terrain to move one tile.
    #[arg(long, env = "LEDGE_SCROLL_SPEED", default_value_t = 0.125)]
    scroll_speed: f64,

    /// Screen column of the player.
    #[arg(long, env = "LEDGE_PLAYER_COLUMN", default_value_t = 10)]
    player_column: u16,

    /// Floor height of the starting runway.
    #[arg(long, env = "LEDGE_START_HEIGHT", default_value_t = 0)]
    start_height: u16,

    /// Tiles generated before the first frame [default: buffer length - 100].
    #[arg(long, env = "LEDGE_WARMUP")]
    warmup: Option<usize>,

    #[arg(long, env = "LEDGE_PLAYER_SYMBOL", default_value_t = '@')]
    player_symbol: char,

    #[arg(long, env = "LEDGE_FLOOR_SYMBOL", default_value_t = '=')]
    floor_symbol: char,

    #[arg(long, env = "LEDGE_AIR_SYMBOL", default_value_t = ' ')]
    air_symbol: char,

    /// Seed for the terrain generator; random when omitted.
    #[arg(long, env = "LEDGE_SEED")]
    seed: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long, env = "LEDGE_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let symbols = Symbols {
            player: self.player_symbol,
            floor: self.floor_symbol,
            air: self.air_symbol,
        };
        for (name, ch) in [
            ("player", symbols.player),
            ("floor", symbols.floor),
            ("air", symbols.air),
        ] {
            if char_width(ch) != 1 {
                bail!("{name} symbol {ch:?} must be exactly one column wide");
            }
        }

        let config = GameConfig {
            terrain: TerrainRules {
                height: self.height,
                min_floor_length: self.min_floor_length,
                max_gap_length: self.max_gap_length,
                max_height_diff: self.max_height_diff,
            },
            buffer_length: self.buffer_length,
            frames_per_second: self.fps,
            scroll_speed: self.scroll_speed,
            player_column: self.player_column,
            start_height: self.start_height,
            warmup: self
                .warmup
                .unwrap_or_else(|| GameConfig::default_warmup(self.buffer_length)),
            symbols,
        };
        config.validate().context("invalid game configuration")?;
        Ok(config)
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ledge=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::sink).init(),
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, "ledge starting");

    let mut session = Session::new(config, seed).context("failed to start game session")?;
    let mut screen = TerminalScreen::new().context("failed to open terminal")?;
    let mut game_loop = GameLoop::from_config(session.config());

    signal::install_handlers();
    let stats = game_loop
        .run(&mut session, &mut screen, signal::interrupt_flag())
        .context("game loop failed")?;

    info!(
        seed,
        frames = stats.frames,
        overruns = stats.overruns,
        tiles = stats.tiles_scrolled,
        "ledge stopped"
    );
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────
