//! Game session — the single owner of all mutable game state.
//!
//! A [`Session`] holds the scroll buffer, the scroll clock, the character,
//! and the random source. The loop mutates it during the update phase and
//! the renderer reads it during the render phase; the two never overlap, so
//! plain `&mut`/`&` borrows are all the synchronisation it needs.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::character::CharacterState;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::scroll::{ScrollBuffer, ScrollController};
use crate::terrain::Tile;

pub struct Session {
    config: GameConfig,
    buffer: ScrollBuffer,
    scroll: ScrollController,
    character: CharacterState,
    rng: SmallRng,
    seed: u64,
    tiles_scrolled: u64,
}

impl Session {
    /// Validate `config`, allocate and warm up the buffer, and place the
    /// character on the floor under the player column.
    ///
    /// The same `seed` and config always produce the same terrain.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] for an invalid config and
    /// [`GameError::BufferAllocation`] if the buffer cannot be allocated.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        debug!(?config, "validated game config");

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut buffer =
            ScrollBuffer::new(config.buffer_length, config.start_height, config.terrain)?;
        buffer.seed(config.warmup, &mut rng);

        let under_player = buffer
            .sample(usize::from(config.player_column))
            .unwrap_or(Tile::Floor(config.start_height));
        let scroll = ScrollController::new(config.scroll_period());

        info!(
            seed,
            tiles = buffer.len(),
            warmup = config.warmup,
            period = scroll.period(),
            "session ready"
        );

        Ok(Self {
            character: CharacterState::standing_on(under_player),
            config,
            buffer,
            scroll,
            rng,
            seed,
            tiles_scrolled: 0,
        })
    }

    /// One update phase: count a frame on the scroll clock, advancing the
    /// buffer when it comes due. Returns the new tile if one was generated.
    pub fn update(&mut self) -> Option<Tile> {
        let tile = self.scroll.tick(&mut self.buffer, &mut self.rng);
        if tile.is_some() {
            self.tiles_scrolled += 1;
        }
        tile
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &ScrollBuffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    #[inline]
    #[must_use]
    pub const fn character(&self) -> &CharacterState {
        &self.character
    }

    /// The seed the terrain was generated from.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Buffer advances since the session started (warm-up excluded).
    #[inline]
    #[must_use]
    pub const fn tiles_scrolled(&self) -> u64 {
        self.tiles_scrolled
    }
}
