//! Game configuration — the tunable knobs of generation and rendering.
//!
//! Every tunable value lives in one [`GameConfig`], fixed for the lifetime
//! of a session: the binary builds a config from its command line, calls
//! [`validate`](GameConfig::validate) once, and hands it to
//! [`Session`](crate::Session).
//!
//! | Knob                         | Default | Effect                                   |
//! |------------------------------|---------|------------------------------------------|
//! | `terrain.height`             | 10      | Rows in the play field                   |
//! | `terrain.min_floor_length`   | 6       | Shortest run before terrain may change   |
//! | `terrain.max_gap_length`     | 6       | Longest run of gap tiles                 |
//! | `terrain.max_height_diff`    | 2       | Largest step between adjacent floor runs |
//! | `buffer_length`              | 1000    | Tiles of history kept by the buffer      |
//! | `frames_per_second`          | 60      | Loop rate                                |
//! | `scroll_speed`               | 0.125   | Seconds per tile                         |
//! | `player_column`              | 10      | Screen column of the player marker       |
//! | `start_height`               | 0       | Floor height of the pre-filled buffer    |
//! | `warmup`                     | 900     | Advances run before the first frame      |
//! | `symbols`                    | `@ = ␠` | Player, floor, and air glyphs            |
//!
//! [`Session`]: crate::session::Session

use thiserror::Error;

/// Rows between the top of the play field and the highest allowed floor.
///
/// The player stands one row above the floor, and one more row of headroom
/// keeps the marker off the top edge.
pub const FLOOR_HEADROOM: u16 = 3;

// ─── TerrainRules ───────────────────────────────────────────────────────────

/// Constraints the terrain generator enforces on every sample it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainRules {
    /// Number of rows in the play field (`GAME_HEIGHT`).
    pub height: u16,
    /// Minimum contiguous run of identical tiles before a change is allowed.
    pub min_floor_length: usize,
    /// Maximum contiguous run of gap tiles.
    pub max_gap_length: usize,
    /// Maximum height difference between directly adjacent floor runs.
    pub max_height_diff: u16,
}

impl TerrainRules {
    /// The highest floor the generator will ever produce.
    #[inline]
    #[must_use]
    pub const fn max_floor_height(&self) -> u16 {
        self.height.saturating_sub(FLOOR_HEADROOM)
    }
}

impl Default for TerrainRules {
    fn default() -> Self {
        Self {
            height: 10,
            min_floor_length: 6,
            max_gap_length: 6,
            max_height_diff: 2,
        }
    }
}

// ─── Symbols ────────────────────────────────────────────────────────────────

/// The three glyphs a rendered cell can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    pub player: char,
    pub floor: char,
    pub air: char,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            player: '@',
            floor: '=',
            air: ' ',
        }
    }
}

// ─── GameConfig ─────────────────────────────────────────────────────────────

/// Complete configuration for one game session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Generator constraints.
    pub terrain: TerrainRules,
    /// Number of tiles held by the scroll buffer (`GAME_BUFFER_LENGTH`).
    pub buffer_length: usize,
    /// Fixed loop rate.
    pub frames_per_second: u32,
    /// Seconds the terrain takes to move by one tile.
    pub scroll_speed: f64,
    /// Screen column where the player marker is drawn.
    pub player_column: u16,
    /// Floor height every tile holds before warm-up.
    pub start_height: u16,
    /// Advances performed at session start so the run-length and gap rules
    /// have real history to read before the first frame.
    pub warmup: usize,
    /// Display glyphs.
    pub symbols: Symbols,
}

/// Tiles at the newest end of the buffer left untouched by the default
/// warm-up.
const WARMUP_MARGIN: usize = 100;

impl GameConfig {
    /// The warm-up used when none is given: everything but the oldest
    /// hundred tiles is generated before the first frame.
    #[inline]
    #[must_use]
    pub const fn default_warmup(buffer_length: usize) -> usize {
        buffer_length.saturating_sub(WARMUP_MARGIN)
    }

    /// Number of frames between two buffer advances:
    /// `round(scroll_speed × frames_per_second)`, never less than one.
    #[must_use]
    pub fn scroll_period(&self) -> u32 {
        let ticks = (self.scroll_speed * f64::from(self.frames_per_second)).round();
        if ticks < 1.0 {
            return 1;
        }
        // Bounded above by u32::MAX before the cast.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ticks = ticks.min(f64::from(u32::MAX)) as u32;
        ticks
    }

    /// Check every knob against the constraints the generator and the loop
    /// depend on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.terrain;

        if rules.height < FLOOR_HEADROOM {
            return Err(ConfigError::HeightTooSmall {
                height: rules.height,
                min: FLOOR_HEADROOM,
            });
        }
        if rules.min_floor_length == 0 {
            return Err(ConfigError::ZeroMinFloorLength);
        }
        if rules.max_gap_length == 0 {
            return Err(ConfigError::ZeroMaxGapLength);
        }
        if rules.min_floor_length > rules.max_gap_length {
            return Err(ConfigError::RunLongerThanGap {
                min_floor_length: rules.min_floor_length,
                max_gap_length: rules.max_gap_length,
            });
        }
        if rules.max_height_diff == 0 {
            return Err(ConfigError::ZeroHeightDiff);
        }

        let required = rules.min_floor_length.max(rules.max_gap_length);
        if self.buffer_length < required {
            return Err(ConfigError::BufferTooShort {
                buffer_length: self.buffer_length,
                required,
            });
        }
        if self.frames_per_second == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if !self.scroll_speed.is_finite() || self.scroll_speed <= 0.0 {
            return Err(ConfigError::InvalidScrollSpeed(self.scroll_speed));
        }
        if self.start_height > rules.max_floor_height() {
            return Err(ConfigError::StartHeightOutOfRange {
                start_height: self.start_height,
                max: rules.max_floor_height(),
            });
        }
        if usize::from(self.player_column) >= self.buffer_length {
            return Err(ConfigError::PlayerColumnOutOfRange {
                column: self.player_column,
                buffer_length: self.buffer_length,
            });
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let buffer_length = 1000;
        Self {
            terrain: TerrainRules::default(),
            buffer_length,
            frames_per_second: 60,
            scroll_speed: 1.0 / 8.0,
            player_column: 10,
            start_height: 0,
            warmup: Self::default_warmup(buffer_length),
            symbols: Symbols::default(),
        }
    }
}

// ─── ConfigError ────────────────────────────────────────────────────────────

/// A configuration value the game cannot run with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("game height {height} is below the minimum of {min} rows")]
    HeightTooSmall { height: u16, min: u16 },

    #[error("minimum floor length must be at least 1")]
    ZeroMinFloorLength,

    #[error("maximum gap length must be at least 1")]
    ZeroMaxGapLength,

    #[error(
        "minimum run length {min_floor_length} exceeds maximum gap length {max_gap_length}; \
         gap runs could not satisfy both"
    )]
    RunLongerThanGap {
        min_floor_length: usize,
        max_gap_length: usize,
    },

    #[error("maximum height difference must be at least 1")]
    ZeroHeightDiff,

    #[error("buffer length {buffer_length} is shorter than the {required} tiles the generator reads")]
    BufferTooShort { buffer_length: usize, required: usize },

    #[error("frames per second must be at least 1")]
    ZeroFrameRate,

    #[error("scroll speed must be a positive number of seconds per tile, got {0}")]
    InvalidScrollSpeed(f64),

    #[error("start height {start_height} is above the highest floor ({max})")]
    StartHeightOutOfRange { start_height: u16, max: u16 },

    #[error("player column {column} is outside a buffer of {buffer_length} tiles")]
    PlayerColumnOutOfRange { column: u16, buffer_length: usize },
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_matches_classic_constants() {
        let config = GameConfig::default();
        assert_eq!(config.terrain.height, 10);
        assert_eq!(config.buffer_length, 1000);
        assert_eq!(config.terrain.min_floor_length, 6);
        assert_eq!(config.terrain.max_gap_length, 6);
        assert_eq!(config.terrain.max_height_diff, 2);
        assert_eq!(config.frames_per_second, 60);
        assert_eq!(config.player_column, 10);
        assert_eq!(config.warmup, 900);
        assert_eq!(config.symbols, Symbols { player: '@', floor: '=', air: ' ' });
    }

    #[test]
    fn max_floor_height_leaves_headroom() {
        assert_eq!(TerrainRules::default().max_floor_height(), 7);
    }

    #[test]
    fn default_warmup_saturates() {
        assert_eq!(GameConfig::default_warmup(1000), 900);
        assert_eq!(GameConfig::default_warmup(40), 0);
    }

    // ── Scroll period ───────────────────────────────────────────────

    #[test]
    fn scroll_period_default_is_eight_tiles_per_second() {
        assert_eq!(GameConfig::default().scroll_period(), 8);
    }

    #[test]
    fn scroll_period_half_second_at_60fps() {
        let config = GameConfig {
            scroll_speed: 0.5,
            ..GameConfig::default()
        };
        assert_eq!(config.scroll_period(), 30);
    }

    #[test]
    fn scroll_period_rounds_to_nearest() {
        let config = GameConfig {
            scroll_speed: 0.1,
            frames_per_second: 25,
            ..GameConfig::default()
        };
        // 2.5 rounds away from zero.
        assert_eq!(config.scroll_period(), 3);
    }

    #[test]
    fn scroll_period_never_zero() {
        let config = GameConfig {
            scroll_speed: 0.001,
            ..GameConfig::default()
        };
        assert_eq!(config.scroll_period(), 1);
    }

    // ── Validation ──────────────────────────────────────────────────

    fn with_rules(f: impl FnOnce(&mut TerrainRules)) -> GameConfig {
        let mut config = GameConfig::default();
        f(&mut config.terrain);
        config
    }

    #[test]
    fn rejects_tiny_height() {
        let config = with_rules(|r| r.height = 2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::HeightTooSmall { height: 2, min: 3 })
        );
    }

    #[test]
    fn rejects_zero_lengths() {
        assert_eq!(
            with_rules(|r| r.min_floor_length = 0).validate(),
            Err(ConfigError::ZeroMinFloorLength)
        );
        assert_eq!(
            with_rules(|r| r.max_gap_length = 0).validate(),
            Err(ConfigError::ZeroMaxGapLength)
        );
    }

    #[test]
    fn rejects_run_longer_than_gap() {
        let config = with_rules(|r| {
            r.min_floor_length = 5;
            r.max_gap_length = 4;
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::RunLongerThanGap {
                min_floor_length: 5,
                max_gap_length: 4
            })
        );
    }

    #[test]
    fn rejects_zero_height_diff() {
        assert_eq!(
            with_rules(|r| r.max_height_diff = 0).validate(),
            Err(ConfigError::ZeroHeightDiff)
        );
    }

    #[test]
    fn rejects_short_buffer() {
        let config = GameConfig {
            buffer_length: 5,
            player_column: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BufferTooShort {
                buffer_length: 5,
                required: 6
            })
        );
    }

    #[test]
    fn rejects_zero_frame_rate() {
        let config = GameConfig {
            frames_per_second: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameRate));
    }

    #[test]
    fn rejects_bad_scroll_speeds() {
        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = GameConfig {
                scroll_speed: speed,
                ..GameConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidScrollSpeed(_))
            ));
        }
    }

    #[test]
    fn rejects_start_height_above_ceiling() {
        let config = GameConfig {
            start_height: 8,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::StartHeightOutOfRange {
                start_height: 8,
                max: 7
            })
        );
    }

    #[test]
    fn rejects_player_column_past_buffer() {
        let config = GameConfig {
            buffer_length: 20,
            player_column: 20,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::PlayerColumnOutOfRange {
                column: 20,
                buffer_length: 20
            })
        );
    }

    #[test]
    fn error_messages_name_the_values() {
        let err = ConfigError::BufferTooShort {
            buffer_length: 3,
            required: 6,
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('6'));
    }
}
