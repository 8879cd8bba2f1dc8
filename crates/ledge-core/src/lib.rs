//! # ledge-core — Game core for ledge
//!
//! Everything with algorithmic or timing content lives here, free of any
//! terminal code:
//!
//! - **[`config`]** — `GameConfig` and `TerrainRules`, the tunable knobs
//! - **[`terrain`]** — `Tile` and the constrained terrain generator
//! - **[`scroll`]** — `ScrollBuffer` ring and the `ScrollController` clock
//! - **[`character`]** — `CharacterState` placeholder for the player sprite
//! - **[`session`]** — `Session`, the owner of all mutable game state
//! - **[`timing`]** — `FrameBudget` arithmetic
//! - **[`game_loop`]** — the fixed-rate loop and the `Renderer` trait
//! - **[`error`]** — `GameError`

pub mod character;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod scroll;
pub mod session;
pub mod terrain;
pub mod timing;

pub use config::{ConfigError, GameConfig, Symbols, TerrainRules};
pub use error::GameError;
pub use game_loop::{GameLoop, LoopState, LoopStats, Renderer};
pub use session::Session;
pub use terrain::Tile;
