//! Error types for session setup and the game loop.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Everything that can stop a game before or during the loop.
///
/// An interrupt is not an error: it is the normal way a game ends and the
/// loop returns `Ok` for it.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot allocate a scroll buffer of {len} tiles")]
    BufferAllocation {
        len: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("renderer failed: {0}")]
    Render(#[from] io::Error),
}
