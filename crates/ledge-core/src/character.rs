//! Player character state.
//!
//! The vertical-motion fields mirror the classic runner's character record.
//! Nothing in the game drives them yet: the character is placed on the floor
//! under the player column when a session starts and stays at that height.
//! [`Motion`] names the states a future jump would move through
//! (`Grounded → Ascending → Descending → Grounded`), kept apart from terrain
//! generation.

use crate::terrain::Tile;

/// Phase of the character's vertical movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    /// Standing on a floor.
    #[default]
    Grounded,
    /// Rising after a jump started.
    Ascending,
    /// Falling back toward a floor.
    Descending,
}

/// Vertical position and animation state of the player sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacterState {
    /// Frame on which the current jump began.
    pub jump_start: u64,
    /// Current motion phase.
    pub vertical_direction: Motion,
    /// Floor row the character stands on. The marker is drawn one row above.
    pub height: u16,
    /// Frames until the height next changes while airborne.
    pub ticks_to_next_height: u32,
}

impl CharacterState {
    /// A grounded character standing on `tile`. A gap puts it on the bottom
    /// row.
    #[must_use]
    pub const fn standing_on(tile: Tile) -> Self {
        let height = match tile {
            Tile::Floor(h) => h,
            Tile::Gap => 0,
        };
        Self {
            jump_start: 0,
            vertical_direction: Motion::Grounded,
            height,
            ticks_to_next_height: 0,
        }
    }

    /// Row of the player marker: one above the floor it stands on.
    #[inline]
    #[must_use]
    pub const fn marker_row(&self) -> u16 {
        self.height.saturating_add(1)
    }

    #[inline]
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        matches!(self.vertical_direction, Motion::Grounded)
    }
}
