//! Game configuration.
//!
//! A table picks its house rules once, before `start`:
//! - `seed`: fixes every random draw of the game
//! - `chef_rule`: how the Chef counts evil pairs
//! - `soldier_immunity`: whether the Soldier survives the Demon
//! - `auto_advance_to_day`: whether the last required submission also
//!   enters the day
//!
//! Use [`crate::game::GameBuilder`] to construct a game from a config.

use serde::{Deserialize, Serialize};

/// Smallest supported roster.
pub const MIN_PLAYERS: usize = 5;

/// Largest supported roster.
pub const MAX_PLAYERS: usize = 15;

/// How the Chef counts pairs of evil players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChefRule {
    /// Pairs of evil players sitting next to each other (circular).
    #[default]
    AdjacentPairs,
    /// Every unordered pair of evil players, regardless of seating.
    AllEvilPairs,
}

/// Per-game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for the game's RNG.
    pub seed: u64,

    /// Chef counting variant.
    pub chef_rule: ChefRule,

    /// Soldier ignores Demon kills while unpoisoned.
    pub soldier_immunity: bool,

    /// Resolve the night and enter the day as soon as the last expected
    /// submission arrives. When `false` the night still resolves on
    /// completion, but the day only begins on an explicit `advance_to_day`.
    pub auto_advance_to_day: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chef_rule: ChefRule::default(),
            soldier_immunity: true,
            auto_advance_to_day: true,
        }
    }
}

impl GameConfig {
    /// Default rules with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}
