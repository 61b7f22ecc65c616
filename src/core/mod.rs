//! Core engine types: identities, seats, state, actions, RNG, config, errors.
//!
//! Everything here is role-agnostic plumbing; the rules of individual
//! characters live in `rules` and `effects`.

pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod error;

pub use player::{Player, PlayerId};
pub use rng::{GameRng, GameRngState};
pub use config::{ChefRule, GameConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use action::{choices, ActionRecord, NightChoices, Submission};
pub use state::{GameState, Phase};
pub use error::{ErrorKind, GameError, GameResult};
