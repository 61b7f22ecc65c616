//! # clocktower-engine
//!
//! Night coordination engine for Blood on the Clocktower style games.
//!
//! ## Design Principles
//!
//! 1. **One Game, One Lock**: a game instance owns all of its state. The
//!    submission that completes a night resolves it in the same call, so
//!    callers behind [`SharedGame`] never see a half-resolved night.
//!
//! 2. **Closed Role Dispatch**: every character maps onto one
//!    `NightAbility` variant; eligibility, prompts, ordering and resolution
//!    all match on it.
//!
//! 3. **Reproducible**: every random draw (role deal, reveal pairing,
//!    minion promotion) comes from one seeded `GameRng`.
//!
//! ## Night Model
//!
//! - Night 0 runs the knowledge roles automatically and moves to Day 1.
//! - Later nights wait on a barrier (`ActionCollector`) for every choosing
//!   role, then resolve in tiers: poison, protect, kill, information.
//! - Poison and protection apply on resolution; kills and the star pass are
//!   applied together at the end of the pass.
//!
//! ## Modules
//!
//! - `core`: Player identities, seats, state, actions, RNG, config, errors
//! - `roles`: Role catalog, categories and setup quotas
//! - `collect`: The per-night submission barrier
//! - `rules`: Night abilities and the win condition
//! - `effects`: Role resolution and night effects
//! - `night`: Night coordination and reports
//! - `game`: Setup, phase machine, events and the shared handle

pub mod core;
pub mod roles;
pub mod collect;
pub mod rules;
pub mod effects;
pub mod night;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    choices, ChefRule, ErrorKind, GameConfig, GameError, GameResult, GameRng, GameRngState, GameState,
    NightChoices, Phase, Player, PlayerId,
};

pub use crate::roles::{Alignment, Category, CategoryQuota, RoleCatalog, RoleDefinition, RoleId};

pub use crate::collect::{ActionCollector, CollectError, CollectionStatus, SubmitReceipt};

pub use crate::rules::{ActionPrompt, NightAbility, ResolutionTier, WinReason, WinResult};

pub use crate::effects::{NightEffect, Resolution, RoleResolver};

pub use crate::night::{NightCoordinator, NightReport};

pub use crate::game::{
    DeathCause, ForcedRoles, Game, GameBuilder, GameEvent, GameStateView, PlayerView, RoleInfo, SharedGame,
};
