//! Game orchestration: setup, the phase machine and the public surface.
//!
//! - `Game`: one game instance, driven through phase transitions
//! - `GameBuilder`: house rules and seed
//! - `SharedGame`: the same game behind a mutex for concurrent callers
//! - `GameEvent`: log of everything an adapter should relay

mod events;
mod orchestrator;
mod setup;
mod shared;
mod view;

pub use events::{DeathCause, EventLog, GameEvent};
pub use orchestrator::{Game, GameBuilder};
pub use setup::ForcedRoles;
pub use shared::SharedGame;
pub use view::{GameStateView, PlayerView, RoleInfo};
