//! Read-only snapshots handed to callers.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Phase, Player, PlayerId};
use crate::roles::{Alignment, Category};
use crate::rules::WinResult;

/// One seat as seen from outside the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub alive: bool,
    pub poisoned: bool,
    /// Display name of the role, once dealt.
    pub role: Option<String>,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            alive: player.alive,
            poisoned: player.poisoned,
            role: player.role.map(|r| r.name().to_string()),
        }
    }
}

/// Snapshot of the whole game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateView {
    pub phase: Phase,
    pub day_count: u32,
    pub night_count: u32,
    pub players: Vec<PlayerView>,
    pub winner: Option<WinResult>,
}

impl GameStateView {
    pub(crate) fn capture(state: &GameState, winner: Option<WinResult>) -> Self {
        Self {
            phase: state.phase,
            day_count: state.day_count,
            night_count: state.night_count,
            players: state.players.iter().map(PlayerView::from).collect(),
            winner,
        }
    }

    /// Look up one seat.
    #[must_use]
    pub fn player(&self, id: &str) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id.as_str() == id)
    }
}

/// What a participant may know about their own character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub participant: PlayerId,
    pub role: String,
    pub category: Category,
    pub alignment: Alignment,
    pub ability: String,
    pub alive: bool,
    pub poisoned: bool,
}
