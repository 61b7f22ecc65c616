//! Win condition.
//!
//! Checked after every night resolution and every elimination:
//! 1. No living Demon: good wins.
//! 2. Living evil at least matches living good: evil wins, even with the
//!    Demon still alive.
//! 3. Otherwise the game continues.

use serde::{Deserialize, Serialize};

use crate::core::GameState;
use crate::roles::{Alignment, Category};

/// Why a team won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    DemonsEliminated,
    EvilOutnumbersGood,
}

impl std::fmt::Display for WinReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinReason::DemonsEliminated => f.write_str("all demons eliminated"),
            WinReason::EvilOutnumbersGood => f.write_str("evil equals or outnumbers good"),
        }
    }
}

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    pub winner: Alignment,
    pub reason: WinReason,
}

impl WinResult {
    /// Check if a team won.
    #[must_use]
    pub fn is_winner(&self, alignment: Alignment) -> bool {
        self.winner == alignment
    }
}

/// Evaluate the win condition. `None` means the game continues.
#[must_use]
pub fn evaluate(state: &GameState) -> Option<WinResult> {
    if state.living_in(Category::Demon).is_empty() {
        return Some(WinResult {
            winner: Alignment::Good,
            reason: WinReason::DemonsEliminated,
        });
    }

    if state.living_count(Alignment::Evil) >= state.living_count(Alignment::Good) {
        return Some(WinResult {
            winner: Alignment::Evil,
            reason: WinReason::EvilOutnumbersGood,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Player, PlayerId};
    use crate::roles::RoleId;

    fn state_with(roles: &[RoleId]) -> GameState {
        let mut state = GameState::new(0);
        for (i, role) in roles.iter().enumerate() {
            let mut player = Player::new(PlayerId::new(format!("p{}", i)));
            player.role = Some(*role);
            state.players.push(player);
        }
        state
    }

    #[test]
    fn test_game_continues() {
        let state = state_with(&[RoleId::Imp, RoleId::Poisoner, RoleId::Chef, RoleId::Monk, RoleId::Empath]);
        assert_eq!(evaluate(&state), None);
    }

    #[test]
    fn test_good_wins_without_demon() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Poisoner, RoleId::Chef, RoleId::Monk, RoleId::Empath]);
        state.players[0].alive = false;

        let result = evaluate(&state).unwrap();
        assert!(result.is_winner(Alignment::Good));
        assert_eq!(result.reason.to_string(), "all demons eliminated");
    }

    #[test]
    fn test_evil_wins_at_parity_with_demon_alive() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Poisoner, RoleId::Chef, RoleId::Monk, RoleId::Empath]);
        state.players[4].alive = false;

        let result = evaluate(&state).unwrap();
        assert_eq!(result.winner, Alignment::Evil);
        assert_eq!(result.reason.to_string(), "evil equals or outnumbers good");
    }

    #[test]
    fn test_demon_check_comes_first() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Poisoner, RoleId::Chef, RoleId::Monk, RoleId::Empath]);
        state.players[0].alive = false;
        state.players[2].alive = false;
        state.players[3].alive = false;

        assert_eq!(evaluate(&state).unwrap().reason, WinReason::DemonsEliminated);
    }
}
