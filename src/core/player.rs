//! Participant identity and per-seat status.
//!
//! ## PlayerId
//!
//! Stable, unique participant identity as supplied by the roster (the chat
//! adapter passes usernames). Cheap to compare, ordered, hashable.
//!
//! ## Player
//!
//! One seat in the circle. A player is created at game start, receives a
//! role exactly once during setup and is never removed: a dead player keeps
//! their seat for adjacency reads.

use serde::{Deserialize, Serialize};

use crate::roles::{Alignment, Category, RoleId};

/// Participant identifier.
///
/// ```
/// use clocktower_engine::core::PlayerId;
///
/// let alice = PlayerId::new("alice");
/// assert_eq!(alice.as_str(), "alice");
/// assert_eq!(format!("{}", alice), "alice");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the raw identity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PlayerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::borrow::Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A seat in the circle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Participant identity.
    pub id: PlayerId,

    /// Assigned role. `None` only before setup completes.
    pub role: Option<RoleId>,

    /// Alive flag. Mutated only by night resolution or `eliminate`.
    pub alive: bool,

    /// Poisoned from the Poisoner's pick until the next night's pass clears it.
    pub poisoned: bool,

    /// Died during the night currently being resolved.
    pub died_tonight: bool,

    // === Day-cycle transient fields (owned by the day subsystem) ===
    /// Nominated today.
    pub nominated: bool,

    /// Votes received today.
    pub votes: u32,

    /// Dead players get one ghost vote per game.
    pub ghost_vote_used: bool,
}

impl Player {
    /// Create a living, unassigned seat.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            role: None,
            alive: true,
            poisoned: false,
            died_tonight: false,
            nominated: false,
            votes: 0,
            ghost_vote_used: false,
        }
    }

    /// Alignment of the assigned role.
    #[must_use]
    pub fn alignment(&self) -> Option<Alignment> {
        self.role.map(RoleId::alignment)
    }

    /// Category of the assigned role.
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.role.map(RoleId::category)
    }

    /// Alive and evil-aligned.
    #[must_use]
    pub fn is_living_evil(&self) -> bool {
        self.alive && self.alignment() == Some(Alignment::Evil)
    }

    /// Check the assigned role's category.
    #[must_use]
    pub fn is(&self, category: Category) -> bool {
        self.category() == Some(category)
    }

    /// Clear the day-only flags before the next night.
    pub fn reset_day_flags(&mut self) {
        self.nominated = false;
        self.votes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let id = PlayerId::new("bob");
        assert_eq!(id.as_str(), "bob");
        assert_eq!(format!("{}", id), "bob");
        assert_eq!(PlayerId::from("bob"), id);
    }

    #[test]
    fn test_new_player_is_alive_and_unassigned() {
        let player = Player::new(PlayerId::new("a"));
        assert!(player.alive);
        assert!(!player.poisoned);
        assert!(player.role.is_none());
        assert!(player.alignment().is_none());
    }

    #[test]
    fn test_living_evil() {
        let mut player = Player::new(PlayerId::new("a"));
        player.role = Some(RoleId::Imp);
        assert!(player.is_living_evil());
        assert!(player.is(Category::Demon));

        player.alive = false;
        assert!(!player.is_living_evil());
    }

    #[test]
    fn test_reset_day_flags_keeps_ghost_vote() {
        let mut player = Player::new(PlayerId::new("a"));
        player.nominated = true;
        player.votes = 4;
        player.ghost_vote_used = true;

        player.reset_day_flags();

        assert!(!player.nominated);
        assert_eq!(player.votes, 0);
        assert!(player.ghost_vote_used);
    }

    #[test]
    fn test_player_serialization() {
        let mut player = Player::new(PlayerId::new("c"));
        player.role = Some(RoleId::Monk);
        let json = serde_json::to_string(&player).unwrap();
        let deserialized: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, deserialized);
    }
}
