//! Game state: the circle of seats plus phase bookkeeping.
//!
//! ## Circle
//!
//! `players` is the seating order. Order is load-bearing: the Empath and
//! the Chef read left/right neighbours with wraparound, so seats are never
//! removed or reordered once the game starts.
//!
//! ## Night bookkeeping
//!
//! - `protected_tonight`: the Monk's single slot, cleared when a night begins
//! - poison lives on each `Player` and is cleared at the start of each
//!   night's resolution pass, before new poison is applied
//! - `executed_today`: remembered for the Undertaker

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::player::{Player, PlayerId};
use super::rng::GameRng;
use crate::roles::{Alignment, Category, RoleId};

/// Phase of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for `start`.
    Setup,
    /// Night `n` (night 0 is the automatic first night).
    Night(u32),
    /// Day `n` (day 1 follows night 0).
    Day(u32),
    /// A winner has been decided; state is frozen.
    Ended,
}

impl Phase {
    /// Is this a night phase?
    #[must_use]
    pub fn is_night(self) -> bool {
        matches!(self, Phase::Night(_))
    }

    /// Is this a day phase?
    #[must_use]
    pub fn is_day(self) -> bool {
        matches!(self, Phase::Day(_))
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Setup => write!(f, "setup"),
            Phase::Night(n) => write!(f, "night {}", n),
            Phase::Day(n) => write!(f, "day {}", n),
            Phase::Ended => write!(f, "ended"),
        }
    }
}

/// Complete mutable state of one game instance.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Seats in circle order.
    pub players: Vec<Player>,

    /// Current phase.
    pub phase: Phase,

    /// Days started so far.
    pub day_count: u32,

    /// Current (or last) night number.
    pub night_count: u32,

    /// Monk's protection for the current night.
    pub protected_tonight: Option<PlayerId>,

    /// Player executed during the most recent day.
    pub executed_today: Option<PlayerId>,

    /// Resolved actions, oldest first.
    pub history: Vector<ActionRecord>,

    /// The game's single randomness source.
    pub rng: GameRng,
}

impl GameState {
    /// Create an empty state in `Setup`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            players: Vec::new(),
            phase: Phase::Setup,
            day_count: 0,
            night_count: 0,
            protected_tonight: None,
            executed_today: None,
            history: Vector::new(),
            rng: GameRng::new(seed),
        }
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // === Lookup ===

    /// Seat index of a participant.
    #[must_use]
    pub fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    /// Get a player by identity.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Get a mutable player by identity.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Role held by a participant.
    #[must_use]
    pub fn role_of(&self, id: &PlayerId) -> Option<RoleId> {
        self.player(id).and_then(|p| p.role)
    }

    /// Iterate over living players in seat order.
    pub fn living(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    /// Living players of a category, in seat order.
    #[must_use]
    pub fn living_in(&self, category: Category) -> Vec<PlayerId> {
        self.living()
            .filter(|p| p.is(category))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Count living players of an alignment.
    #[must_use]
    pub fn living_count(&self, alignment: Alignment) -> usize {
        self.living()
            .filter(|p| p.alignment() == Some(alignment))
            .count()
    }

    // === Circle ===

    /// Nearest living neighbours to the left and right, skipping dead seats.
    ///
    /// Returns `None` on a side when no other living player exists. With a
    /// single other survivor both sides are the same player.
    #[must_use]
    pub fn living_neighbours(&self, id: &PlayerId) -> (Option<&Player>, Option<&Player>) {
        let Some(seat) = self.seat_of(id) else {
            return (None, None);
        };
        let n = self.players.len();

        let left = (1..n)
            .map(|step| &self.players[(seat + n - step) % n])
            .find(|p| p.alive);
        let right = (1..n)
            .map(|step| &self.players[(seat + step) % n])
            .find(|p| p.alive);

        (left, right)
    }

    /// Seat-adjacent pairs around the circle, wrapping from last to first.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (&Player, &Player)> {
        let n = self.players.len();
        (0..n).map(move |i| (&self.players[i], &self.players[(i + 1) % n]))
    }

    // === Night bookkeeping ===

    /// Clear every seat's poison.
    pub fn clear_poison(&mut self) {
        for player in &mut self.players {
            player.poisoned = false;
        }
    }

    /// Reset per-night markers when a night begins.
    pub fn begin_night(&mut self) {
        self.protected_tonight = None;
        for player in &mut self.players {
            player.died_tonight = false;
        }
    }

    /// Record a resolved action in history.
    pub fn record_action(&mut self, record: ActionRecord) {
        self.history.push_back(record);
    }

    /// Next sequence number for the given night.
    #[must_use]
    pub fn next_sequence(&self, night: u32) -> u32 {
        self.history.iter().filter(|r| r.night == night).count() as u32
    }
}
