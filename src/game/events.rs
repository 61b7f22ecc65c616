//! Game event log.
//!
//! The engine never talks to players directly. Everything a chat adapter
//! needs to announce or deliver is appended here; the adapter keeps a
//! cursor and drains new events with [`EventLog::since`].

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::rules::WinResult;

/// How a player died outside the night.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Executed by the town during the day.
    Execution,
    /// Removed by the storyteller.
    Storyteller,
}

impl std::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeathCause::Execution => f.write_str("execution"),
            DeathCause::Storyteller => f.write_str("storyteller"),
        }
    }
}

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RolesDealt { players: usize },
    NightBegan { night: u32, expected: Vec<PlayerId> },
    ActionSubmitted { night: u32, participant: PlayerId },
    /// Players woken again after dying in the night.
    FollowUpRequested { night: u32, participants: Vec<PlayerId> },
    NightResolved {
        night: u32,
        deaths: Vec<PlayerId>,
        promoted: Option<PlayerId>,
    },
    DayBegan { day: u32 },
    PlayerEliminated { participant: PlayerId, cause: DeathCause },
    GameEnded { result: WinResult },
}

/// Append-only event history.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vector<GameEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Events at or after `cursor`, plus the cursor for the next call.
    #[must_use]
    pub fn since(&self, cursor: usize) -> (Vec<GameEvent>, usize) {
        let events = self.events.iter().skip(cursor).cloned().collect();
        (events, self.events.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
