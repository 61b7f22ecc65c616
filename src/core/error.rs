//! Error types for the engine.
//!
//! Every rejected operation leaves the game untouched and the instance
//! queryable. `GameError::kind` groups variants by the caller's remedy.

use super::player::PlayerId;
use super::state::Phase;
use crate::collect::CollectError;
use crate::roles::RoleId;

/// Broad classification of a [`GameError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: roster, participant, role name, choices.
    Validation,
    /// Operation not valid in the current phase.
    Sequence,
    /// Per-submission rejection; other participants are unaffected.
    Submission,
}

/// Errors produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("game requires {min}-{max} players, got {count}")]
    InvalidPlayerCount { count: usize, min: usize, max: usize },

    #[error("participant {0} appears more than once in the roster")]
    DuplicateParticipant(PlayerId),

    #[error("unknown participant {0}")]
    UnknownParticipant(PlayerId),

    #[error("unknown role {0:?}")]
    UnknownRole(String),

    #[error("role {0} is assigned to more than one participant")]
    DuplicateRole(RoleId),

    #[error("invalid choice from {participant}: {reason}")]
    InvalidChoice { participant: PlayerId, reason: String },

    #[error("{operation} is not allowed during {phase}")]
    WrongPhase { operation: &'static str, phase: Phase },

    #[error("night actions still pending from: {}", join(.pending))]
    PendingActions { pending: Vec<PlayerId> },

    #[error("participant {0} is already dead")]
    AlreadyDead(PlayerId),

    #[error(transparent)]
    Collect(#[from] CollectError),
}

impl GameError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidPlayerCount { .. }
            | GameError::DuplicateParticipant(_)
            | GameError::UnknownParticipant(_)
            | GameError::UnknownRole(_)
            | GameError::DuplicateRole(_)
            | GameError::InvalidChoice { .. }
            | GameError::AlreadyDead(_) => ErrorKind::Validation,
            GameError::WrongPhase { .. } | GameError::PendingActions { .. } => ErrorKind::Sequence,
            GameError::Collect(CollectError::NotComplete { .. }) => ErrorKind::Sequence,
            GameError::Collect(_) => ErrorKind::Submission,
        }
    }
}

fn join(players: &[PlayerId]) -> String {
    players
        .iter()
        .map(PlayerId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for engine operations.
pub type GameResult<T> = std::result::Result<T, GameError>;
