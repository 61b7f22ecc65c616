//! Night action representation: who acted, as what, choosing whom.
//!
//! Choices are stored verbatim as submitted. Most roles pick one player,
//! the Fortune Teller picks two, so `SmallVec` keeps the common case off
//! the heap.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::roles::RoleId;

/// Players picked by a night action.
pub type NightChoices = SmallVec<[PlayerId; 2]>;

/// Build choices from anything that converts into player ids.
///
/// ```
/// use clocktower_engine::core::{choices, PlayerId};
///
/// let picked = choices(["alice", "bob"]);
/// assert_eq!(picked.len(), 2);
/// assert_eq!(picked[1], PlayerId::new("bob"));
/// ```
pub fn choices<I, P>(players: I) -> NightChoices
where
    I: IntoIterator<Item = P>,
    P: Into<PlayerId>,
{
    players.into_iter().map(Into::into).collect()
}

/// One submitted night action as held by the collector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Role the actor held when the session was opened.
    pub role: RoleId,

    /// Submitted choices.
    pub choices: NightChoices,
}

/// A resolved night action kept in the game history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Acting participant.
    pub actor: PlayerId,

    /// Role resolved.
    pub role: RoleId,

    /// Choices used (empty for automatic roles).
    pub choices: NightChoices,

    /// Night number the action belongs to.
    pub night: u32,

    /// Position within the night's resolution pass.
    pub sequence: u32,
}
