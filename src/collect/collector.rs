//! Night action collector.
//!
//! A session expects one submission from each of a fixed set of
//! participants. Each participant gets exactly one accepted submission; a
//! second delivery is rejected and never overwrites the first. When the
//! last expected submission lands, the session completes and the
//! registered completion callback runs before `submit` returns.
//!
//! The collector does not interpret choices. The game checks them against
//! the role's target rule before they get here.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{NightChoices, PlayerId, Submission};
use crate::roles::RoleId;

/// Errors produced by the collector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectError {
    #[error("participant {0} is not expected to submit an action")]
    NotExpected(PlayerId),

    #[error("participant {0} has already submitted an action")]
    AlreadySubmitted(PlayerId),

    #[error("collection not complete; waiting on {} participant(s)", .pending.len())]
    NotComplete { pending: Vec<PlayerId> },
}

/// Snapshot of a session's progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStatus {
    pub expected_count: usize,
    pub collected_count: usize,
    /// Participants yet to submit, in the order they were expected.
    pub pending: Vec<PlayerId>,
    pub is_complete: bool,
}

/// Acknowledgement for an accepted submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub collected_count: usize,
    pub expected_count: usize,
    /// This submission completed the session.
    pub completed: bool,
}

/// Invoked once per session, inside the completing `submit`.
pub type CompletionCallback = Box<dyn FnMut(&CollectionStatus) + Send>;

/// Submission barrier for one night's actors.
#[derive(Default)]
pub struct ActionCollector {
    expected: Vec<(PlayerId, RoleId)>,
    collected: FxHashMap<PlayerId, NightChoices>,
    complete: bool,
    session: u32,
    on_complete: Option<CompletionCallback>,
}

impl std::fmt::Debug for ActionCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionCollector")
            .field("expected", &self.expected)
            .field("collected", &self.collected)
            .field("complete", &self.complete)
            .field("session", &self.session)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl ActionCollector {
    /// Create an idle collector with no session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the completion callback. Replaces any previous one.
    pub fn set_completion_callback(&mut self, callback: impl FnMut(&CollectionStatus) + Send + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Remove the completion callback.
    pub fn clear_completion_callback(&mut self) {
        self.on_complete = None;
    }

    /// Open a new session, discarding the previous one.
    ///
    /// A participant listed twice is expected once. An empty session is
    /// complete immediately, and the callback fires for it here since no
    /// submission will.
    pub fn initialize(&mut self, expected: impl IntoIterator<Item = (PlayerId, RoleId)>) {
        self.expected.clear();
        for (player, role) in expected {
            if !self.expected.iter().any(|(p, _)| p == &player) {
                self.expected.push((player, role));
            }
        }
        self.collected.clear();
        self.complete = false;
        self.session += 1;

        debug!(session = self.session, expected = self.expected.len(), "collection session opened");

        if self.expected.is_empty() {
            self.finish();
        }
    }

    /// Drop the session entirely. The collector reports zero expected.
    pub fn reset(&mut self) {
        self.expected.clear();
        self.collected.clear();
        self.complete = false;
    }

    /// Accept one participant's choices.
    pub fn submit(&mut self, participant: &PlayerId, choices: NightChoices) -> Result<SubmitReceipt, CollectError> {
        if !self.is_expected(participant) {
            return Err(CollectError::NotExpected(participant.clone()));
        }
        if self.collected.contains_key(participant) {
            return Err(CollectError::AlreadySubmitted(participant.clone()));
        }

        self.collected.insert(participant.clone(), choices);
        debug!(
            session = self.session,
            participant = %participant,
            collected = self.collected.len(),
            expected = self.expected.len(),
            "night action collected"
        );

        let completed = self.collected.len() == self.expected.len();
        if completed {
            self.finish();
        }

        Ok(SubmitReceipt {
            collected_count: self.collected.len(),
            expected_count: self.expected.len(),
            completed,
        })
    }

    fn finish(&mut self) {
        self.complete = true;
        let status = self.status();
        if let Some(callback) = self.on_complete.as_mut() {
            callback(&status);
        }
    }

    /// Progress of the current session.
    #[must_use]
    pub fn status(&self) -> CollectionStatus {
        CollectionStatus {
            expected_count: self.expected.len(),
            collected_count: self.collected.len(),
            pending: self.pending(),
            is_complete: self.complete,
        }
    }

    /// Participants yet to submit, in expected order.
    #[must_use]
    pub fn pending(&self) -> Vec<PlayerId> {
        self.expected
            .iter()
            .filter(|(p, _)| !self.collected.contains_key(p))
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// All submissions, in expected order. Fails before completion.
    pub fn collected(&self) -> Result<Vec<(PlayerId, Submission)>, CollectError> {
        if !self.complete {
            return Err(CollectError::NotComplete { pending: self.pending() });
        }

        Ok(self
            .expected
            .iter()
            .filter_map(|(player, role)| {
                self.collected.get(player).map(|choices| {
                    (
                        player.clone(),
                        Submission {
                            role: *role,
                            choices: choices.clone(),
                        },
                    )
                })
            })
            .collect())
    }

    /// Is this participant part of the session?
    #[must_use]
    pub fn is_expected(&self, participant: &PlayerId) -> bool {
        self.expected.iter().any(|(p, _)| p == participant)
    }

    /// Has this participant's submission been recorded?
    #[must_use]
    pub fn has_submitted(&self, participant: &PlayerId) -> bool {
        self.collected.contains_key(participant)
    }

    /// Role label a participant was expected under.
    #[must_use]
    pub fn expected_role(&self, participant: &PlayerId) -> Option<RoleId> {
        self.expected
            .iter()
            .find(|(p, _)| p == participant)
            .map(|(_, role)| *role)
    }

    /// Has the session completed?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of sessions opened so far.
    #[must_use]
    pub fn session(&self) -> u32 {
        self.session
    }
}
