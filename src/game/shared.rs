//! Thread-safe game handle.
//!
//! Submissions arrive from independent callers with no ordering between
//! them. `SharedGame` puts the whole game behind one mutex, so a submission,
//! the completion check and the resolution it triggers form a single
//! critical section. No other call can observe or interleave with a
//! half-resolved night.
//!
//! The collector's completion callback runs while the lock is held. It must
//! not call back into the same `SharedGame`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::events::{DeathCause, GameEvent};
use super::orchestrator::Game;
use super::setup::ForcedRoles;
use super::view::{GameStateView, RoleInfo};
use crate::collect::{CollectionStatus, SubmitReceipt};
use crate::core::{GameResult, NightChoices, PlayerId};
use crate::rules::{ActionPrompt, WinResult};

/// Cloneable handle to one game instance.
#[derive(Clone, Debug)]
pub struct SharedGame {
    inner: Arc<Mutex<Game>>,
}

impl SharedGame {
    #[must_use]
    pub fn new(game: Game) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    /// Lock the game. A panic in another holder does not lose the game:
    /// every operation validates before it mutates, so the state is usable.
    fn lock(&self) -> MutexGuard<'_, Game> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the game.
    pub fn with<R>(&self, f: impl FnOnce(&mut Game) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn start<I, P>(&self, roster: I, forced: Option<&ForcedRoles>) -> GameResult<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PlayerId>,
    {
        self.lock().start(roster, forced)
    }

    pub fn advance_to_night(&self) -> GameResult<CollectionStatus> {
        self.lock().advance_to_night()
    }

    pub fn advance_to_day(&self) -> GameResult<()> {
        self.lock().advance_to_day()
    }

    pub fn submit_night_action(&self, participant: &PlayerId, choices: NightChoices) -> GameResult<SubmitReceipt> {
        self.lock().submit_night_action(participant, choices)
    }

    pub fn pending_action_prompt(&self, participant: &PlayerId) -> GameResult<Option<ActionPrompt>> {
        self.lock().pending_action_prompt(participant)
    }

    #[must_use]
    pub fn collection_status(&self) -> CollectionStatus {
        self.lock().collection_status()
    }

    #[must_use]
    pub fn state_view(&self) -> GameStateView {
        self.lock().state_view()
    }

    #[must_use]
    pub fn win_result(&self) -> Option<WinResult> {
        self.lock().win_result()
    }

    pub fn eliminate(&self, participant: &PlayerId, cause: DeathCause) -> GameResult<()> {
        self.lock().eliminate(participant, cause)
    }

    pub fn role_info(&self, participant: &PlayerId) -> GameResult<RoleInfo> {
        self.lock().role_info(participant)
    }

    pub fn night_info(&self, participant: &PlayerId) -> GameResult<Vec<(u32, String)>> {
        self.lock().night_info(participant)
    }

    #[must_use]
    pub fn events_since(&self, cursor: usize) -> (Vec<GameEvent>, usize) {
        self.lock().events_since(cursor)
    }
}
