//! The game orchestrator: phase machine plus the night barrier.
//!
//! ```text
//! Setup ─start─▶ Night(0) ─auto─▶ Day(1) ─advance_to_night─▶ Night(1)
//!                                   ▲                            │
//!                                   └──── advance_to_day / auto ─┘
//!                    any resolution or elimination may end in Ended
//! ```
//!
//! ## Night stages
//!
//! A night after the first moves through up to three stages:
//! - `Collecting`: the main session is open
//! - `FollowUp`: the main pass killed a Ravenkeeper, who is asked for a
//!   target in a fresh session
//! - `Resolved`: everything is applied and the day may begin
//!
//! The submission that completes a session runs the resolution before
//! `submit_night_action` returns. With `auto_advance_to_day` it also enters
//! the day, so a caller never sees a resolved night unless it asked to.

use tracing::{debug, info};

use super::events::{DeathCause, EventLog, GameEvent};
use super::setup::{self, ForcedRoles};
use super::view::{GameStateView, RoleInfo};
use crate::collect::{ActionCollector, CollectError, CollectionStatus, SubmitReceipt};
use crate::core::{ChefRule, GameConfig, GameError, GameResult, GameState, NightChoices, Phase, Player, PlayerId};
use crate::night::{NightCoordinator, NightReport};
use crate::rules::{evaluate, ActionPrompt, WinResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NightStage {
    Idle,
    Collecting,
    FollowUp,
    Resolved,
}

/// One game instance.
///
/// Every operation is synchronous and leaves the game unchanged when it
/// returns an error. Wrap the game in a [`super::SharedGame`] to share it
/// between threads.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    state: GameState,
    coordinator: NightCoordinator,
    collector: ActionCollector,
    stage: NightStage,
    /// Report of a night still waiting on its follow-up wave.
    in_progress: Option<NightReport>,
    reports: Vec<NightReport>,
    events: EventLog,
    winner: Option<WinResult>,
}

impl Game {
    /// Create a game in `Setup` with the given rules.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: GameState::new(config.seed),
            coordinator: NightCoordinator::new(&config),
            collector: ActionCollector::new(),
            stage: NightStage::Idle,
            in_progress: None,
            reports: Vec::new(),
            events: EventLog::new(),
            winner: None,
            config,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Full internal state, including hidden roles.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Register a callback fired once each collection session completes.
    ///
    /// It runs inside the completing submission, before the night resolves.
    pub fn on_collection_complete(&mut self, callback: impl FnMut(&CollectionStatus) + Send + 'static) {
        self.collector.set_completion_callback(callback);
    }

    // === Phase transitions ===

    /// Seat the roster, deal roles and play the first night.
    ///
    /// Roster order is seating order. `forced` pins roles for some (or all)
    /// participants; everyone else is dealt at random within the quotas.
    /// On success the game is in `Day(1)`, or `Ended` if the deal left no
    /// game to play.
    pub fn start<I, P>(&mut self, roster: I, forced: Option<&ForcedRoles>) -> GameResult<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PlayerId>,
    {
        self.require_phase("start", |phase| phase == Phase::Setup)?;

        let roster: Vec<PlayerId> = roster.into_iter().map(Into::into).collect();
        setup::validate_roster(&roster)?;
        let forced = match forced {
            Some(forced) => setup::resolve_forced(&roster, forced)?,
            None => Vec::new(),
        };
        let roles = setup::deal_roles(&roster, &forced, &mut self.state.rng)?;

        self.state.players = roster
            .into_iter()
            .zip(roles)
            .map(|(id, role)| {
                let mut player = Player::new(id);
                player.role = Some(role);
                player
            })
            .collect();
        info!(players = self.state.player_count(), seed = self.config.seed, "roles dealt");
        self.events.push(GameEvent::RolesDealt {
            players: self.state.player_count(),
        });

        // The first night never waits on anyone.
        self.state.phase = Phase::Night(0);
        self.state.night_count = 0;
        self.collector.reset();
        self.coordinator.begin_night(&mut self.state, 0);
        self.events.push(GameEvent::NightBegan {
            night: 0,
            expected: Vec::new(),
        });
        let report = self.coordinator.resolve_pass(&mut self.state, 0, &[]);
        self.finish_night(report);
        if self.stage == NightStage::Resolved {
            self.enter_day();
        }
        Ok(())
    }

    /// Leave the day and open the next night.
    ///
    /// Returns the session status. A night nobody has to act in resolves
    /// straight away.
    pub fn advance_to_night(&mut self) -> GameResult<CollectionStatus> {
        self.require_phase("advance_to_night", Phase::is_day)?;

        let night = self.state.night_count + 1;
        for player in &mut self.state.players {
            player.reset_day_flags();
        }
        self.state.phase = Phase::Night(night);
        self.state.night_count = night;

        let expected = self.coordinator.begin_night(&mut self.state, night);
        self.events.push(GameEvent::NightBegan {
            night,
            expected: expected.iter().map(|(id, _)| id.clone()).collect(),
        });
        self.stage = NightStage::Collecting;
        self.collector.initialize(expected);

        if self.collector.is_complete() {
            self.on_session_complete()?;
        }
        Ok(self.collector.status())
    }

    /// Enter the day after a resolved night.
    ///
    /// Fails with `PendingActions` while submissions are outstanding.
    pub fn advance_to_day(&mut self) -> GameResult<()> {
        self.require_phase("advance_to_day", Phase::is_night)?;

        match self.stage {
            NightStage::Resolved => {
                self.enter_day();
                Ok(())
            }
            _ => Err(GameError::PendingActions {
                pending: self.collector.pending(),
            }),
        }
    }

    // === Night actions ===

    /// Submit a participant's night choices.
    ///
    /// The choices are checked against the role's targeting rule before
    /// the collector sees them, so an invalid submission leaves the
    /// participant pending. The completing submission resolves the night.
    pub fn submit_night_action(&mut self, participant: &PlayerId, choices: NightChoices) -> GameResult<SubmitReceipt> {
        self.require_phase("submit_night_action", Phase::is_night)?;
        if self.state.player(participant).is_none() {
            return Err(GameError::UnknownParticipant(participant.clone()));
        }

        // Collector errors take precedence over choice errors.
        let role = match self.collector.expected_role(participant) {
            None => return Err(CollectError::NotExpected(participant.clone()).into()),
            Some(_) if self.collector.has_submitted(participant) => {
                return Err(CollectError::AlreadySubmitted(participant.clone()).into());
            }
            Some(role) => role,
        };
        role.night_ability()
            .validate(participant, &choices, &self.state)
            .map_err(|reason| GameError::InvalidChoice {
                participant: participant.clone(),
                reason,
            })?;

        let receipt = self.collector.submit(participant, choices)?;
        debug!(
            participant = %participant,
            collected = receipt.collected_count,
            expected = receipt.expected_count,
            "night action accepted"
        );
        self.events.push(GameEvent::ActionSubmitted {
            night: self.state.night_count,
            participant: participant.clone(),
        });

        if receipt.completed {
            self.on_session_complete()?;
        }
        Ok(receipt)
    }

    /// What a participant is asked to do tonight, if anything.
    pub fn pending_action_prompt(&self, participant: &PlayerId) -> GameResult<Option<ActionPrompt>> {
        let Some(player) = self.state.player(participant) else {
            return Err(GameError::UnknownParticipant(participant.clone()));
        };
        if !self.state.phase.is_night() || self.collector.has_submitted(participant) {
            return Ok(None);
        }
        Ok(self
            .collector
            .expected_role(participant)
            .and_then(|role| role.night_ability().prompt(player, &self.state)))
    }

    #[must_use]
    pub fn collection_status(&self) -> CollectionStatus {
        self.collector.status()
    }

    fn on_session_complete(&mut self) -> GameResult<()> {
        let night = self.state.night_count;
        let submissions = self.collector.collected()?;

        match self.stage {
            NightStage::Collecting => {
                let report = self.coordinator.resolve_pass(&mut self.state, night, &submissions);
                let follow_up = NightCoordinator::follow_up_actors(&self.state, night);
                if follow_up.is_empty() {
                    self.finish_night(report);
                } else {
                    info!(night, waiting = follow_up.len(), "waking players who died tonight");
                    self.events.push(GameEvent::FollowUpRequested {
                        night,
                        participants: follow_up.iter().map(|(id, _)| id.clone()).collect(),
                    });
                    self.in_progress = Some(report);
                    self.stage = NightStage::FollowUp;
                    self.collector.initialize(follow_up);
                }
            }
            NightStage::FollowUp => {
                let mut report = self.in_progress.take().unwrap_or_else(|| NightReport::new(night));
                self.coordinator
                    .resolve_follow_up(&mut self.state, night, &submissions, &mut report);
                self.finish_night(report);
            }
            NightStage::Idle | NightStage::Resolved => return Ok(()),
        }

        if self.stage == NightStage::Resolved && self.config.auto_advance_to_day {
            self.enter_day();
        }
        Ok(())
    }

    fn finish_night(&mut self, report: NightReport) {
        info!(
            night = report.night,
            deaths = report.deaths.len(),
            "night resolved"
        );
        self.events.push(GameEvent::NightResolved {
            night: report.night,
            deaths: report.deaths.clone(),
            promoted: report.promoted.clone(),
        });
        self.reports.push(report);
        self.stage = NightStage::Resolved;
        self.check_winner();
    }

    fn enter_day(&mut self) {
        let day = self.state.day_count + 1;
        self.state.day_count = day;
        self.state.phase = Phase::Day(day);
        self.state.executed_today = None;
        self.collector.reset();
        self.stage = NightStage::Idle;
        info!(day, "day begins");
        self.events.push(GameEvent::DayBegan { day });
    }

    // === Day ===

    /// Kill a living participant outside the night, e.g. by execution.
    ///
    /// Only allowed during the day. The win condition is checked
    /// afterwards.
    pub fn eliminate(&mut self, participant: &PlayerId, cause: DeathCause) -> GameResult<()> {
        self.require_phase("eliminate", Phase::is_day)?;
        let Some(player) = self.state.player_mut(participant) else {
            return Err(GameError::UnknownParticipant(participant.clone()));
        };
        if !player.alive {
            return Err(GameError::AlreadyDead(participant.clone()));
        }
        player.alive = false;
        if cause == DeathCause::Execution {
            self.state.executed_today = Some(participant.clone());
        }

        info!(player = %participant, %cause, "player eliminated");
        self.events.push(GameEvent::PlayerEliminated {
            participant: participant.clone(),
            cause,
        });
        self.check_winner();
        Ok(())
    }

    // === Queries ===

    /// Snapshot of phase, counters and seats.
    #[must_use]
    pub fn state_view(&self) -> GameStateView {
        GameStateView::capture(&self.state, self.winner)
    }

    #[must_use]
    pub fn win_result(&self) -> Option<WinResult> {
        self.winner
    }

    /// A participant's own character sheet.
    pub fn role_info(&self, participant: &PlayerId) -> GameResult<RoleInfo> {
        let player = self
            .state
            .player(participant)
            .ok_or_else(|| GameError::UnknownParticipant(participant.clone()))?;
        let role = player
            .role
            .ok_or_else(|| GameError::WrongPhase {
                operation: "role_info",
                phase: self.state.phase,
            })?;
        let definition = role.definition();
        Ok(RoleInfo {
            participant: participant.clone(),
            role: definition.name.to_string(),
            category: definition.category,
            alignment: definition.alignment(),
            ability: definition.ability.to_string(),
            alive: player.alive,
            poisoned: player.poisoned,
        })
    }

    /// Everything a participant has learned at night, oldest first.
    pub fn night_info(&self, participant: &PlayerId) -> GameResult<Vec<(u32, String)>> {
        if self.state.player(participant).is_none() {
            return Err(GameError::UnknownParticipant(participant.clone()));
        }
        Ok(self
            .reports
            .iter()
            .chain(self.in_progress.iter())
            .flat_map(|report| {
                report
                    .info_for(participant)
                    .map(move |text| (report.night, text.to_string()))
            })
            .collect())
    }

    /// Reports of resolved nights, oldest first.
    #[must_use]
    pub fn reports(&self) -> &[NightReport] {
        &self.reports
    }

    /// Events at or after `cursor`, and the cursor to pass next time.
    #[must_use]
    pub fn events_since(&self, cursor: usize) -> (Vec<GameEvent>, usize) {
        self.events.since(cursor)
    }

    // === Helpers ===

    fn require_phase(&self, operation: &'static str, allowed: impl Fn(Phase) -> bool) -> GameResult<()> {
        if allowed(self.state.phase) {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                operation,
                phase: self.state.phase,
            })
        }
    }

    fn check_winner(&mut self) {
        if self.winner.is_some() {
            return;
        }
        if let Some(result) = evaluate(&self.state) {
            info!(winner = %result.winner, reason = %result.reason, "game over");
            self.winner = Some(result);
            self.state.phase = Phase::Ended;
            self.collector.reset();
            self.stage = NightStage::Idle;
            self.in_progress = None;
            self.events.push(GameEvent::GameEnded { result });
        }
    }
}

/// Builder for a [`Game`].
///
/// ```
/// use clocktower_engine::core::ChefRule;
/// use clocktower_engine::game::GameBuilder;
///
/// let game = GameBuilder::new()
///     .seed(42)
///     .chef_rule(ChefRule::AllEvilPairs)
///     .soldier_immunity(false)
///     .build();
/// assert_eq!(game.config().seed, 42);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GameBuilder {
    config: GameConfig,
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing config.
    #[must_use]
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    #[must_use]
    pub fn chef_rule(mut self, rule: ChefRule) -> Self {
        self.config.chef_rule = rule;
        self
    }

    #[must_use]
    pub fn soldier_immunity(mut self, enabled: bool) -> Self {
        self.config.soldier_immunity = enabled;
        self
    }

    #[must_use]
    pub fn auto_advance_to_day(mut self, enabled: bool) -> Self {
        self.config.auto_advance_to_day = enabled;
        self
    }

    /// Build the game, in `Setup`.
    #[must_use]
    pub fn build(self) -> Game {
        Game::new(self.config)
    }

    /// Build the game behind a shared handle.
    #[must_use]
    pub fn build_shared(self) -> super::SharedGame {
        super::SharedGame::new(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::choices;
    use crate::roles::RoleId;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::new(*n)).collect()
    }

    fn forced(pairs: &[(&str, &str)]) -> ForcedRoles {
        pairs
            .iter()
            .map(|(p, r)| (PlayerId::new(*p), r.to_string()))
            .collect()
    }

    fn started(roles: &[(&str, &str)]) -> Game {
        let mut game = GameBuilder::new().seed(7).build();
        let roster: Vec<&str> = roles.iter().map(|(p, _)| *p).collect();
        game.start(roster, Some(&forced(roles))).unwrap();
        game
    }

    #[test]
    fn test_start_reaches_day_one() {
        let game = started(&[("a", "Imp"), ("b", "Poisoner"), ("c", "Monk"), ("d", "Chef"), ("e", "Empath")]);
        assert_eq!(game.phase(), Phase::Day(1));
        assert_eq!(game.reports().len(), 1);
        assert_eq!(game.state().role_of(&PlayerId::new("a")), Some(RoleId::Imp));
    }

    #[test]
    fn test_start_rejects_bad_roster() {
        let mut game = Game::new(GameConfig::default());
        let err = game.start(ids(&["a", "b", "c"]), None).unwrap_err();
        assert!(matches!(err, GameError::InvalidPlayerCount { count: 3, .. }));
        assert_eq!(game.phase(), Phase::Setup);

        let err = game.start(ids(&["a", "b", "c", "d", "a"]), None).unwrap_err();
        assert_eq!(err, GameError::DuplicateParticipant(PlayerId::new("a")));
    }

    #[test]
    fn test_start_twice_is_a_sequence_error() {
        let mut game = started(&[("a", "Imp"), ("b", "Poisoner"), ("c", "Monk"), ("d", "Chef"), ("e", "Empath")]);
        let err = game.start(ids(&["f", "g", "h", "i", "j"]), None).unwrap_err();
        assert!(matches!(err, GameError::WrongPhase { operation: "start", .. }));
    }

    #[test]
    fn test_invalid_choice_keeps_participant_pending() {
        let mut game = started(&[("a", "Imp"), ("b", "Poisoner"), ("c", "Monk"), ("d", "Chef"), ("e", "Empath")]);
        game.advance_to_night().unwrap();

        let monk = PlayerId::new("c");
        let err = game.submit_night_action(&monk, choices(["c"])).unwrap_err();
        assert!(matches!(err, GameError::InvalidChoice { .. }));
        assert!(game.collection_status().pending.contains(&monk));
        assert!(game.pending_action_prompt(&monk).unwrap().is_some());
    }

    #[test]
    fn test_unexpected_and_duplicate_submissions() {
        let mut game = started(&[("a", "Imp"), ("b", "Poisoner"), ("c", "Monk"), ("d", "Chef"), ("e", "Empath")]);
        game.advance_to_night().unwrap();

        let chef = PlayerId::new("d");
        let err = game.submit_night_action(&chef, choices(["a"])).unwrap_err();
        assert!(matches!(err, GameError::Collect(crate::collect::CollectError::NotExpected(_))));

        let poisoner = PlayerId::new("b");
        game.submit_night_action(&poisoner, choices(["c"])).unwrap();
        let err = game.submit_night_action(&poisoner, choices(["d"])).unwrap_err();
        assert!(matches!(err, GameError::Collect(crate::collect::CollectError::AlreadySubmitted(_))));
    }

    #[test]
    fn test_manual_day_advance() {
        let mut game = GameBuilder::new().seed(3).auto_advance_to_day(false).build();
        let roles = forced(&[("a", "Imp"), ("b", "Poisoner"), ("c", "Monk"), ("d", "Chef"), ("e", "Empath")]);
        game.start(ids(&["a", "b", "c", "d", "e"]), Some(&roles)).unwrap();
        assert_eq!(game.phase(), Phase::Day(1));

        game.advance_to_night().unwrap();
        assert!(matches!(game.advance_to_day(), Err(GameError::PendingActions { .. })));

        game.submit_night_action(&PlayerId::new("b"), choices(["e"])).unwrap();
        game.submit_night_action(&PlayerId::new("c"), choices(["d"])).unwrap();
        game.submit_night_action(&PlayerId::new("a"), choices(["d"])).unwrap();
        assert_eq!(game.phase(), Phase::Night(1));
        assert!(game.advance_to_night().is_err());

        game.advance_to_day().unwrap();
        assert_eq!(game.phase(), Phase::Day(2));
        let view = game.state_view();
        assert!(view.player("d").unwrap().alive);
        assert!(view.player("e").unwrap().poisoned);
        assert_eq!(game.reports()[1].survived, vec![PlayerId::new("d")]);
    }

    #[test]
    fn test_eliminate_rules() {
        let mut game = started(&[
            ("a", "Imp"),
            ("b", "Poisoner"),
            ("c", "Monk"),
            ("d", "Chef"),
            ("e", "Empath"),
            ("f", "Saint"),
            ("g", "Soldier"),
        ]);
        let ghost = PlayerId::new("zed");
        assert_eq!(
            game.eliminate(&ghost, DeathCause::Execution),
            Err(GameError::UnknownParticipant(ghost))
        );

        let chef = PlayerId::new("d");
        game.eliminate(&chef, DeathCause::Execution).unwrap();
        assert_eq!(game.state().executed_today, Some(chef.clone()));
        assert_eq!(game.phase(), Phase::Day(1));
        assert_eq!(
            game.eliminate(&chef, DeathCause::Storyteller),
            Err(GameError::AlreadyDead(chef))
        );
    }

    #[test]
    fn test_executing_demon_ends_game() {
        let mut game = started(&[("a", "Imp"), ("b", "Poisoner"), ("c", "Monk"), ("d", "Chef"), ("e", "Empath")]);
        game.eliminate(&PlayerId::new("a"), DeathCause::Execution).unwrap();

        assert_eq!(game.phase(), Phase::Ended);
        let result = game.win_result().unwrap();
        assert_eq!(result.reason.to_string(), "all demons eliminated");
        assert!(matches!(
            game.advance_to_night(),
            Err(GameError::WrongPhase { phase: Phase::Ended, .. })
        ));
    }

    #[test]
    fn test_role_info() {
        let game = started(&[("a", "Imp"), ("b", "Poisoner"), ("c", "Monk"), ("d", "Chef"), ("e", "Empath")]);
        let info = game.role_info(&PlayerId::new("c")).unwrap();
        assert_eq!(info.role, "Monk");
        assert!(info.alive);
        assert!(!info.ability.is_empty());
    }
}
