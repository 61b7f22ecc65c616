//! Night coordination: who acts, in what order, and when effects land.
//!
//! ## Resolution pass
//!
//! 1. Last night's poison is cleared.
//! 2. Every acting seat is planned: automatic abilities with no choices,
//!    submitting abilities with the choices the collector gathered.
//! 3. The plan is ordered by tier (poison, protect, kill, information),
//!    then by the role's position in the night order, then by seat.
//! 4. Each ability resolves. Poison and protection apply at once so later
//!    abilities in the pass see them; kills and the star pass are queued.
//! 5. Queued effects apply together once the pass is done.
//!
//! A Ravenkeeper killed in step 5 is woken afterwards with a follow-up
//! pass that resolves only their reveal.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use super::NightReport;
use crate::core::{ActionRecord, GameConfig, GameState, NightChoices, PlayerId, Submission};
use crate::effects::{NightEffect, RoleResolver};
use crate::roles::{Category, RoleId};
use crate::rules::{Eligibility, NightAbility};

#[derive(Clone, Debug)]
struct PlannedAction {
    actor: PlayerId,
    role: RoleId,
    ability: NightAbility,
    choices: NightChoices,
    seat: usize,
}

/// Drives the resolution of a night.
#[derive(Clone, Copy, Debug)]
pub struct NightCoordinator {
    resolver: RoleResolver,
    soldier_immunity: bool,
}

impl NightCoordinator {
    /// Coordinator using the table's house rules.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            resolver: RoleResolver::new(config.chef_rule),
            soldier_immunity: config.soldier_immunity,
        }
    }

    /// Seats that must submit before the night can resolve, in seat order.
    #[must_use]
    pub fn expected_actors(state: &GameState, night: u32) -> Vec<(PlayerId, RoleId)> {
        state
            .players
            .iter()
            .filter_map(|p| {
                let role = p.role?;
                role.night_ability()
                    .eligibility(p, night)
                    .needs_submission()
                    .then(|| (p.id.clone(), role))
            })
            .collect()
    }

    /// Seats woken after the main pass: those whose ability triggers on
    /// dying tonight.
    #[must_use]
    pub fn follow_up_actors(state: &GameState, night: u32) -> Vec<(PlayerId, RoleId)> {
        Self::expected_actors(state, night)
            .into_iter()
            .filter(|(id, _)| state.player(id).is_some_and(|p| !p.alive && p.died_tonight))
            .collect()
    }

    /// Reset per-night markers and return the seats expected to submit.
    pub fn begin_night(&self, state: &mut GameState, night: u32) -> Vec<(PlayerId, RoleId)> {
        state.begin_night();
        let expected = Self::expected_actors(state, night);
        info!(
            night,
            expected = expected.len(),
            "night begins"
        );
        expected
    }

    /// Run the night's main resolution pass.
    pub fn resolve_pass(
        &self,
        state: &mut GameState,
        night: u32,
        submissions: &[(PlayerId, Submission)],
    ) -> NightReport {
        state.clear_poison();

        let submitted: FxHashMap<&PlayerId, &Submission> =
            submissions.iter().map(|(id, s)| (id, s)).collect();

        let plan: Vec<PlannedAction> = state
            .players
            .iter()
            .enumerate()
            .filter_map(|(seat, p)| {
                let role = p.role?;
                let ability = role.night_ability();
                let choices = match ability.eligibility(p, night) {
                    Eligibility::NotRequired => return None,
                    Eligibility::Automatic => NightChoices::new(),
                    Eligibility::Submission(_) => match submitted.get(&p.id) {
                        Some(submission) => submission.choices.clone(),
                        None => {
                            warn!(actor = %p.id, role = %role, "expected actor has no submission");
                            return None;
                        }
                    },
                };
                Some(PlannedAction {
                    actor: p.id.clone(),
                    role,
                    ability,
                    choices,
                    seat,
                })
            })
            .collect();

        let mut report = NightReport::new(night);
        self.run(state, night, plan, &mut report);
        report
    }

    /// Resolve the follow-up wave (Ravenkeeper reveals) into an existing report.
    pub fn resolve_follow_up(
        &self,
        state: &mut GameState,
        night: u32,
        submissions: &[(PlayerId, Submission)],
        report: &mut NightReport,
    ) {
        let plan = submissions
            .iter()
            .filter_map(|(actor, submission)| {
                let seat = state.seat_of(actor)?;
                Some(PlannedAction {
                    actor: actor.clone(),
                    role: submission.role,
                    ability: submission.role.night_ability(),
                    choices: submission.choices.clone(),
                    seat,
                })
            })
            .collect();
        self.run(state, night, plan, report);
    }

    fn run(&self, state: &mut GameState, night: u32, mut plan: Vec<PlannedAction>, report: &mut NightReport) {
        plan.sort_by_key(|a| (a.ability.tier(), night_position(a.role, night), a.seat));

        let mut deferred = Vec::new();
        for action in plan {
            let Some(resolution) = self
                .resolver
                .resolve(state, &action.actor, action.ability, &action.choices)
            else {
                continue;
            };

            debug!(
                night,
                actor = %action.actor,
                role = %action.role,
                result = %resolution.text,
                "resolved night action"
            );

            for effect in resolution.effects {
                if effect.is_deferred() {
                    deferred.push(effect);
                } else {
                    apply_immediate(state, effect);
                }
            }

            if action.ability.grants_information() {
                report.info.push((action.actor.clone(), resolution.text));
            }

            let sequence = state.next_sequence(night);
            state.record_action(ActionRecord {
                actor: action.actor,
                role: action.role,
                choices: action.choices,
                night,
                sequence,
            });
        }

        for effect in deferred {
            self.apply_deferred(state, effect, report);
        }
    }

    fn apply_deferred(&self, state: &mut GameState, effect: NightEffect, report: &mut NightReport) {
        match effect {
            NightEffect::Kill { actor, target } => {
                if state.protected_tonight.as_ref() == Some(&target) {
                    info!(target = %target, "kill stopped by protection");
                    report.survived.push(target);
                    return;
                }
                let demon_actor = state.player(&actor).is_some_and(|p| p.is(Category::Demon));
                let Some(victim) = state.player(&target) else {
                    warn!(target = %target, "kill target left the game");
                    return;
                };
                if !victim.alive {
                    return;
                }
                let immune = self.soldier_immunity
                    && demon_actor
                    && victim.role == Some(RoleId::Soldier)
                    && !victim.poisoned;
                if immune {
                    info!(target = %target, "Soldier survives the Demon");
                    report.survived.push(target);
                    return;
                }
                kill(state, &target, report);
            }
            NightEffect::StarPass { actor } => {
                kill(state, &actor, report);
                let minions = state.living_in(Category::Minion);
                if let Some(heir) = state.rng.choose(&minions).cloned() {
                    if let Some(player) = state.player_mut(&heir) {
                        player.role = Some(RoleId::Imp);
                    }
                    info!(heir = %heir, "minion promoted to Imp");
                    report.promoted = Some(heir);
                }
            }
            immediate => apply_immediate(state, immediate),
        }
    }
}

fn night_position(role: RoleId, night: u32) -> u8 {
    let definition = role.definition();
    let order = if night == 0 {
        definition.first_night_order
    } else {
        definition.night_order
    };
    order.unwrap_or(u8::MAX)
}

fn apply_immediate(state: &mut GameState, effect: NightEffect) {
    match effect {
        NightEffect::Poison { target } => {
            if let Some(player) = state.player_mut(&target) {
                player.poisoned = true;
            }
        }
        NightEffect::Protect { target } => state.protected_tonight = Some(target),
        NightEffect::Kill { .. } | NightEffect::StarPass { .. } => {}
    }
}

fn kill(state: &mut GameState, target: &PlayerId, report: &mut NightReport) {
    let Some(player) = state.player_mut(target) else {
        return;
    };
    if !player.alive {
        return;
    }
    player.alive = false;
    player.died_tonight = true;
    info!(player = %target, "died in the night");
    report.deaths.push(target.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{choices, Player};

    fn state_with(roles: &[RoleId]) -> GameState {
        let mut state = GameState::new(5);
        for (i, role) in roles.iter().enumerate() {
            let mut player = Player::new(PlayerId::new(format!("p{}", i)));
            player.role = Some(*role);
            state.players.push(player);
        }
        state
    }

    fn submission(actor: &str, role: RoleId, picked: &[&str]) -> (PlayerId, Submission) {
        (
            PlayerId::new(actor),
            Submission {
                role,
                choices: choices(picked.iter().copied()),
            },
        )
    }

    fn coordinator() -> NightCoordinator {
        NightCoordinator::new(&GameConfig::default())
    }

    #[test]
    fn test_expected_actors_by_night() {
        let state = state_with(&[RoleId::Imp, RoleId::Poisoner, RoleId::Monk, RoleId::Empath, RoleId::Chef]);
        assert!(NightCoordinator::expected_actors(&state, 0).is_empty());

        let expected: Vec<RoleId> = NightCoordinator::expected_actors(&state, 1)
            .into_iter()
            .map(|(_, role)| role)
            .collect();
        assert_eq!(expected, vec![RoleId::Imp, RoleId::Poisoner, RoleId::Monk]);
    }

    #[test]
    fn test_first_night_records_information() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Baron, RoleId::Chef, RoleId::Empath, RoleId::Washerwoman]);
        let report = coordinator().resolve_pass(&mut state, 0, &[]);

        let learners: Vec<&str> = report.info.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(learners, vec!["p4", "p2", "p3"]);
        assert!(report.deaths.is_empty());
        assert_eq!(state.history.len(), 3);
    }

    #[test]
    fn test_poison_lands_before_information() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Poisoner, RoleId::Monk, RoleId::Spy, RoleId::Chef]);
        let submissions = vec![
            submission("p0", RoleId::Imp, &["p4"]),
            submission("p1", RoleId::Poisoner, &["p2"]),
            submission("p2", RoleId::Monk, &["p0"]),
        ];
        let report = coordinator().resolve_pass(&mut state, 1, &submissions);

        let spy = PlayerId::new("p3");
        let grimoire = report.info_for(&spy).next().unwrap();
        assert!(grimoire.contains("p2: Monk (good) - alive (poisoned)"));
        assert!(state.players[2].poisoned);
        assert_eq!(report.deaths, vec![PlayerId::new("p4")]);
    }

    #[test]
    fn test_poison_cleared_at_next_pass() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Poisoner, RoleId::Monk, RoleId::Saint, RoleId::Chef]);
        state.players[2].poisoned = true;

        let submissions = vec![
            submission("p0", RoleId::Imp, &["p4"]),
            submission("p1", RoleId::Poisoner, &["p3"]),
            submission("p2", RoleId::Monk, &["p4"]),
        ];
        let report = coordinator().resolve_pass(&mut state, 2, &submissions);

        assert!(!state.players[2].poisoned);
        assert!(state.players[3].poisoned);
        assert!(report.deaths.is_empty());
        assert_eq!(report.survived, vec![PlayerId::new("p4")]);
    }

    #[test]
    fn test_soldier_immunity_and_poison() {
        let roles = [RoleId::Imp, RoleId::Poisoner, RoleId::Soldier, RoleId::Saint, RoleId::Chef];

        let mut state = state_with(&roles);
        let submissions = vec![
            submission("p0", RoleId::Imp, &["p2"]),
            submission("p1", RoleId::Poisoner, &["p3"]),
        ];
        let report = coordinator().resolve_pass(&mut state, 1, &submissions);
        assert!(state.players[2].alive);
        assert_eq!(report.survived, vec![PlayerId::new("p2")]);

        let mut state = state_with(&roles);
        let submissions = vec![
            submission("p0", RoleId::Imp, &["p2"]),
            submission("p1", RoleId::Poisoner, &["p2"]),
        ];
        coordinator().resolve_pass(&mut state, 1, &submissions);
        assert!(!state.players[2].alive);
    }

    #[test]
    fn test_soldier_immunity_can_be_disabled() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Poisoner, RoleId::Soldier, RoleId::Saint, RoleId::Chef]);
        let config = GameConfig {
            soldier_immunity: false,
            ..GameConfig::default()
        };
        let submissions = vec![
            submission("p0", RoleId::Imp, &["p2"]),
            submission("p1", RoleId::Poisoner, &["p3"]),
        ];
        NightCoordinator::new(&config).resolve_pass(&mut state, 1, &submissions);
        assert!(!state.players[2].alive);
    }

    #[test]
    fn test_star_pass_promotes_minion() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Baron, RoleId::Chef, RoleId::Saint, RoleId::Monk]);
        let submissions = vec![
            submission("p0", RoleId::Imp, &["p0"]),
            submission("p4", RoleId::Monk, &["p0"]),
        ];
        let report = coordinator().resolve_pass(&mut state, 1, &submissions);

        assert!(!state.players[0].alive);
        assert_eq!(report.promoted, Some(PlayerId::new("p1")));
        assert_eq!(state.players[1].role, Some(RoleId::Imp));
        assert_eq!(state.living_in(Category::Demon), vec![PlayerId::new("p1")]);
    }

    #[test]
    fn test_ravenkeeper_follow_up() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Ravenkeeper, RoleId::Chef, RoleId::Saint, RoleId::Baron]);
        let coordinator = coordinator();
        let report_subs = vec![submission("p0", RoleId::Imp, &["p1"])];
        let mut report = coordinator.resolve_pass(&mut state, 1, &report_subs);

        let follow_up = NightCoordinator::follow_up_actors(&state, 1);
        assert_eq!(follow_up, vec![(PlayerId::new("p1"), RoleId::Ravenkeeper)]);

        let reveal = vec![submission("p1", RoleId::Ravenkeeper, &["p0"])];
        coordinator.resolve_follow_up(&mut state, 1, &reveal, &mut report);

        let ravenkeeper = PlayerId::new("p1");
        let learned: Vec<&str> = report.info_for(&ravenkeeper).collect();
        assert_eq!(learned, vec!["p0 is the Imp"]);
    }

    #[test]
    fn test_missing_submission_is_skipped() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Poisoner, RoleId::Chef, RoleId::Saint, RoleId::Baron]);
        let report = coordinator().resolve_pass(&mut state, 1, &[]);
        assert!(report.deaths.is_empty());
        assert!(state.history.is_empty());
    }
}
