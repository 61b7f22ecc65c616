//! Role resolution - turning a night ability into a result and effects.
//!
//! `RoleResolver::resolve` dispatches on [`NightAbility`]. Knowledge
//! abilities only read the state (and the game's RNG for the one-of-two
//! pairings); acting abilities return [`NightEffect`]s for the night
//! coordinator to apply.
//!
//! A choice naming a player that is not in the game is a bug upstream
//! (submissions are validated first). The resolver fails closed: it logs,
//! skips the effect and reports no result.

use tracing::warn;

use super::{NightEffect, Resolution};
use crate::core::{ChefRule, GameState, NightChoices, PlayerId};
use crate::roles::{Alignment, Category, RoleId};
use crate::rules::NightAbility;

/// Resolves abilities against game state.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoleResolver {
    chef_rule: ChefRule,
}

impl RoleResolver {
    /// Create a resolver with the table's Chef variant.
    #[must_use]
    pub fn new(chef_rule: ChefRule) -> Self {
        Self { chef_rule }
    }

    /// Resolve one ability for `actor`.
    ///
    /// Returns `None` when the ability cannot resolve (unknown actor or
    /// target, wrong number of choices).
    pub fn resolve(
        &self,
        state: &mut GameState,
        actor: &PlayerId,
        ability: NightAbility,
        choices: &NightChoices,
    ) -> Option<Resolution> {
        if state.player(actor).is_none() {
            warn!(actor = %actor, "resolver skipped unknown actor");
            return None;
        }
        if let Some(missing) = choices.iter().find(|c| state.player(c).is_none()) {
            warn!(actor = %actor, target = %missing, "resolver skipped action on unknown target");
            return None;
        }
        if let Some(rule) = ability.target_rule() {
            if choices.len() != rule.count {
                warn!(actor = %actor, got = choices.len(), want = rule.count, "resolver skipped malformed choices");
                return None;
            }
        }

        let resolution = match ability {
            NightAbility::Passive => Resolution::info("No action required"),
            NightAbility::OneOfTwo(category) => one_of_two(state, actor, category),
            NightAbility::Chef => self.chef(state),
            NightAbility::Empath => empath(state, actor),
            NightAbility::FortuneTeller => fortune_teller(state, &choices[0], &choices[1]),
            NightAbility::Undertaker => undertaker(state),
            NightAbility::Monk => Resolution::with_effect(
                format!("You protect {} tonight", choices[0]),
                NightEffect::Protect { target: choices[0].clone() },
            ),
            NightAbility::Poisoner => Resolution::with_effect(
                format!("You poison {}", choices[0]),
                NightEffect::Poison { target: choices[0].clone() },
            ),
            NightAbility::Imp => imp(actor, &choices[0]),
            NightAbility::Ravenkeeper => ravenkeeper(state, &choices[0])?,
            NightAbility::Spy => grimoire(state),
        };

        Some(resolution)
    }

    fn chef(&self, state: &GameState) -> Resolution {
        match self.chef_rule {
            ChefRule::AdjacentPairs => {
                let pairs = state
                    .adjacent_pairs()
                    .filter(|(a, b)| {
                        a.alignment() == Some(Alignment::Evil) && b.alignment() == Some(Alignment::Evil)
                    })
                    .count();
                Resolution::info(format!("There are {} pair(s) of evil players sitting together", pairs))
            }
            ChefRule::AllEvilPairs => {
                let evil = state
                    .players
                    .iter()
                    .filter(|p| p.alignment() == Some(Alignment::Evil))
                    .count();
                let pairs = evil * evil.saturating_sub(1) / 2;
                Resolution::info(format!("There are {} pair(s) of evil players", pairs))
            }
        }
    }
}

/// Washerwoman, Librarian and Investigator: "one of A or B is the X".
fn one_of_two(state: &mut GameState, actor: &PlayerId, category: Category) -> Resolution {
    let truthful: Vec<(PlayerId, RoleId)> = state
        .players
        .iter()
        .filter(|p| &p.id != actor && p.is(category))
        .filter_map(|p| p.role.map(|role| (p.id.clone(), role)))
        .collect();

    let Some((correct, role)) = state.rng.choose(&truthful).cloned() else {
        let others: Vec<PlayerId> = state
            .players
            .iter()
            .filter(|p| &p.id != actor)
            .map(|p| p.id.clone())
            .collect();
        let bluff = state.rng.sample(&others, 2);
        return match bluff.as_slice() {
            [a, b] => Resolution::info(format!(
                "One of {} or {} is {} {} (but neither truly is)",
                a,
                b,
                indefinite_article(category),
                category
            )),
            _ => Resolution::info(format!("Not enough players for {} info", category)),
        };
    };

    let others: Vec<PlayerId> = state
        .players
        .iter()
        .filter(|p| &p.id != actor && p.id != correct)
        .map(|p| p.id.clone())
        .collect();

    match state.rng.choose(&others).cloned() {
        Some(other) => {
            let mut pair = [correct, other];
            state.rng.shuffle(&mut pair);
            Resolution::info(format!("One of {} or {} is the {}", pair[0], pair[1], role))
        }
        None => Resolution::info(format!("{} is the {}", correct, role)),
    }
}

fn indefinite_article(category: Category) -> &'static str {
    match category {
        Category::Outsider => "an",
        _ => "a",
    }
}

fn empath(state: &GameState, actor: &PlayerId) -> Resolution {
    let (left, right) = state.living_neighbours(actor);
    let mut evil = 0;
    if let Some(left) = left {
        evil += usize::from(left.alignment() == Some(Alignment::Evil));
    }
    if let Some(right) = right {
        let same_seat = left.is_some_and(|l| l.id == right.id);
        if !same_seat {
            evil += usize::from(right.alignment() == Some(Alignment::Evil));
        }
    }
    Resolution::info(format!("You sense {} evil neighbor(s)", evil))
}

fn fortune_teller(state: &GameState, first: &PlayerId, second: &PlayerId) -> Resolution {
    let is_demon = |id: &PlayerId| state.player(id).is_some_and(|p| p.is(Category::Demon));
    if is_demon(first) || is_demon(second) {
        Resolution::info(format!("YES - one of {} or {} is a Demon", first, second))
    } else {
        Resolution::info(format!("NO - neither {} nor {} is a Demon", first, second))
    }
}

fn undertaker(state: &GameState) -> Resolution {
    match state
        .executed_today
        .as_ref()
        .and_then(|id| state.player(id))
        .and_then(|p| p.role.map(|role| (p.id.clone(), role)))
    {
        Some((id, role)) => Resolution::info(format!("{} was executed today: they were the {}", id, role)),
        None => Resolution::info("No one was executed today"),
    }
}

fn imp(actor: &PlayerId, target: &PlayerId) -> Resolution {
    if target == actor {
        Resolution::with_effect(
            "You kill yourself - a minion will become the Imp",
            NightEffect::StarPass { actor: actor.clone() },
        )
    } else {
        Resolution::with_effect(
            format!("You kill {}", target),
            NightEffect::Kill {
                actor: actor.clone(),
                target: target.clone(),
            },
        )
    }
}

fn ravenkeeper(state: &GameState, target: &PlayerId) -> Option<Resolution> {
    let role = state.role_of(target)?;
    Some(Resolution::info(format!("{} is the {}", target, role)))
}

fn grimoire(state: &GameState) -> Resolution {
    let lines: Vec<String> = state
        .players
        .iter()
        .filter_map(|p| {
            let role = p.role?;
            let status = if p.alive { "alive" } else { "dead" };
            let poison = if p.poisoned { " (poisoned)" } else { "" };
            Some(format!(
                "{}: {} ({}) - {}{}",
                p.id,
                role,
                role.alignment(),
                status,
                poison
            ))
        })
        .collect();
    Resolution::info(format!("GRIMOIRE:\n{}", lines.join("\n")))
}
