//! Night abilities: who wakes, what they are asked, what they may choose.
//!
//! Every role maps onto one `NightAbility` variant. The variant answers the
//! three questions the night needs:
//! - `eligibility`: does this seat act tonight, and does it need input?
//! - `prompt`: what to ask the participant and which players they may pick
//! - `tier`: where the ability sits in the resolution pass
//!
//! Resolution itself lives in `effects::RoleResolver`, which matches on the
//! same variant.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, NightChoices, Player, PlayerId};
use crate::roles::{Category, RoleId};

/// Closed set of night behaviours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NightAbility {
    /// No night action.
    Passive,
    /// First night: one of two players is a particular character of this category.
    OneOfTwo(Category),
    /// First night: count evil pairs.
    Chef,
    /// Each night: count evil living neighbours.
    Empath,
    /// Each night: choose two, learn if either is the Demon.
    FortuneTeller,
    /// Each night after the first: learn the character executed today.
    Undertaker,
    /// Each night after the first: protect one other player from the Demon.
    Monk,
    /// Each night after the first: poison one player.
    Poisoner,
    /// Each night: see the grimoire.
    Spy,
    /// Each night after the first: kill one player, possibly yourself.
    Imp,
    /// On dying at night: learn one player's character.
    Ravenkeeper,
}

/// Ordering band in the resolution pass. Lower bands resolve first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResolutionTier {
    Poison,
    Protect,
    Kill,
    Information,
    Passive,
}

/// Rules on the players a submission may name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRule {
    /// Exact number of players to choose.
    pub count: usize,
    /// The actor may choose themselves.
    pub allow_self: bool,
    /// Chosen players must be alive.
    pub living_only: bool,
}

/// Whether a seat acts tonight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    /// Nothing to do; never blocks progress.
    NotRequired,
    /// Resolves without player input.
    Automatic,
    /// Must submit choices before the night can end.
    Submission(TargetRule),
}

impl Eligibility {
    /// Does this seat block the night until it submits?
    #[must_use]
    pub fn needs_submission(self) -> bool {
        matches!(self, Eligibility::Submission(_))
    }
}

/// What a pending participant is asked to do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPrompt {
    pub participant: PlayerId,
    pub role: RoleId,
    pub text: String,
    /// Players that may legally be chosen, in seat order.
    pub options: Vec<PlayerId>,
    pub required_count: usize,
}

impl RoleId {
    /// The role's night behaviour.
    #[must_use]
    pub fn night_ability(self) -> NightAbility {
        match self {
            RoleId::Washerwoman => NightAbility::OneOfTwo(Category::Townsfolk),
            RoleId::Librarian => NightAbility::OneOfTwo(Category::Outsider),
            RoleId::Investigator => NightAbility::OneOfTwo(Category::Minion),
            RoleId::Chef => NightAbility::Chef,
            RoleId::Empath => NightAbility::Empath,
            RoleId::FortuneTeller => NightAbility::FortuneTeller,
            RoleId::Undertaker => NightAbility::Undertaker,
            RoleId::Monk => NightAbility::Monk,
            RoleId::Ravenkeeper => NightAbility::Ravenkeeper,
            RoleId::Poisoner => NightAbility::Poisoner,
            RoleId::Spy => NightAbility::Spy,
            RoleId::Imp => NightAbility::Imp,
            RoleId::Virgin
            | RoleId::Slayer
            | RoleId::Soldier
            | RoleId::Mayor
            | RoleId::Butler
            | RoleId::Drunk
            | RoleId::Recluse
            | RoleId::Saint
            | RoleId::ScarletWoman
            | RoleId::Baron => NightAbility::Passive,
        }
    }
}

impl NightAbility {
    /// Targeting rule for abilities that take input.
    #[must_use]
    pub fn target_rule(self) -> Option<TargetRule> {
        let rule = match self {
            NightAbility::FortuneTeller => TargetRule { count: 2, allow_self: true, living_only: true },
            NightAbility::Monk => TargetRule { count: 1, allow_self: false, living_only: true },
            NightAbility::Poisoner => TargetRule { count: 1, allow_self: false, living_only: true },
            NightAbility::Imp => TargetRule { count: 1, allow_self: true, living_only: true },
            NightAbility::Ravenkeeper => TargetRule { count: 1, allow_self: false, living_only: false },
            _ => return None,
        };
        Some(rule)
    }

    /// Does this seat act on the given night?
    ///
    /// Night 0 only runs knowledge abilities, automatically. Later nights
    /// wake the choosing roles. The Ravenkeeper wakes only once dead by a
    /// kill from the current night.
    #[must_use]
    pub fn eligibility(self, player: &Player, night: u32) -> Eligibility {
        if self == NightAbility::Ravenkeeper {
            return match self.target_rule() {
                Some(rule) if night > 0 && !player.alive && player.died_tonight => Eligibility::Submission(rule),
                _ => Eligibility::NotRequired,
            };
        }
        if !player.alive {
            return Eligibility::NotRequired;
        }

        let first_night = night == 0;
        match self {
            NightAbility::OneOfTwo(_) | NightAbility::Chef if first_night => Eligibility::Automatic,
            NightAbility::Empath | NightAbility::Spy => Eligibility::Automatic,
            NightAbility::Undertaker if !first_night => Eligibility::Automatic,
            NightAbility::FortuneTeller | NightAbility::Monk | NightAbility::Poisoner | NightAbility::Imp
                if !first_night =>
            {
                self.target_rule()
                    .map_or(Eligibility::NotRequired, Eligibility::Submission)
            }
            _ => Eligibility::NotRequired,
        }
    }

    /// Resolution band.
    #[must_use]
    pub fn tier(self) -> ResolutionTier {
        match self {
            NightAbility::Poisoner => ResolutionTier::Poison,
            NightAbility::Monk => ResolutionTier::Protect,
            NightAbility::Imp => ResolutionTier::Kill,
            NightAbility::Passive => ResolutionTier::Passive,
            _ => ResolutionTier::Information,
        }
    }

    /// Results of this ability are surfaced to the actor as learned info.
    #[must_use]
    pub fn grants_information(self) -> bool {
        matches!(
            self,
            NightAbility::OneOfTwo(_)
                | NightAbility::Chef
                | NightAbility::Empath
                | NightAbility::FortuneTeller
                | NightAbility::Undertaker
                | NightAbility::Ravenkeeper
                | NightAbility::Spy
        )
    }

    fn prompt_text(self) -> &'static str {
        match self {
            NightAbility::FortuneTeller => "Choose 2 players to read",
            NightAbility::Monk => "Choose a player to protect tonight",
            NightAbility::Poisoner => "Choose a player to poison",
            NightAbility::Imp => "Choose a player to kill (or yourself)",
            NightAbility::Ravenkeeper => "You died at night - choose a player to learn their role",
            _ => "No action required",
        }
    }

    /// Build the prompt for a participant who must submit.
    #[must_use]
    pub fn prompt(self, actor: &Player, state: &GameState) -> Option<ActionPrompt> {
        let rule = self.target_rule()?;
        let role = actor.role?;
        let options = state
            .players
            .iter()
            .filter(|p| is_legal_target(rule, &actor.id, p))
            .map(|p| p.id.clone())
            .collect();

        Some(ActionPrompt {
            participant: actor.id.clone(),
            role,
            text: self.prompt_text().to_string(),
            options,
            required_count: rule.count,
        })
    }

    /// Check a submission against the targeting rule.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(self, actor: &PlayerId, choices: &NightChoices, state: &GameState) -> Result<(), String> {
        let Some(rule) = self.target_rule() else {
            return Err("this role takes no night choices".to_string());
        };

        if choices.len() != rule.count {
            return Err(format!(
                "expected {} player(s), got {}",
                rule.count,
                choices.len()
            ));
        }
        if rule.count > 1 && choices.iter().enumerate().any(|(i, c)| choices[..i].contains(c)) {
            return Err("the same player was chosen twice".to_string());
        }

        for choice in choices {
            let Some(target) = state.player(choice) else {
                return Err(format!("{} is not in this game", choice));
            };
            if !is_legal_target(rule, actor, target) {
                return Err(if target.id == *actor {
                    "you may not choose yourself".to_string()
                } else {
                    format!("{} is not a legal choice", choice)
                });
            }
        }

        Ok(())
    }
}

fn is_legal_target(rule: TargetRule, actor: &PlayerId, target: &Player) -> bool {
    (rule.allow_self || target.id != *actor) && (!rule.living_only || target.alive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::choices;

    fn state_with(roles: &[RoleId]) -> GameState {
        let mut state = GameState::new(3);
        for (i, role) in roles.iter().enumerate() {
            let mut player = Player::new(PlayerId::new(format!("p{}", i)));
            player.role = Some(*role);
            state.players.push(player);
        }
        state
    }

    #[test]
    fn test_first_night_is_automatic_only() {
        let state = state_with(&[RoleId::Washerwoman, RoleId::Imp, RoleId::Monk, RoleId::FortuneTeller, RoleId::Spy]);
        let eligibility: Vec<_> = state
            .players
            .iter()
            .map(|p| p.role.unwrap().night_ability().eligibility(p, 0))
            .collect();

        assert_eq!(eligibility[0], Eligibility::Automatic);
        assert_eq!(eligibility[1], Eligibility::NotRequired);
        assert_eq!(eligibility[2], Eligibility::NotRequired);
        assert_eq!(eligibility[3], Eligibility::NotRequired);
        assert_eq!(eligibility[4], Eligibility::Automatic);
        assert!(eligibility.iter().all(|e| !e.needs_submission()));
    }

    #[test]
    fn test_later_nights_need_submissions() {
        let state = state_with(&[RoleId::Poisoner, RoleId::Imp, RoleId::Monk, RoleId::FortuneTeller, RoleId::Chef]);
        for player in &state.players[..4] {
            assert!(player.role.unwrap().night_ability().eligibility(player, 1).needs_submission());
        }
        assert_eq!(
            NightAbility::Chef.eligibility(&state.players[4], 1),
            Eligibility::NotRequired
        );
    }

    #[test]
    fn test_dead_players_do_not_act() {
        let mut state = state_with(&[RoleId::Imp, RoleId::Empath, RoleId::Monk, RoleId::Chef, RoleId::Saint]);
        state.players[1].alive = false;
        assert_eq!(NightAbility::Empath.eligibility(&state.players[1], 2), Eligibility::NotRequired);
    }

    #[test]
    fn test_ravenkeeper_only_after_night_death() {
        let mut state = state_with(&[RoleId::Ravenkeeper, RoleId::Imp, RoleId::Monk, RoleId::Chef, RoleId::Saint]);
        let raven = NightAbility::Ravenkeeper;

        assert_eq!(raven.eligibility(&state.players[0], 1), Eligibility::NotRequired);

        state.players[0].alive = false;
        assert_eq!(raven.eligibility(&state.players[0], 1), Eligibility::NotRequired);

        state.players[0].died_tonight = true;
        assert!(raven.eligibility(&state.players[0], 1).needs_submission());
    }

    #[test]
    fn test_tiers_order_poison_first() {
        assert!(NightAbility::Poisoner.tier() < NightAbility::Monk.tier());
        assert!(NightAbility::Monk.tier() < NightAbility::Imp.tier());
        assert!(NightAbility::Imp.tier() < NightAbility::Empath.tier());
        assert_eq!(NightAbility::FortuneTeller.tier(), ResolutionTier::Information);
    }

    #[test]
    fn test_information_roles() {
        assert!(NightAbility::Spy.grants_information());
        assert!(NightAbility::OneOfTwo(Category::Minion).grants_information());
        assert!(!NightAbility::Imp.grants_information());
        assert!(!NightAbility::Monk.grants_information());
        assert!(!NightAbility::Poisoner.grants_information());
    }

    #[test]
    fn test_monk_prompt_excludes_self_and_dead() {
        let mut state = state_with(&[RoleId::Monk, RoleId::Imp, RoleId::Chef, RoleId::Saint, RoleId::Baron]);
        state.players[3].alive = false;

        let prompt = NightAbility::Monk.prompt(&state.players[0], &state).unwrap();
        assert_eq!(prompt.required_count, 1);
        assert_eq!(prompt.role, RoleId::Monk);
        assert_eq!(
            prompt.options,
            vec![PlayerId::new("p1"), PlayerId::new("p2"), PlayerId::new("p4")]
        );
    }

    #[test]
    fn test_imp_prompt_includes_self() {
        let state = state_with(&[RoleId::Monk, RoleId::Imp, RoleId::Chef, RoleId::Saint, RoleId::Baron]);
        let prompt = NightAbility::Imp.prompt(&state.players[1], &state).unwrap();
        assert!(prompt.options.contains(&PlayerId::new("p1")));
        assert_eq!(prompt.options.len(), 5);
    }

    #[test]
    fn test_passive_has_no_prompt() {
        let state = state_with(&[RoleId::Saint, RoleId::Imp, RoleId::Chef, RoleId::Monk, RoleId::Baron]);
        assert!(NightAbility::Passive.prompt(&state.players[0], &state).is_none());
    }

    #[test]
    fn test_validate_choices() {
        let mut state = state_with(&[RoleId::Monk, RoleId::Imp, RoleId::FortuneTeller, RoleId::Saint, RoleId::Baron]);
        state.players[3].alive = false;
        let monk = PlayerId::new("p0");
        let teller = PlayerId::new("p2");

        assert!(NightAbility::Monk.validate(&monk, &choices(["p1"]), &state).is_ok());
        assert!(NightAbility::Monk.validate(&monk, &choices(["p0"]), &state).is_err());
        assert!(NightAbility::Monk.validate(&monk, &choices(["p3"]), &state).is_err());
        assert!(NightAbility::Monk.validate(&monk, &choices(["nobody"]), &state).is_err());
        assert!(NightAbility::Monk.validate(&monk, &choices(["p1", "p4"]), &state).is_err());

        assert!(NightAbility::FortuneTeller.validate(&teller, &choices(["p2", "p1"]), &state).is_ok());
        assert!(NightAbility::FortuneTeller.validate(&teller, &choices(["p1", "p1"]), &state).is_err());
        assert!(NightAbility::FortuneTeller.validate(&teller, &choices(["p1"]), &state).is_err());

        assert!(NightAbility::Passive.validate(&monk, &choices(["p1"]), &state).is_err());
    }
}
