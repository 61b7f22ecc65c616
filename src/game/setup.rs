//! Roster validation and role dealing.
//!
//! A deal starts from the category quota for the roster size. Forced
//! assignments are honoured first and count against their category; the
//! free seats are then filled with distinct roles drawn at random from what
//! the catalog has left.
//!
//! When forced roles overfill a category the other categories shrink
//! (Townsfolk first, the Demon last). When a category's pool runs dry the
//! shortfall moves to the next category with roles to spare.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::{GameError, GameResult, GameRng, PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use crate::roles::{Category, CategoryQuota, RoleCatalog, RoleId};

/// Caller-chosen roles, participant to role name.
pub type ForcedRoles = BTreeMap<PlayerId, String>;

const SHRINK_ORDER: [Category; 4] = [Category::Townsfolk, Category::Outsider, Category::Minion, Category::Demon];
const GROW_ORDER: [Category; 3] = [Category::Townsfolk, Category::Outsider, Category::Minion];

/// Check roster size and uniqueness.
pub fn validate_roster(roster: &[PlayerId]) -> GameResult<()> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&roster.len()) {
        return Err(GameError::InvalidPlayerCount {
            count: roster.len(),
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        });
    }
    for (i, id) in roster.iter().enumerate() {
        if roster[..i].contains(id) {
            return Err(GameError::DuplicateParticipant(id.clone()));
        }
    }
    Ok(())
}

/// Resolve forced role names against the roster and catalog.
pub fn resolve_forced(roster: &[PlayerId], forced: &ForcedRoles) -> GameResult<Vec<(PlayerId, RoleId)>> {
    let catalog = RoleCatalog::global();
    let mut resolved: Vec<(PlayerId, RoleId)> = Vec::with_capacity(forced.len());

    for (participant, name) in forced {
        if !roster.contains(participant) {
            return Err(GameError::UnknownParticipant(participant.clone()));
        }
        let role = catalog
            .find(name)
            .ok_or_else(|| GameError::UnknownRole(name.clone()))?;
        if resolved.iter().any(|(_, r)| *r == role) {
            return Err(GameError::DuplicateRole(role));
        }
        resolved.push((participant.clone(), role));
    }

    Ok(resolved)
}

/// Deal one role per seat, in roster order.
pub fn deal_roles(roster: &[PlayerId], forced: &[(PlayerId, RoleId)], rng: &mut GameRng) -> GameResult<Vec<RoleId>> {
    let mut quota = CategoryQuota::for_player_count(roster.len()).ok_or(GameError::InvalidPlayerCount {
        count: roster.len(),
        min: MIN_PLAYERS,
        max: MAX_PLAYERS,
    })?;

    for (_, role) in forced {
        let slot = quota.get_mut(role.category());
        *slot = slot.saturating_sub(1);
    }
    let free_seats = roster.len() - forced.len();
    fit_quota(&mut quota, free_seats, forced);

    let mut drawn: Vec<RoleId> = Vec::with_capacity(free_seats);
    for category in Category::ALL {
        let pool = available(category, forced);
        drawn.extend(rng.sample(&pool, quota.get(category)));
    }
    rng.shuffle(&mut drawn);

    debug!(free_seats, forced = forced.len(), ?quota, "dealing roles");

    let mut drawn = drawn.into_iter();
    roster
        .iter()
        .map(|seat| {
            forced
                .iter()
                .find(|(id, _)| id == seat)
                .map(|(_, role)| *role)
                .or_else(|| drawn.next())
                .ok_or_else(|| GameError::InvalidPlayerCount {
                    count: roster.len(),
                    min: MIN_PLAYERS,
                    max: MAX_PLAYERS,
                })
        })
        .collect()
}

fn available(category: Category, forced: &[(PlayerId, RoleId)]) -> Vec<RoleId> {
    RoleCatalog::global()
        .in_category(category)
        .into_iter()
        .filter(|role| !forced.iter().any(|(_, r)| r == role))
        .collect()
}

/// Bring the remaining quota to exactly `free_seats`, within pool limits.
fn fit_quota(quota: &mut CategoryQuota, free_seats: usize, forced: &[(PlayerId, RoleId)]) {
    for category in Category::ALL {
        let limit = available(category, forced).len();
        let slot = quota.get_mut(category);
        *slot = (*slot).min(limit);
    }

    for category in SHRINK_ORDER {
        let excess = quota.total().saturating_sub(free_seats);
        let slot = quota.get_mut(category);
        *slot -= excess.min(*slot);
    }

    for category in GROW_ORDER {
        let missing = free_seats.saturating_sub(quota.total());
        let spare = available(category, forced).len() - quota.get(category);
        *quota.get_mut(category) += missing.min(spare);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<PlayerId> {
        (0..n).map(|i| PlayerId::new(format!("p{}", i))).collect()
    }

    fn count(roles: &[RoleId], category: Category) -> usize {
        roles.iter().filter(|r| r.category() == category).count()
    }

    #[test]
    fn test_roster_bounds() {
        assert!(matches!(
            validate_roster(&roster(4)),
            Err(GameError::InvalidPlayerCount { count: 4, .. })
        ));
        assert!(validate_roster(&roster(16)).is_err());
        assert!(validate_roster(&roster(5)).is_ok());

        let mut dup = roster(5);
        dup[3] = PlayerId::new("p1");
        assert_eq!(validate_roster(&dup), Err(GameError::DuplicateParticipant(PlayerId::new("p1"))));
    }

    #[test]
    fn test_random_deal_matches_quota() {
        let mut rng = GameRng::new(8);
        for n in MIN_PLAYERS..=MAX_PLAYERS {
            let roles = deal_roles(&roster(n), &[], &mut rng).unwrap();
            let quota = CategoryQuota::for_player_count(n).unwrap();
            assert_eq!(roles.len(), n);
            for category in Category::ALL {
                assert_eq!(count(&roles, category), quota.get(category), "n={} {:?}", n, category);
            }
        }
    }

    #[test]
    fn test_forced_roles_are_kept() {
        let players = roster(7);
        let mut forced = ForcedRoles::new();
        forced.insert(PlayerId::new("p2"), "Imp".into());
        forced.insert(PlayerId::new("p5"), "fortune_teller".into());
        let forced = resolve_forced(&players, &forced).unwrap();

        let roles = deal_roles(&players, &forced, &mut GameRng::new(1)).unwrap();
        assert_eq!(roles[2], RoleId::Imp);
        assert_eq!(roles[5], RoleId::FortuneTeller);
        assert_eq!(count(&roles, Category::Demon), 1);
        assert_eq!(count(&roles, Category::Townsfolk), 5);
    }

    #[test]
    fn test_forced_overflow_shrinks_townsfolk() {
        let players = roster(5);
        let mut forced = ForcedRoles::new();
        forced.insert(PlayerId::new("p0"), "Baron".into());
        forced.insert(PlayerId::new("p1"), "Spy".into());
        forced.insert(PlayerId::new("p2"), "Saint".into());
        let forced = resolve_forced(&players, &forced).unwrap();

        let roles = deal_roles(&players, &forced, &mut GameRng::new(3)).unwrap();
        assert_eq!(count(&roles, Category::Minion), 2);
        assert_eq!(count(&roles, Category::Outsider), 1);
        assert_eq!(count(&roles, Category::Demon), 1);
        assert_eq!(count(&roles, Category::Townsfolk), 1);
    }

    #[test]
    fn test_forced_errors() {
        let players = roster(5);

        let mut forced = ForcedRoles::new();
        forced.insert(PlayerId::new("zed"), "Imp".into());
        assert_eq!(resolve_forced(&players, &forced), Err(GameError::UnknownParticipant(PlayerId::new("zed"))));

        let mut forced = ForcedRoles::new();
        forced.insert(PlayerId::new("p0"), "Vortox".into());
        assert_eq!(resolve_forced(&players, &forced), Err(GameError::UnknownRole("Vortox".into())));

        let mut forced = ForcedRoles::new();
        forced.insert(PlayerId::new("p0"), "Monk".into());
        forced.insert(PlayerId::new("p1"), "monk".into());
        assert_eq!(resolve_forced(&players, &forced), Err(GameError::DuplicateRole(RoleId::Monk)));
    }

    #[test]
    fn test_deal_is_reproducible() {
        let players = roster(9);
        let a = deal_roles(&players, &[], &mut GameRng::new(77)).unwrap();
        let b = deal_roles(&players, &[], &mut GameRng::new(77)).unwrap();
        assert_eq!(a, b);
    }
}
