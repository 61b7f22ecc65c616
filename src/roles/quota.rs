//! Category quotas by roster size.
//!
//! Sizes 5-10 use a fixed table. For 11-15 the Outsider, Minion and Demon
//! counts follow the scaling formula and Townsfolk fill the remaining
//! seats, so the four counts always sum to the roster size.

use serde::{Deserialize, Serialize};

use super::definition::Category;
use crate::core::config::{MAX_PLAYERS, MIN_PLAYERS};

/// How many roles of each category a game deals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuota {
    pub townsfolk: usize,
    pub outsiders: usize,
    pub minions: usize,
    pub demons: usize,
}

impl CategoryQuota {
    const fn new(townsfolk: usize, outsiders: usize, minions: usize, demons: usize) -> Self {
        Self {
            townsfolk,
            outsiders,
            minions,
            demons,
        }
    }

    /// Quota for a roster size, or `None` outside 5-15.
    ///
    /// ```
    /// use clocktower_engine::roles::CategoryQuota;
    ///
    /// let q = CategoryQuota::for_player_count(7).unwrap();
    /// assert_eq!((q.townsfolk, q.outsiders, q.minions, q.demons), (5, 0, 1, 1));
    /// assert!(CategoryQuota::for_player_count(4).is_none());
    /// ```
    #[must_use]
    pub fn for_player_count(count: usize) -> Option<Self> {
        let quota = match count {
            5 => Self::new(3, 0, 1, 1),
            6 => Self::new(3, 1, 1, 1),
            7 => Self::new(5, 0, 1, 1),
            8 => Self::new(5, 1, 1, 1),
            9 => Self::new(5, 2, 1, 1),
            10 => Self::new(7, 0, 2, 1),
            n if (MIN_PLAYERS..=MAX_PLAYERS).contains(&n) => {
                let outsiders = n.saturating_sub(7) / 2;
                let minions = (n / 4).min(3);
                let demons = 1;
                let townsfolk = n - outsiders - minions - demons;
                debug_assert!(townsfolk >= 3 && townsfolk <= n - 4);
                Self::new(townsfolk, outsiders, minions, demons)
            }
            _ => return None,
        };
        Some(quota)
    }

    /// Count for one category.
    #[must_use]
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Townsfolk => self.townsfolk,
            Category::Outsider => self.outsiders,
            Category::Minion => self.minions,
            Category::Demon => self.demons,
        }
    }

    /// Mutable count for one category.
    pub fn get_mut(&mut self, category: Category) -> &mut usize {
        match category {
            Category::Townsfolk => &mut self.townsfolk,
            Category::Outsider => &mut self.outsiders,
            Category::Minion => &mut self.minions,
            Category::Demon => &mut self.demons,
        }
    }

    /// Sum of all categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.townsfolk + self.outsiders + self.minions + self.demons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_table() {
        let expected = [
            (5, (3, 0, 1, 1)),
            (6, (3, 1, 1, 1)),
            (8, (5, 1, 1, 1)),
            (9, (5, 2, 1, 1)),
            (10, (7, 0, 2, 1)),
        ];
        for (count, (t, o, m, d)) in expected {
            let q = CategoryQuota::for_player_count(count).unwrap();
            assert_eq!((q.townsfolk, q.outsiders, q.minions, q.demons), (t, o, m, d));
        }
    }

    #[test]
    fn test_scaled_sizes() {
        let q = CategoryQuota::for_player_count(11).unwrap();
        assert_eq!((q.outsiders, q.minions, q.demons), (2, 2, 1));
        assert_eq!(q.townsfolk, 6);

        let q = CategoryQuota::for_player_count(15).unwrap();
        assert_eq!((q.outsiders, q.minions, q.demons), (4, 3, 1));
        assert_eq!(q.townsfolk, 7);
    }

    #[test]
    fn test_totals_match_roster() {
        for count in MIN_PLAYERS..=MAX_PLAYERS {
            let q = CategoryQuota::for_player_count(count).unwrap();
            assert_eq!(q.total(), count, "size {}", count);
            assert_eq!(q.demons, 1);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(CategoryQuota::for_player_count(0).is_none());
        assert!(CategoryQuota::for_player_count(4).is_none());
        assert!(CategoryQuota::for_player_count(16).is_none());
    }
}
