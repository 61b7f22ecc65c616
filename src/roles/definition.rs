//! Role definitions - static character data.
//!
//! `RoleId` is the closed set of characters this engine knows. Each one
//! maps to an immutable `RoleDefinition` (display name, category, night
//! order, ability text). Alignment follows from category: Townsfolk and
//! Outsiders are good, Minions and Demons are evil.
//!
//! Night-order values only sort simultaneous resolutions; they never decide
//! whether a role acts.

use serde::{Deserialize, Serialize};

/// Team membership for the win condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Good,
    Evil,
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Good => f.write_str("good"),
            Alignment::Evil => f.write_str("evil"),
        }
    }
}

/// Character type. Governs setup quotas and some abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Townsfolk,
    Outsider,
    Minion,
    Demon,
}

impl Category {
    /// All categories in setup order.
    pub const ALL: [Category; 4] = [
        Category::Townsfolk,
        Category::Outsider,
        Category::Minion,
        Category::Demon,
    ];

    /// Team a category belongs to.
    #[must_use]
    pub const fn alignment(self) -> Alignment {
        match self {
            Category::Townsfolk | Category::Outsider => Alignment::Good,
            Category::Minion | Category::Demon => Alignment::Evil,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Townsfolk => f.write_str("Townsfolk"),
            Category::Outsider => f.write_str("Outsider"),
            Category::Minion => f.write_str("Minion"),
            Category::Demon => f.write_str("Demon"),
        }
    }
}

/// Immutable catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleDefinition {
    pub id: RoleId,
    /// Lowercase identifier, e.g. `fortune_teller`.
    pub key: &'static str,
    /// Display name, e.g. `Fortune Teller`.
    pub name: &'static str,
    pub category: Category,
    /// Position in the night order for nights after the first.
    pub night_order: Option<u8>,
    /// Position in the first night's order.
    pub first_night_order: Option<u8>,
    pub ability: &'static str,
}

impl RoleDefinition {
    /// Alignment derived from category.
    #[must_use]
    pub const fn alignment(&self) -> Alignment {
        self.category.alignment()
    }
}

macro_rules! define_roles {
    (
        $(
            $role:ident: $key:literal, $name:literal => {
                category: $category:ident,
                ability: $ability:literal
                $(, first_night: $first:expr)?
                $(, other_nights: $other:expr)?
            }
        ),* $(,)?
    ) => {
        /// Every character the engine knows.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum RoleId {
            $($role,)*
        }

        impl RoleId {
            /// All roles in catalog order.
            pub const ALL: &'static [RoleId] = &[$(RoleId::$role,)*];

            /// Static definition of this role.
            #[must_use]
            pub const fn definition(self) -> &'static RoleDefinition {
                match self {
                    $(RoleId::$role => {
                        const DEF: RoleDefinition = RoleDefinition {
                            id: RoleId::$role,
                            key: $key,
                            name: $name,
                            category: Category::$category,
                            night_order: define_roles!(@order $($other)?),
                            first_night_order: define_roles!(@order $($first)?),
                            ability: $ability,
                        };
                        &DEF
                    })*
                }
            }
        }
    };

    (@order $val:expr) => { Some($val) };
    (@order) => { None };
}

define_roles! {
    // Townsfolk
    Washerwoman: "washerwoman", "Washerwoman" => {
        category: Townsfolk,
        ability: "You start knowing that 1 of 2 players is a particular Townsfolk.",
        first_night: 1
    },
    Librarian: "librarian", "Librarian" => {
        category: Townsfolk,
        ability: "You start knowing that 1 of 2 players is a particular Outsider.",
        first_night: 2
    },
    Investigator: "investigator", "Investigator" => {
        category: Townsfolk,
        ability: "You start knowing that 1 of 2 players is a particular Minion.",
        first_night: 3
    },
    Chef: "chef", "Chef" => {
        category: Townsfolk,
        ability: "You start knowing how many pairs of evil players there are.",
        first_night: 4
    },
    Empath: "empath", "Empath" => {
        category: Townsfolk,
        ability: "Each night, you learn how many of your 2 alive neighbors are evil.",
        first_night: 5,
        other_nights: 1
    },
    FortuneTeller: "fortune_teller", "Fortune Teller" => {
        category: Townsfolk,
        ability: "Each night, choose 2 players: you learn if either is a Demon.",
        other_nights: 2
    },
    Undertaker: "undertaker", "Undertaker" => {
        category: Townsfolk,
        ability: "Each night*, you learn which character died by execution today.",
        other_nights: 3
    },
    Monk: "monk", "Monk" => {
        category: Townsfolk,
        ability: "Each night*, choose a player (not yourself): they are safe from the Demon tonight.",
        other_nights: 4
    },
    Ravenkeeper: "ravenkeeper", "Ravenkeeper" => {
        category: Townsfolk,
        ability: "If you die at night, you are woken to choose a player: you learn their character.",
        other_nights: 8
    },
    Virgin: "virgin", "Virgin" => {
        category: Townsfolk,
        ability: "The 1st time you are nominated, if the nominator is a Townsfolk, they are executed immediately."
    },
    Slayer: "slayer", "Slayer" => {
        category: Townsfolk,
        ability: "Once per game, during the day, publicly choose a player: if they are the Demon, they die."
    },
    Soldier: "soldier", "Soldier" => {
        category: Townsfolk,
        ability: "You are safe from the Demon."
    },
    Mayor: "mayor", "Mayor" => {
        category: Townsfolk,
        ability: "If only 3 players live & no execution occurs, your team wins."
    },

    // Outsiders
    Butler: "butler", "Butler" => {
        category: Outsider,
        ability: "Each night, choose a player (not yourself): tomorrow, you may only vote if they are voting too."
    },
    Drunk: "drunk", "Drunk" => {
        category: Outsider,
        ability: "You do not know you are the Drunk. You think you are a Townsfolk character, but you are not."
    },
    Recluse: "recluse", "Recluse" => {
        category: Outsider,
        ability: "You might register as evil & as a Minion or Demon, even when dead."
    },
    Saint: "saint", "Saint" => {
        category: Outsider,
        ability: "If you die by execution, your team loses."
    },

    // Minions
    Poisoner: "poisoner", "Poisoner" => {
        category: Minion,
        ability: "Each night, choose a player: they are poisoned tonight and tomorrow day.",
        other_nights: 5
    },
    Spy: "spy", "Spy" => {
        category: Minion,
        ability: "Each night, you see the Grimoire. You might register as good & as a Townsfolk or Outsider, even when dead.",
        first_night: 6,
        other_nights: 6
    },
    ScarletWoman: "scarlet_woman", "Scarlet Woman" => {
        category: Minion,
        ability: "If there are 5 or more players alive & the Demon dies, you become the Demon."
    },
    Baron: "baron", "Baron" => {
        category: Minion,
        ability: "There are extra Outsiders in play."
    },

    // Demons
    Imp: "imp", "Imp" => {
        category: Demon,
        ability: "Each night*, choose a player: they die. If you kill yourself this way, a Minion becomes the Imp.",
        other_nights: 7
    },
}

impl RoleId {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.definition().name
    }

    /// Lowercase identifier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        self.definition().key
    }

    /// Character type.
    #[must_use]
    pub const fn category(self) -> Category {
        self.definition().category
    }

    /// Team.
    #[must_use]
    pub const fn alignment(self) -> Alignment {
        self.definition().category.alignment()
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
