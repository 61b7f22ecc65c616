//! Role catalog for name lookup.
//!
//! Forced role assignments arrive as free text from the chat adapter, in
//! either the display form (`Fortune Teller`) or the identifier form
//! (`fortune_teller`). The catalog normalizes both to a `RoleId`.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::definition::{Category, RoleDefinition, RoleId};

/// Lookup table over every known role.
///
/// ## Example
///
/// ```
/// use clocktower_engine::roles::{RoleCatalog, RoleId};
///
/// let catalog = RoleCatalog::global();
/// assert_eq!(catalog.find("Fortune Teller"), Some(RoleId::FortuneTeller));
/// assert_eq!(catalog.find("scarlet_woman"), Some(RoleId::ScarletWoman));
/// assert_eq!(catalog.find("Vortox"), None);
/// ```
#[derive(Clone, Debug)]
pub struct RoleCatalog {
    by_name: FxHashMap<String, RoleId>,
}

impl RoleCatalog {
    fn build() -> Self {
        let mut by_name = FxHashMap::default();
        for &role in RoleId::ALL {
            by_name.insert(normalize(role.name()), role);
            by_name.insert(normalize(role.key()), role);
        }
        Self { by_name }
    }

    /// Shared catalog instance.
    #[must_use]
    pub fn global() -> &'static RoleCatalog {
        static CATALOG: OnceLock<RoleCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::build)
    }

    /// Resolve a role by display name or identifier, ignoring case,
    /// spaces and underscores.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<RoleId> {
        self.by_name.get(&normalize(name)).copied()
    }

    /// Get a role's definition.
    #[must_use]
    pub fn get(&self, role: RoleId) -> &'static RoleDefinition {
        role.definition()
    }

    /// Number of roles in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        RoleId::ALL.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        RoleId::ALL.is_empty()
    }

    /// Iterate over all role definitions.
    pub fn iter(&self) -> impl Iterator<Item = &'static RoleDefinition> {
        RoleId::ALL.iter().map(|role| role.definition())
    }

    /// Roles of a given category, in catalog order.
    #[must_use]
    pub fn in_category(&self, category: Category) -> Vec<RoleId> {
        RoleId::ALL
            .iter()
            .copied()
            .filter(|role| role.category() == category)
            .collect()
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
