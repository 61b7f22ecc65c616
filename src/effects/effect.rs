//! Night effects produced by resolving an ability.
//!
//! Effects split in two groups:
//! - **Immediate** (`Poison`, `Protect`): applied as soon as the ability
//!   resolves, so later abilities in the same pass see them
//! - **Deferred** (`Kill`, `StarPass`): queued and applied together once
//!   every ability of the night has resolved

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PlayerId;

/// A state change requested by a night ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NightEffect {
    /// Poison a player until the next night's pass.
    Poison { target: PlayerId },
    /// Fill the protected-tonight slot.
    Protect { target: PlayerId },
    /// Demon kill, subject to protection and Soldier immunity.
    Kill { actor: PlayerId, target: PlayerId },
    /// Demon kills itself; a living Minion inherits the Demon.
    StarPass { actor: PlayerId },
}

impl NightEffect {
    /// Applied after the whole pass rather than on resolution.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self, NightEffect::Kill { .. } | NightEffect::StarPass { .. })
    }
}

/// Outcome of one ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Human-readable result text.
    pub text: String,
    /// Requested state changes.
    pub effects: SmallVec<[NightEffect; 1]>,
}

impl Resolution {
    /// Result with text only.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            effects: SmallVec::new(),
        }
    }

    /// Result with text and one effect.
    #[must_use]
    pub fn with_effect(text: impl Into<String>, effect: NightEffect) -> Self {
        let mut effects = SmallVec::new();
        effects.push(effect);
        Self {
            text: text.into(),
            effects,
        }
    }
}
