//! Night effects and role resolution.
//!
//! - `NightEffect`: state changes a night ability asks for
//! - `Resolution`: the text result of an ability plus its effects
//! - `RoleResolver`: runs one ability against the game state
//!
//! The resolver never mutates players itself. The night coordinator decides
//! when each effect lands (immediately or after the pass).

mod effect;
mod resolver;

pub use effect::{NightEffect, Resolution};
pub use resolver::RoleResolver;
