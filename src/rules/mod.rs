//! Game rules: per-role night abilities and the win condition.
//!
//! The engine consults these to decide who wakes, what they may choose,
//! in which order abilities resolve, and when the game is over.

pub mod ability;
pub mod win;

pub use ability::{ActionPrompt, Eligibility, NightAbility, ResolutionTier, TargetRule};
pub use win::{evaluate, WinReason, WinResult};
