//! Role catalog: static character definitions and setup quotas.
//!
//! - `RoleId` / `RoleDefinition`: immutable character data
//! - `RoleCatalog`: name lookup for forced assignments
//! - `CategoryQuota`: how many of each category a roster size deals

mod definition;
mod catalog;
mod quota;

pub use definition::{Alignment, Category, RoleDefinition, RoleId};
pub use catalog::RoleCatalog;
pub use quota::CategoryQuota;
