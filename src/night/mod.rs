//! Night coordination.
//!
//! `NightCoordinator` decides who must submit, then resolves the gathered
//! submissions together with every automatic ability. The outcome of each
//! night is kept as a `NightReport`.

mod coordinator;
mod report;

pub use coordinator::NightCoordinator;
pub use report::NightReport;
