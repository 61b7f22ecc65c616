//! Submission barrier for night actions.
//!
//! The collector guarantees one accepted submission per expected
//! participant and reports when the set is complete. It holds no game
//! state; the night coordinator decides who is expected and what the
//! choices mean.

mod collector;

pub use collector::{ActionCollector, CollectError, CollectionStatus, CompletionCallback, SubmitReceipt};
