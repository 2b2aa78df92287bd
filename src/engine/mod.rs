//! The list traversal and extraction engine.
//!
//! [`ScrollLoader`] loads the lazy list once up front, then
//! [`NavigationController`] walks it index by index. Rows are always
//! re-resolved by position from a fresh snapshot ([`ListSnapshotProvider`])
//! because the host application invalidates handles whenever it re-renders.

pub mod dedup;
pub mod extract;
pub mod navigator;
pub mod policy;
pub mod scroll;
pub mod selector;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use dedup::Deduplicator;
pub use extract::DetailExtractor;
pub use navigator::{BackRoute, NavState, NavigationController, PassSummary};
pub use policy::{ErrorRecoveryPolicy, Failure};
pub use scroll::{ScrollLoader, ScrollOutcome};
pub use selector::{Activation, SafeSelector};
pub use snapshot::ListSnapshotProvider;
