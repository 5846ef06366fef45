//! Reconciliation of registered devices against currently signed firmware.

mod runner;
mod types;

pub use runner::Reconciler;
pub use types::{FailedPair, ReconcileError, RunSummary};
