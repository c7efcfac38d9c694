//! Execution mode port

use std::sync::atomic::{AtomicBool, Ordering};

/// Tells whether the current story run is a dry run.
///
/// During a dry run dynamic variables and expressions are never evaluated.
pub trait ExecutionMode: Send + Sync {
    /// Returns true if the story is being dry-run.
    fn is_dry_run(&self) -> bool;
}

impl ExecutionMode for bool {
    fn is_dry_run(&self) -> bool {
        *self
    }
}

impl ExecutionMode for AtomicBool {
    fn is_dry_run(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}
