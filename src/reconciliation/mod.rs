mod engine;
mod file_based;
mod release;
mod rollout;
mod types;

pub use engine::{reconcile, reconcile_all, reconcile_in_place};
pub use types::{ErrorKind, ReconcileError, ReconciliationOutcome, UpdateResult, UpdateType};
