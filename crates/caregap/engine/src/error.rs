//! Engine error types

use caregap_registry::RegistryError;
use caregap_types::{GapId, GapStatus};
use thiserror::Error;

/// Errors surfaced by workflow stage methods.
///
/// A missing supervisor approval is not an error; see
/// [`ClosureOutcome::PendingApproval`](crate::ClosureOutcome).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("gap not found: {0}")]
    GapNotFound(GapId),

    #[error("invalid transition for {gap_id} from {from}: {reason}")]
    InvalidTransition {
        gap_id: GapId,
        from: GapStatus,
        reason: String,
    },

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl EngineError {
    pub fn invalid_transition(gap_id: &GapId, from: GapStatus, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            gap_id: gap_id.clone(),
            from,
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
