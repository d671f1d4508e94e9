//! Registry error types

use caregap_types::GapId;
use thiserror::Error;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Gap not found: {0}")]
    GapNotFound(GapId),

    #[error("Gap already exists: {0}")]
    GapAlreadyExists(GapId),

    #[error("Closure verification already recorded for gap {0}")]
    VerificationAlreadyRecorded(GapId),

    #[error("Record for gap {record} committed against gap {gap}")]
    MismatchedRecord { gap: GapId, record: GapId },

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
