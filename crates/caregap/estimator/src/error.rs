//! Estimator errors. These never leave the crate through
//! [`ResilientEstimator`](crate::ResilientEstimator).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstimatorError {
    /// Weights file could not be read
    #[error("failed to read model weights from {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Weights file was read but is not a usable model
    #[error("invalid model weights: {0}")]
    InvalidModel(String),

    /// Estimator could not produce a prediction
    #[error("estimator unavailable: {0}")]
    Unavailable(String),

    /// Prediction outside [0, 1] or not a number
    #[error("estimated probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("estimator timed out after {0}ms")]
    Timeout(u64),
}

pub type EstimatorResult<T> = Result<T, EstimatorError>;
