//! Construction-time estimator selection

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{ClosureEstimator, HeuristicEstimator, LogisticEstimator};

/// Estimator settings, normally a section of the engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// JSON weights file; the heuristic is used when absent or unloadable
    pub model_path: Option<PathBuf>,
    /// Upper bound on a single estimate call
    pub timeout_ms: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    250
}

/// Pick the primary estimator. Never fails: a model that cannot be
/// loaded degrades to the heuristic.
pub fn select_estimator(config: &EstimatorConfig) -> Arc<dyn ClosureEstimator> {
    let Some(path) = config.model_path.as_ref() else {
        info!("No closure model configured, using heuristic estimator");
        return Arc::new(HeuristicEstimator::new());
    };

    match LogisticEstimator::from_file(path) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Closure model unavailable, falling back to heuristic estimator"
            );
            Arc::new(HeuristicEstimator::new())
        }
    }
}
