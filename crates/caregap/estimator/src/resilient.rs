//! Timeout-bounded estimator with heuristic fallback

use caregap_features::FeatureVector;
use caregap_types::ProbabilitySource;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    select_estimator, ClosureEstimate, ClosureEstimator, EstimatorConfig, EstimatorError,
    HeuristicEstimator, PredictionMonitor, PredictionRecord,
};

/// Estimate tagged with where it came from
#[derive(Clone, Debug, PartialEq)]
pub struct SourcedEstimate {
    pub estimate: ClosureEstimate,
    pub source: ProbabilitySource,
}

/// Wraps a primary estimator so that callers always get a probability.
///
/// The primary is given `timeout` to answer. Errors, timeouts and
/// probabilities outside [0, 1] are logged and answered by the heuristic
/// instead.
pub struct ResilientEstimator {
    primary: Arc<dyn ClosureEstimator>,
    fallback: HeuristicEstimator,
    timeout: Duration,
    monitor: Arc<PredictionMonitor>,
}

impl ResilientEstimator {
    pub fn new(primary: Arc<dyn ClosureEstimator>, timeout: Duration) -> Self {
        Self {
            primary,
            fallback: HeuristicEstimator::new(),
            timeout,
            monitor: Arc::new(PredictionMonitor::default()),
        }
    }

    /// Select the primary from configuration
    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self::new(
            select_estimator(config),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn heuristic_only() -> Self {
        Self::new(Arc::new(HeuristicEstimator::new()), Duration::from_millis(250))
    }

    pub fn with_monitor(mut self, monitor: Arc<PredictionMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn monitor(&self) -> &Arc<PredictionMonitor> {
        &self.monitor
    }

    pub fn primary_name(&self) -> &str {
        self.primary.name()
    }

    pub async fn estimate(&self, features: &FeatureVector) -> SourcedEstimate {
        let result = tokio::time::timeout(self.timeout, self.primary.estimate(features))
            .await
            .unwrap_or_else(|_| Err(EstimatorError::Timeout(self.timeout.as_millis() as u64)))
            .and_then(|estimate| {
                // NaN fails the range check too
                if (0.0..=1.0).contains(&estimate.probability) {
                    Ok(estimate)
                } else {
                    Err(EstimatorError::ProbabilityOutOfRange(estimate.probability))
                }
            });

        let sourced = match result {
            Ok(estimate) => {
                debug!(
                    estimator = self.primary.name(),
                    probability = estimate.probability,
                    "Closure probability estimated"
                );
                SourcedEstimate {
                    estimate,
                    source: self.primary.source(),
                }
            }
            Err(e) => {
                warn!(
                    estimator = self.primary.name(),
                    error = %e,
                    "Closure estimator failed, using heuristic"
                );
                SourcedEstimate {
                    estimate: self.fallback.predict(features),
                    source: ProbabilitySource::Heuristic,
                }
            }
        };

        self.monitor.record(PredictionRecord {
            probability: sourced.estimate.probability,
            source: sourced.source,
            model_version: sourced.estimate.model_version.clone(),
            recorded_at: Utc::now(),
        });
        sourced
    }
}

impl std::fmt::Debug for ResilientEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientEstimator")
            .field("primary", &self.primary.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
