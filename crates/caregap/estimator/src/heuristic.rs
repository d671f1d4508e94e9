//! Reason-based fallback estimator

use async_trait::async_trait;
use caregap_features::{names, FeatureVector};
use caregap_types::{GapReason, ProbabilitySource};

use crate::{ClosureEstimate, ClosureEstimator, EstimatorResult, InfluencingFactor};

pub const HEURISTIC_MODEL_VERSION: &str = "heuristic-v1";

const BASE_PROBABILITY: f64 = 0.6;

/// Reason one-hot feature and its adjustment to the base probability
const REASON_ADJUSTMENTS: [(&str, f64); 4] = [
    (names::REASON_LAB_PENDING, 0.2),
    (names::REASON_NOT_SCHEDULED, 0.1),
    (names::REASON_MISSED_APPOINTMENT, -0.1),
    (names::REASON_PROVIDER_DELAY, -0.15),
];

/// Always-available estimator driven only by the gap reason.
///
/// Base 0.6, adjusted by reason, clamped to [0, 1].
#[derive(Clone, Debug, Default)]
pub struct HeuristicEstimator;

impl HeuristicEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Heuristic probability for a reason without building a feature vector
    pub fn probability_for_reason(reason: &GapReason) -> f64 {
        let adjustment = match reason {
            GapReason::LabPending => 0.2,
            GapReason::NotScheduled => 0.1,
            GapReason::MissedAppointment => -0.1,
            GapReason::ProviderDelay => -0.15,
            GapReason::Other(_) => 0.0,
        };
        (BASE_PROBABILITY + adjustment).clamp(0.0, 1.0)
    }

    /// Synchronous form used directly by the resilient wrapper
    pub fn predict(&self, features: &FeatureVector) -> ClosureEstimate {
        let factors: Vec<InfluencingFactor> = REASON_ADJUSTMENTS
            .iter()
            .filter(|(feature, _)| features.is_set(feature))
            .map(|(feature, delta)| InfluencingFactor::new(*feature, *delta))
            .collect();
        let probability = BASE_PROBABILITY + factors.iter().map(|f| f.contribution).sum::<f64>();

        ClosureEstimate::from_probability(probability, factors, features, HEURISTIC_MODEL_VERSION)
    }
}

#[async_trait]
impl ClosureEstimator for HeuristicEstimator {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn source(&self) -> ProbabilitySource {
        ProbabilitySource::Heuristic
    }

    async fn estimate(&self, features: &FeatureVector) -> EstimatorResult<ClosureEstimate> {
        Ok(self.predict(features))
    }
}
