//! Estimator contract and the prediction it returns

use async_trait::async_trait;
use caregap_features::{names, FeatureVector};
use caregap_types::{ContactChannel, ProbabilitySource};
use serde::{Deserialize, Serialize};

use crate::EstimatorResult;

/// Half-width of the reported confidence interval (1.96 standard errors)
const CONFIDENCE_HALF_WIDTH: f64 = 1.96 * 0.05;

/// Number of strongest contributions kept on an estimate
const MAX_INFLUENCING_FACTORS: usize = 5;

/// Anything that can turn a feature vector into a closure probability.
#[async_trait]
pub trait ClosureEstimator: Send + Sync {
    fn name(&self) -> &str;

    /// Which provenance tag predictions from this estimator carry
    fn source(&self) -> ProbabilitySource {
        ProbabilitySource::Model
    }

    async fn estimate(&self, features: &FeatureVector) -> EstimatorResult<ClosureEstimate>;
}

/// Signed contribution of one feature to a prediction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfluencingFactor {
    pub feature: String,
    pub contribution: f64,
}

impl InfluencingFactor {
    pub fn new(feature: impl Into<String>, contribution: f64) -> Self {
        Self {
            feature: feature.into(),
            contribution,
        }
    }
}

/// Closure probability plus supporting signals
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClosureEstimate {
    pub probability: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    /// Strongest contributions first
    pub influencing_factors: Vec<InfluencingFactor>,
    pub recommended_channel: ContactChannel,
    pub estimated_days_to_close: u32,
    pub model_version: String,
}

impl ClosureEstimate {
    /// Derive the supporting signals from a raw probability.
    ///
    /// The probability is clamped to [0, 1]; non-finite input maps to 0.
    pub fn from_probability(
        probability: f64,
        mut factors: Vec<InfluencingFactor>,
        features: &FeatureVector,
        model_version: impl Into<String>,
    ) -> Self {
        let probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };

        factors.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
        factors.truncate(MAX_INFLUENCING_FACTORS);

        Self {
            probability,
            confidence_lower: (probability - CONFIDENCE_HALF_WIDTH).max(0.0),
            confidence_upper: (probability + CONFIDENCE_HALF_WIDTH).min(1.0),
            influencing_factors: factors,
            recommended_channel: recommend_channel(probability, features),
            estimated_days_to_close: estimate_days_to_close(probability),
            model_version: model_version.into(),
        }
    }
}

/// Confident cases get a call; the rest follow the member's preference.
pub fn recommend_channel(probability: f64, features: &FeatureVector) -> ContactChannel {
    if probability > 0.7 {
        ContactChannel::Phone
    } else if features.is_set(names::PREFERS_SMS) {
        ContactChannel::Sms
    } else if features.is_set(names::PREFERS_EMAIL) {
        ContactChannel::Email
    } else {
        ContactChannel::Phone
    }
}

pub fn estimate_days_to_close(probability: f64) -> u32 {
    if probability > 0.8 {
        7
    } else if probability > 0.6 {
        14
    } else if probability > 0.4 {
        21
    } else {
        30
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bounds_are_clamped() {
        let high = ClosureEstimate::from_probability(0.97, vec![], &FeatureVector::new(), "t");
        assert_eq!(high.confidence_upper, 1.0);
        assert!((high.confidence_lower - 0.872).abs() < 1e-9);

        let low = ClosureEstimate::from_probability(0.02, vec![], &FeatureVector::new(), "t");
        assert_eq!(low.confidence_lower, 0.0);
    }

    #[test]
    fn test_out_of_range_probability_is_clamped() {
        let over = ClosureEstimate::from_probability(1.4, vec![], &FeatureVector::new(), "t");
        assert_eq!(over.probability, 1.0);
        let nan = ClosureEstimate::from_probability(f64::NAN, vec![], &FeatureVector::new(), "t");
        assert_eq!(nan.probability, 0.0);
    }

    #[test]
    fn test_top_five_factors_by_magnitude() {
        let factors = (0..8)
            .map(|i| InfluencingFactor::new(format!("f{i}"), if i % 2 == 0 { i as f64 } else { -(i as f64) }))
            .collect();
        let estimate = ClosureEstimate::from_probability(0.5, factors, &FeatureVector::new(), "t");
        let names: Vec<_> = estimate
            .influencing_factors
            .iter()
            .map(|f| f.feature.as_str())
            .collect();
        assert_eq!(names, vec!["f7", "f6", "f5", "f4", "f3"]);
    }

    #[test]
    fn test_channel_recommendation() {
        let mut features = FeatureVector::new();
        features.insert_flag(names::PREFERS_SMS, true);
        assert_eq!(recommend_channel(0.9, &features), ContactChannel::Phone);
        assert_eq!(recommend_channel(0.5, &features), ContactChannel::Sms);

        let mut email = FeatureVector::new();
        email.insert_flag(names::PREFERS_EMAIL, true);
        assert_eq!(recommend_channel(0.5, &email), ContactChannel::Email);
        assert_eq!(recommend_channel(0.5, &FeatureVector::new()), ContactChannel::Phone);
    }

    #[test]
    fn test_days_to_close_tiers() {
        assert_eq!(estimate_days_to_close(0.85), 7);
        assert_eq!(estimate_days_to_close(0.8), 14);
        assert_eq!(estimate_days_to_close(0.65), 14);
        assert_eq!(estimate_days_to_close(0.5), 21);
        assert_eq!(estimate_days_to_close(0.4), 30);
    }
}
