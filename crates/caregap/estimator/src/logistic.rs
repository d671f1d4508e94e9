//! Weights-file logistic regression estimator

use async_trait::async_trait;
use caregap_features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::{ClosureEstimate, ClosureEstimator, EstimatorError, EstimatorResult, InfluencingFactor};

/// Standardization and coefficient for one feature
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub weight: f64,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

/// On-disk model: `{"version", "intercept", "features": {name: {weight, mean, scale}}}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    pub version: String,
    #[serde(default)]
    pub intercept: f64,
    pub features: BTreeMap<String, FeatureWeight>,
}

impl ModelWeights {
    /// Reject weights that could only produce garbage probabilities
    pub fn validate(&self) -> EstimatorResult<()> {
        if self.features.is_empty() {
            return Err(EstimatorError::InvalidModel("no feature weights".into()));
        }
        if !self.intercept.is_finite() {
            return Err(EstimatorError::InvalidModel("intercept is not finite".into()));
        }
        for (name, w) in &self.features {
            if !w.weight.is_finite() || !w.mean.is_finite() {
                return Err(EstimatorError::InvalidModel(format!(
                    "non-finite weight for {name}"
                )));
            }
            if !w.scale.is_finite() || w.scale <= 0.0 {
                return Err(EstimatorError::InvalidModel(format!(
                    "scale for {name} must be positive"
                )));
            }
        }
        Ok(())
    }
}

/// Logistic model over standardized features.
///
/// Features absent from the vector are treated as sitting at their mean,
/// so they contribute nothing.
#[derive(Clone, Debug)]
pub struct LogisticEstimator {
    weights: ModelWeights,
}

impl LogisticEstimator {
    pub fn new(weights: ModelWeights) -> EstimatorResult<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Load and validate a JSON weights file
    pub fn from_file(path: impl AsRef<Path>) -> EstimatorResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| EstimatorError::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let weights: ModelWeights = serde_json::from_str(&raw)
            .map_err(|e| EstimatorError::InvalidModel(format!("{}: {e}", path.display())))?;

        let estimator = Self::new(weights)?;
        info!(
            path = %path.display(),
            version = %estimator.weights.version,
            features = estimator.weights.features.len(),
            "Loaded closure model weights"
        );
        Ok(estimator)
    }

    pub fn version(&self) -> &str {
        &self.weights.version
    }

    fn predict(&self, features: &FeatureVector) -> ClosureEstimate {
        let factors: Vec<InfluencingFactor> = self
            .weights
            .features
            .iter()
            .map(|(name, w)| {
                let x = features.get(name).unwrap_or(w.mean);
                InfluencingFactor::new(name.as_str(), w.weight * (x - w.mean) / w.scale)
            })
            .collect();

        let logit = self.weights.intercept + factors.iter().map(|f| f.contribution).sum::<f64>();
        let probability = sigmoid(logit);
        debug!(logit, probability, "Logistic prediction");

        ClosureEstimate::from_probability(probability, factors, features, &self.weights.version)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[async_trait]
impl ClosureEstimator for LogisticEstimator {
    fn name(&self) -> &str {
        "logistic"
    }

    async fn estimate(&self, features: &FeatureVector) -> EstimatorResult<ClosureEstimate> {
        Ok(self.predict(features))
    }
}
