//! Value, urgency and priority scoring

use caregap_types::{MeasureId, Priority, Urgency};

use crate::config::ScoringConfig;

/// Scores computed for a gap at identification
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapScores {
    pub urgency: Urgency,
    pub value_score: f64,
    pub priority_score: f64,
    pub priority: Priority,
}

/// Pure scoring policy
#[derive(Clone, Debug, Default)]
pub struct GapScorer {
    config: ScoringConfig,
}

impl GapScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// `base + measure weight * multiplier + risk * risk weight`, in [0, 1]
    pub fn value_score(&self, measure_id: &MeasureId, risk_score: f64) -> f64 {
        let c = &self.config;
        let measure = c.measure_weight(measure_id.as_str()) * c.measure_multiplier;
        let raw = c.value_base + measure + risk_score * c.risk_weight;
        if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            c.value_base.clamp(0.0, 1.0)
        }
    }

    pub fn priority_score(&self, value_score: f64, urgency: Urgency) -> f64 {
        self.config.value_weight * value_score + self.config.urgency_weight * urgency.score()
    }

    pub fn score(&self, measure_id: &MeasureId, risk_score: f64, days_to_deadline: i64) -> GapScores {
        let urgency = Urgency::from_days_to_deadline(days_to_deadline);
        let value_score = self.value_score(measure_id, risk_score);
        let priority_score = self.priority_score(value_score, urgency);

        GapScores {
            urgency,
            value_score,
            priority_score,
            priority: Priority::from_score(priority_score),
        }
    }
}
