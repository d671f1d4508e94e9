//! The care gap entity

use crate::{CoordinatorId, GapId, GapReason, GapStatus, MeasureId, MemberId, Priority, Urgency};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a gap's closure probability came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProbabilitySource {
    /// Produced by the configured closure-probability model
    Model,
    /// Reason-based heuristic (model absent, failed or timed out)
    #[default]
    Heuristic,
}

/// An unmet clinical quality action for a member
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub gap_id: GapId,
    pub member_id: MemberId,
    pub measure_id: MeasureId,
    pub gap_reason: GapReason,
    pub identified_date: DateTime<Utc>,
    pub deadline_date: DateTime<Utc>,
    pub urgency: Urgency,
    pub priority: Priority,
    /// `0.6 * value_score + 0.4 * urgency score`
    pub priority_score: f64,
    pub value_score: f64,
    /// Estimated likelihood of closure, always within [0, 1]
    pub closure_probability: f64,
    pub probability_source: ProbabilitySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_coordinator: Option<CoordinatorId>,
    pub status: GapStatus,
    /// Free-form domain context (geography, appointment date, lab order date, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    pub updated_at: DateTime<Utc>,
}

impl Gap {
    /// Whole days until the deadline, negative when overdue
    pub fn days_to_deadline(&self, now: DateTime<Utc>) -> i64 {
        self.deadline_date.signed_duration_since(now).num_days()
    }

    /// Whole days since identification
    pub fn days_in_workflow(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.identified_date).num_days()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
