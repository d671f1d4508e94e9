//! Workflow records correlated to a gap: outreach plans, interventions
//! and closure verifications.

use crate::{
    Barrier, ClosureMethod, ContactChannel, ContactOutcome, CoordinatorId, GapId, InterventionId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Outreach Plan ────────────────────────────────────────────────────

/// Planned contact strategy for a gap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutreachPlan {
    pub gap_id: GapId,
    pub optimal_contact_time: DateTime<Utc>,
    pub preferred_channel: ContactChannel,
    pub language_preference: String,
    pub script_template: String,
    /// Snapshot of earlier contacts with the same member, newest first
    #[serde(default)]
    pub prior_contact_history: Vec<ContactHistoryEntry>,
    #[serde(default)]
    pub barriers: Vec<Barrier>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// One earlier contact attempt as seen at planning time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactHistoryEntry {
    pub gap_id: GapId,
    pub contact_date: DateTime<Utc>,
    pub contact_method: ContactChannel,
    pub contact_outcome: ContactOutcome,
}

impl From<&Intervention> for ContactHistoryEntry {
    fn from(intervention: &Intervention) -> Self {
        Self {
            gap_id: intervention.gap_id.clone(),
            contact_date: intervention.contact_date,
            contact_method: intervention.contact_method,
            contact_outcome: intervention.contact_outcome.clone(),
        }
    }
}

// ── Intervention ─────────────────────────────────────────────────────

/// A single logged contact attempt. Never edited after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub intervention_id: InterventionId,
    pub gap_id: GapId,
    pub coordinator_id: CoordinatorId,
    pub contact_date: DateTime<Utc>,
    pub contact_method: ContactChannel,
    pub contact_outcome: ContactOutcome,
    pub conversation_notes: String,
    #[serde(default)]
    pub barriers_identified: Vec<Barrier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_reason: Option<String>,
    pub escalation_triggered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,
}

// ── Closure Verification ─────────────────────────────────────────────

/// Evidence that a gap's action was completed or excluded
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClosureVerification {
    pub gap_id: GapId,
    pub closure_date: DateTime<Utc>,
    pub closure_method: ClosureMethod,
    pub verification_source: String,
    pub verified_by: String,
    pub supervisor_approval: bool,
    pub exclusion_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_reason: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl ClosureVerification {
    /// Closure evidence strong enough to skip supervisor review
    pub fn is_auto_close(method: ClosureMethod, exclusion_applied: bool) -> bool {
        method.is_automatic_evidence() && !exclusion_applied
    }
}
