//! Inputs and outputs of workflow stages

use caregap_types::{ClosureMethod, ClosureVerification, Gap, Intervention, OutreachPlan};
use serde::{Deserialize, Serialize};

/// Evidence submitted to close or exclude a gap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClosureRequest {
    pub method: ClosureMethod,
    pub verification_source: String,
    pub verified_by: String,
    #[serde(default)]
    pub supervisor_approval: bool,
    #[serde(default)]
    pub exclusion_applied: bool,
    #[serde(default)]
    pub exclusion_reason: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl ClosureRequest {
    pub fn new(
        method: ClosureMethod,
        verification_source: impl Into<String>,
        verified_by: impl Into<String>,
    ) -> Self {
        Self {
            method,
            verification_source: verification_source.into(),
            verified_by: verified_by.into(),
            supervisor_approval: false,
            exclusion_applied: false,
            exclusion_reason: None,
            notes: String::new(),
        }
    }

    pub fn with_supervisor_approval(mut self) -> Self {
        self.supervisor_approval = true;
        self
    }

    pub fn with_exclusion(mut self, reason: impl Into<String>) -> Self {
        self.exclusion_applied = true;
        self.exclusion_reason = Some(reason.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Result of a verification attempt
#[derive(Clone, Debug, PartialEq)]
pub enum ClosureOutcome {
    /// Evidence accepted; the gap is CLOSED or EXCLUDED
    Verified(ClosureVerification),
    /// Supervisor approval is required; the gap is PENDING_VERIFICATION
    PendingApproval,
}

impl ClosureOutcome {
    pub fn verification(&self) -> Option<&ClosureVerification> {
        match self {
            Self::Verified(v) => Some(v),
            Self::PendingApproval => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingApproval)
    }
}

/// Everything recorded about one gap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapWorkflowSnapshot {
    pub gap: Gap,
    pub outreach_plan: Option<OutreachPlan>,
    pub interventions: Vec<Intervention>,
    pub verification: Option<ClosureVerification>,
    pub current_stage: String,
    pub days_in_workflow: i64,
}
