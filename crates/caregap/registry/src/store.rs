//! Reader and store traits

use crate::error::Result;
use crate::query::GapQuery;
use async_trait::async_trait;
use caregap_types::{ClosureVerification, Gap, GapId, Intervention, MemberId, OutreachPlan};
use chrono::{DateTime, Duration, Utc};

/// Read-only view of the registry
#[async_trait]
pub trait GapReader: Send + Sync {
    async fn get_gap(&self, id: &GapId) -> Result<Option<Gap>>;

    async fn outreach_plan(&self, id: &GapId) -> Result<Option<OutreachPlan>>;

    /// Interventions for one gap in the order they were logged
    async fn interventions(&self, id: &GapId) -> Result<Vec<Intervention>>;

    /// Interventions across all of a member's gaps, newest first
    async fn interventions_for_member(&self, member: &MemberId) -> Result<Vec<Intervention>>;

    async fn verification(&self, id: &GapId) -> Result<Option<ClosureVerification>>;

    /// Matching gaps, highest priority score first
    async fn query(&self, query: &GapQuery) -> Result<Vec<Gap>>;

    async fn list_gaps(&self) -> Result<Vec<Gap>> {
        self.query(&GapQuery::new()).await
    }

    /// Interventions that raised an escalation, newest first
    async fn escalated_interventions(&self) -> Result<Vec<Intervention>>;

    /// Gaps in INTERVENTION_IN_PROGRESS whose last contact is older than
    /// `threshold` at `now`
    async fn stale_in_progress(&self, threshold: Duration, now: DateTime<Utc>)
        -> Result<Vec<Gap>>;
}

/// Record written together with a gap update
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionRecord {
    StatusOnly,
    /// Replaces any earlier plan
    OutreachPlan(OutreachPlan),
    /// Appended
    Intervention(Intervention),
    /// At most one per gap
    Verification(ClosureVerification),
}

/// One atomic write: the updated gap and the record that justified it
#[derive(Clone, Debug, PartialEq)]
pub struct GapTransition {
    pub gap: Gap,
    pub record: TransitionRecord,
}

impl GapTransition {
    pub fn status_only(gap: Gap) -> Self {
        Self {
            gap,
            record: TransitionRecord::StatusOnly,
        }
    }

    pub fn with_plan(gap: Gap, plan: OutreachPlan) -> Self {
        Self {
            gap,
            record: TransitionRecord::OutreachPlan(plan),
        }
    }

    pub fn with_intervention(gap: Gap, intervention: Intervention) -> Self {
        Self {
            gap,
            record: TransitionRecord::Intervention(intervention),
        }
    }

    pub fn with_verification(gap: Gap, verification: ClosureVerification) -> Self {
        Self {
            gap,
            record: TransitionRecord::Verification(verification),
        }
    }

    /// Gap id carried by the record, if it has one
    pub fn record_gap_id(&self) -> Option<&GapId> {
        match &self.record {
            TransitionRecord::StatusOnly => None,
            TransitionRecord::OutreachPlan(plan) => Some(&plan.gap_id),
            TransitionRecord::Intervention(intervention) => Some(&intervention.gap_id),
            TransitionRecord::Verification(verification) => Some(&verification.gap_id),
        }
    }
}

/// Write side of the registry. Only the workflow engine holds one.
#[async_trait]
pub trait GapStore: GapReader {
    /// Store a newly identified gap
    async fn insert_gap(&self, gap: Gap) -> Result<()>;

    /// Apply a transition. Validation happens before any write, so a
    /// failed commit leaves the registry untouched.
    async fn commit(&self, transition: GapTransition) -> Result<()>;
}
