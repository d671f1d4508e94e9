//! In-memory gap registry
//!
//! Each gap and its records live in one map entry, so a commit holds a
//! single shard lock and readers never observe half of a transition.

use crate::error::{RegistryError, Result};
use crate::query::GapQuery;
use crate::store::{GapReader, GapStore, GapTransition, TransitionRecord};
use async_trait::async_trait;
use caregap_types::{
    ClosureVerification, Gap, GapId, GapStatus, Intervention, MemberId, OutreachPlan,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

#[derive(Clone, Debug)]
struct GapEntry {
    gap: Gap,
    plan: Option<OutreachPlan>,
    interventions: Vec<Intervention>,
    verification: Option<ClosureVerification>,
}

impl GapEntry {
    fn last_contact(&self) -> DateTime<Utc> {
        self.interventions
            .iter()
            .map(|i| i.contact_date)
            .max()
            .unwrap_or(self.gap.identified_date)
    }
}

/// In-memory gap registry
pub struct InMemoryGapStore {
    entries: DashMap<GapId, GapEntry>,
    by_member: DashMap<MemberId, Vec<GapId>>,
}

impl InMemoryGapStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            by_member: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryGapStore {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(interventions: &mut [Intervention]) {
    interventions.sort_by(|a, b| b.contact_date.cmp(&a.contact_date));
}

#[async_trait]
impl GapReader for InMemoryGapStore {
    async fn get_gap(&self, id: &GapId) -> Result<Option<Gap>> {
        Ok(self.entries.get(id).map(|e| e.gap.clone()))
    }

    async fn outreach_plan(&self, id: &GapId) -> Result<Option<OutreachPlan>> {
        Ok(self.entries.get(id).and_then(|e| e.plan.clone()))
    }

    async fn interventions(&self, id: &GapId) -> Result<Vec<Intervention>> {
        Ok(self
            .entries
            .get(id)
            .map(|e| e.interventions.clone())
            .unwrap_or_default())
    }

    async fn interventions_for_member(&self, member: &MemberId) -> Result<Vec<Intervention>> {
        let gap_ids = self
            .by_member
            .get(member)
            .map(|ids| ids.value().clone())
            .unwrap_or_default();

        let mut result = Vec::new();
        for id in &gap_ids {
            if let Some(entry) = self.entries.get(id) {
                result.extend(entry.interventions.iter().cloned());
            }
        }
        newest_first(&mut result);
        Ok(result)
    }

    async fn verification(&self, id: &GapId) -> Result<Option<ClosureVerification>> {
        Ok(self.entries.get(id).and_then(|e| e.verification.clone()))
    }

    async fn query(&self, query: &GapQuery) -> Result<Vec<Gap>> {
        let mut gaps: Vec<Gap> = self
            .entries
            .iter()
            .filter(|e| query.matches(&e.gap))
            .map(|e| e.gap.clone())
            .collect();

        gaps.sort_by(|a, b| {
            b.priority_score
                .total_cmp(&a.priority_score)
                .then_with(|| a.identified_date.cmp(&b.identified_date))
                .then_with(|| a.gap_id.cmp(&b.gap_id))
        });
        if let Some(limit) = query.limit {
            gaps.truncate(limit);
        }
        Ok(gaps)
    }

    async fn escalated_interventions(&self) -> Result<Vec<Intervention>> {
        let mut result: Vec<Intervention> = self
            .entries
            .iter()
            .flat_map(|e| {
                e.interventions
                    .iter()
                    .filter(|i| i.escalation_triggered)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        newest_first(&mut result);
        Ok(result)
    }

    async fn stale_in_progress(
        &self,
        threshold: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<Gap>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.gap.status == GapStatus::InterventionInProgress)
            .filter(|e| now.signed_duration_since(e.last_contact()) > threshold)
            .map(|e| e.gap.clone())
            .collect())
    }
}

#[async_trait]
impl GapStore for InMemoryGapStore {
    async fn insert_gap(&self, gap: Gap) -> Result<()> {
        let id = gap.gap_id.clone();
        let member = gap.member_id.clone();

        match self.entries.entry(id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(RegistryError::GapAlreadyExists(id));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(GapEntry {
                    gap,
                    plan: None,
                    interventions: Vec::new(),
                    verification: None,
                });
            }
        }

        // Index by member
        self.by_member.entry(member).or_default().push(id.clone());
        debug!(gap_id = %id, "Gap inserted");
        Ok(())
    }

    async fn commit(&self, transition: GapTransition) -> Result<()> {
        let gap_id = transition.gap.gap_id.clone();
        if let Some(record_gap) = transition.record_gap_id() {
            if record_gap != &gap_id {
                return Err(RegistryError::MismatchedRecord {
                    gap: gap_id,
                    record: record_gap.clone(),
                });
            }
        }

        let mut entry = self
            .entries
            .get_mut(&gap_id)
            .ok_or_else(|| RegistryError::GapNotFound(gap_id.clone()))?;

        if matches!(transition.record, TransitionRecord::Verification(_))
            && entry.verification.is_some()
        {
            return Err(RegistryError::VerificationAlreadyRecorded(gap_id));
        }

        let GapTransition { gap, record } = transition;
        entry.gap = gap;
        match record {
            TransitionRecord::StatusOnly => {}
            TransitionRecord::OutreachPlan(plan) => entry.plan = Some(plan),
            TransitionRecord::Intervention(intervention) => entry.interventions.push(intervention),
            TransitionRecord::Verification(verification) => {
                entry.verification = Some(verification)
            }
        }

        debug!(gap_id = %gap_id, status = %entry.gap.status, "Transition committed");
        Ok(())
    }
}
