//! Combinable gap filters for readers

use caregap_types::{CoordinatorId, Gap, GapStatus, MeasureId, MemberId, Priority, Urgency};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filter over gaps. Unset fields match everything; set fields are
/// combined with AND. Date ranges are inclusive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GapQuery {
    pub coordinator: Option<CoordinatorId>,
    /// Any of these statuses; empty matches all
    pub statuses: Vec<GapStatus>,
    pub urgency: Option<Urgency>,
    pub priority: Option<Priority>,
    pub identified_from: Option<DateTime<Utc>>,
    pub identified_to: Option<DateTime<Utc>>,
    pub deadline_from: Option<DateTime<Utc>>,
    pub deadline_to: Option<DateTime<Utc>>,
    pub member: Option<MemberId>,
    pub measure: Option<MeasureId>,
    pub limit: Option<usize>,
}

impl GapQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_coordinator(mut self, coordinator: CoordinatorId) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    pub fn with_status(mut self, status: GapStatus) -> Self {
        self.statuses.push(status);
        self
    }

    /// Restrict to gaps that are not CLOSED or EXCLUDED
    pub fn open_only(mut self) -> Self {
        self.statuses = GapStatus::ALL
            .iter()
            .copied()
            .filter(|s| !s.is_terminal())
            .collect();
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn identified_between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.identified_from = Some(from);
        self.identified_to = Some(to);
        self
    }

    pub fn deadline_between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.deadline_from = Some(from);
        self.deadline_to = Some(to);
        self
    }

    pub fn for_member(mut self, member: MemberId) -> Self {
        self.member = Some(member);
        self
    }

    pub fn for_measure(mut self, measure: MeasureId) -> Self {
        self.measure = Some(measure);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, gap: &Gap) -> bool {
        if let Some(coordinator) = &self.coordinator {
            if gap.assigned_coordinator.as_ref() != Some(coordinator) {
                return false;
            }
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&gap.status) {
            return false;
        }
        if self.urgency.is_some_and(|u| u != gap.urgency) {
            return false;
        }
        if self.priority.is_some_and(|p| p != gap.priority) {
            return false;
        }
        if !within(gap.identified_date, self.identified_from, self.identified_to) {
            return false;
        }
        if !within(gap.deadline_date, self.deadline_from, self.deadline_to) {
            return false;
        }
        if self.member.as_ref().is_some_and(|m| m != &gap.member_id) {
            return false;
        }
        if self.measure.as_ref().is_some_and(|m| m != &gap.measure_id) {
            return false;
        }
        true
    }
}

fn within(at: DateTime<Utc>, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    from.map_or(true, |from| at >= from) && to.map_or(true, |to| at <= to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caregap_types::{GapId, GapReason, ProbabilitySource};
    use chrono::Duration;
    use std::collections::HashMap;

    fn gap(now: DateTime<Utc>) -> Gap {
        Gap {
            gap_id: GapId::new("GAP-M1-HBA1C-1"),
            member_id: MemberId::new("M1"),
            measure_id: MeasureId::new("HBA1C"),
            gap_reason: GapReason::NotScheduled,
            identified_date: now,
            deadline_date: now + Duration::days(10),
            urgency: Urgency::Critical,
            priority: Priority::P2,
            priority_score: 0.7,
            value_score: 0.9,
            closure_probability: 0.7,
            probability_source: ProbabilitySource::Heuristic,
            assigned_coordinator: Some(CoordinatorId::new("COORD002")),
            status: GapStatus::Assigned,
            metadata: HashMap::new(),
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(GapQuery::new().matches(&gap(Utc::now())));
    }

    #[test]
    fn test_filters_combine() {
        let now = Utc::now();
        let g = gap(now);

        let hit = GapQuery::new()
            .for_coordinator(CoordinatorId::new("COORD002"))
            .with_urgency(Urgency::Critical)
            .for_member(MemberId::new("M1"))
            .deadline_between(now, now + Duration::days(30));
        assert!(hit.matches(&g));

        let miss = hit.clone().for_measure(MeasureId::new("BP"));
        assert!(!miss.matches(&g));
    }

    #[test]
    fn test_status_and_date_filters() {
        let now = Utc::now();
        let g = gap(now);

        assert!(GapQuery::new().open_only().matches(&g));
        assert!(!GapQuery::new().with_status(GapStatus::Closed).matches(&g));
        assert!(GapQuery::new()
            .with_status(GapStatus::Closed)
            .with_status(GapStatus::Assigned)
            .matches(&g));
        assert!(!GapQuery::new()
            .identified_between(now + Duration::days(1), now + Duration::days(2))
            .matches(&g));
        assert!(!GapQuery::new().with_priority(Priority::P1).matches(&g));
    }
}
