//! Lifecycle status, urgency and priority classifications

use serde::{Deserialize, Serialize};

// ── Gap Status ───────────────────────────────────────────────────────

/// Lifecycle status of a care gap
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GapStatus {
    /// Detected, not yet routed to a coordinator
    #[default]
    Identified,
    /// Routed to a coordinator
    Assigned,
    /// Outreach plan computed
    OutreachPlanned,
    /// At least one contact attempt without reaching the member
    ContactAttempted,
    /// Member reached, intervention under way
    InterventionInProgress,
    /// Closure evidence submitted, awaiting supervisor approval
    PendingVerification,
    /// Closed with verified evidence
    Closed,
    /// Excluded from the measure with approval
    Excluded,
    /// Paused by the stale-contact policy; still accepts interventions
    LostToFollowup,
}

impl GapStatus {
    pub const ALL: [GapStatus; 9] = [
        GapStatus::Identified,
        GapStatus::Assigned,
        GapStatus::OutreachPlanned,
        GapStatus::ContactAttempted,
        GapStatus::InterventionInProgress,
        GapStatus::PendingVerification,
        GapStatus::Closed,
        GapStatus::Excluded,
        GapStatus::LostToFollowup,
    ];

    /// Human-readable stage label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Identified => "Identified",
            Self::Assigned => "Assigned",
            Self::OutreachPlanned => "Outreach Planned",
            Self::ContactAttempted => "Contact Attempted",
            Self::InterventionInProgress => "Intervention In Progress",
            Self::PendingVerification => "Pending Verification",
            Self::Closed => "Closed",
            Self::Excluded => "Excluded",
            Self::LostToFollowup => "Lost to Follow-up",
        }
    }

    /// Closed and Excluded are final. LostToFollowup is not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Excluded)
    }

    /// Still counts against a coordinator's workload
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for GapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Urgency ──────────────────────────────────────────────────────────

/// Deadline-proximity classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Urgency {
    /// Less than 30 days to deadline
    Critical,
    /// 30-59 days
    High,
    /// 60-89 days
    Medium,
    /// 90 days or more
    Low,
}

impl Urgency {
    /// Classify by whole days remaining until the deadline.
    ///
    /// Overdue gaps (negative days) are critical.
    pub fn from_days_to_deadline(days: i64) -> Self {
        if days < 30 {
            Self::Critical
        } else if days < 60 {
            Self::High
        } else if days < 90 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Fixed urgency score used in the priority blend
    pub fn score(&self) -> f64 {
        match self {
            Self::Critical => 1.0,
            Self::High => 0.75,
            Self::Medium => 0.5,
            Self::Low => 0.25,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Priority ─────────────────────────────────────────────────────────

/// Blended value and urgency tier driving coordinator work queues
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    pub const TIER_TOLERANCE: f64 = 1e-9;

    /// Partition a priority score into tiers.
    ///
    /// Thresholds: P1 >= 0.8, P2 >= 0.6, P3 >= 0.4, otherwise P4. Scores
    /// within [`Priority::TIER_TOLERANCE`] below a threshold count as on it,
    /// so blended scores like `0.1 + 0.7` keep their tier.
    pub fn from_score(score: f64) -> Self {
        let score = score + Self::TIER_TOLERANCE;
        if score >= 0.8 {
            Self::P1
        } else if score >= 0.6 {
            Self::P2
        } else if score >= 0.4 {
            Self::P3
        } else {
            Self::P4
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_boundaries() {
        assert_eq!(Urgency::from_days_to_deadline(-5), Urgency::Critical);
        assert_eq!(Urgency::from_days_to_deadline(0), Urgency::Critical);
        assert_eq!(Urgency::from_days_to_deadline(29), Urgency::Critical);
        assert_eq!(Urgency::from_days_to_deadline(30), Urgency::High);
        assert_eq!(Urgency::from_days_to_deadline(59), Urgency::High);
        assert_eq!(Urgency::from_days_to_deadline(60), Urgency::Medium);
        assert_eq!(Urgency::from_days_to_deadline(89), Urgency::Medium);
        assert_eq!(Urgency::from_days_to_deadline(90), Urgency::Low);
        assert_eq!(Urgency::from_days_to_deadline(400), Urgency::Low);
    }

    #[test]
    fn test_urgency_scores() {
        assert_eq!(Urgency::Critical.score(), 1.0);
        assert_eq!(Urgency::High.score(), 0.75);
        assert_eq!(Urgency::Medium.score(), 0.5);
        assert_eq!(Urgency::Low.score(), 0.25);
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(Priority::from_score(1.0), Priority::P1);
        assert_eq!(Priority::from_score(0.8), Priority::P1);
        assert_eq!(Priority::from_score(0.79), Priority::P2);
        assert_eq!(Priority::from_score(0.6), Priority::P2);
        assert_eq!(Priority::from_score(0.59), Priority::P3);
        assert_eq!(Priority::from_score(0.4), Priority::P3);
        assert_eq!(Priority::from_score(0.39), Priority::P4);
        assert_eq!(Priority::from_score(0.0), Priority::P4);
    }

    #[test]
    fn test_priority_float_error_at_threshold() {
        // 0.1 + 0.7 == 0.7999999999999999 in f64
        assert_eq!(Priority::from_score(0.1 + 0.7), Priority::P1);
        assert_eq!(Priority::from_score(1.4 - 0.8), Priority::P2);
        assert_eq!(Priority::from_score(0.7 - 0.3), Priority::P3);
        assert_eq!(Priority::from_score(0.8 - 1e-6), Priority::P2);
    }

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = GapStatus::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![&GapStatus::Closed, &GapStatus::Excluded]);
        assert!(GapStatus::LostToFollowup.is_open());
        assert_eq!(GapStatus::default(), GapStatus::Identified);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(GapStatus::LostToFollowup.to_string(), "Lost to Follow-up");
        assert_eq!(
            GapStatus::InterventionInProgress.to_string(),
            "Intervention In Progress"
        );
    }
}
