//! Follow-up scheduling and escalation rules for logged contacts
//!
//! Neither rule blocks anything. They only decide what gets recorded on
//! the intervention for the engine to commit.

use caregap_types::{Barrier, ContactOutcome, Urgency};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;

use crate::config::EscalationConfig;

/// Next contact to schedule after an attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowUp {
    pub date: DateTime<Utc>,
    pub reason: String,
}

/// Reached members need no follow-up; everyone else is retried in 1-3 days
pub fn determine_follow_up(outcome: &ContactOutcome, now: DateTime<Utc>) -> Option<FollowUp> {
    let (days, reason) = match outcome {
        ContactOutcome::Reached => return None,
        ContactOutcome::Voicemail => (2, "Voicemail left, follow up in 2 days"),
        ContactOutcome::NoAnswer => (1, "No answer, try again tomorrow"),
        ContactOutcome::Busy | ContactOutcome::Other(_) => (3, "Follow up in 3 days"),
    };
    Some(FollowUp {
        date: now + Duration::days(days),
        reason: reason.to_string(),
    })
}

/// Decides when a contact needs supervisor attention
#[derive(Clone, Debug, Default)]
pub struct EscalationPolicy {
    config: EscalationConfig,
}

impl EscalationPolicy {
    pub fn new(config: EscalationConfig) -> Self {
        Self { config }
    }

    /// Escalation reason, or `None` when the contact can proceed normally
    pub fn check(
        &self,
        urgency: Urgency,
        outcome: &ContactOutcome,
        barriers: &[Barrier],
    ) -> Option<String> {
        if urgency == Urgency::Critical && !outcome.is_reached() {
            return Some("Critical gap, multiple failed contact attempts".to_string());
        }

        let distinct: BTreeSet<&Barrier> = barriers.iter().collect();
        if distinct.len() >= self.config.barrier_threshold {
            return Some("Multiple barriers identified, requires supervisor support".to_string());
        }

        None
    }
}
