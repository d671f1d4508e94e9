//! Outreach plan construction

use caregap_types::{
    Barrier, ContactChannel, ContactHistoryEntry, Gap, Intervention, MemberProfile, OutreachPlan,
};
use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::config::OutreachConfig;

/// Builds outreach plans from member data and prior contacts
#[derive(Clone, Debug, Default)]
pub struct OutreachPlanner {
    config: OutreachConfig,
}

impl OutreachPlanner {
    pub fn new(config: OutreachConfig) -> Self {
        Self { config }
    }

    /// `history` is the member's earlier interventions, newest first
    pub fn plan(
        &self,
        gap: &Gap,
        member: &MemberProfile,
        history: &[Intervention],
        now: DateTime<Utc>,
    ) -> OutreachPlan {
        let barriers = identify_barriers(member);
        let notes = if barriers.is_empty() {
            String::new()
        } else {
            let labels: Vec<&str> = barriers.iter().map(|b| b.label()).collect();
            format!("Address barriers: {}", labels.join(", "))
        };

        OutreachPlan {
            gap_id: gap.gap_id.clone(),
            optimal_contact_time: self.optimal_contact_time(member, now),
            preferred_channel: preferred_channel(member),
            language_preference: member
                .language_preference
                .clone()
                .unwrap_or_else(|| self.config.default_language.clone()),
            script_template: self
                .config
                .script_for(gap.measure_id.as_str(), gap.gap_reason.label())
                .to_string(),
            prior_contact_history: history.iter().map(ContactHistoryEntry::from).collect(),
            barriers,
            notes,
            created_at: now,
        }
    }

    /// Today at the base hour, shifted by the member's timezone offset
    pub fn optimal_contact_time(&self, member: &MemberProfile, now: DateTime<Utc>) -> DateTime<Utc> {
        let base = NaiveTime::from_hms_opt(self.config.base_contact_hour.min(23), 0, 0)
            .unwrap_or_default();
        let at = now.date_naive().and_time(base).and_utc();
        Duration::try_hours(member.timezone_offset())
            .and_then(|shift| at.checked_add_signed(shift))
            .unwrap_or(at)
    }
}

/// SMS, then Email, then Mail; Phone when no preference is recorded
pub fn preferred_channel(member: &MemberProfile) -> ContactChannel {
    if member.prefers_sms {
        ContactChannel::Sms
    } else if member.prefers_email {
        ContactChannel::Email
    } else if member.prefers_mail {
        ContactChannel::Mail
    } else {
        ContactChannel::Phone
    }
}

pub fn identify_barriers(member: &MemberProfile) -> Vec<Barrier> {
    [
        (member.transportation_issues, Barrier::Transportation),
        (member.language_barrier, Barrier::Language),
        (member.financial_concerns, Barrier::Financial),
        (member.health_literacy, Barrier::HealthLiteracy),
    ]
    .into_iter()
    .filter_map(|(present, barrier)| present.then_some(barrier))
    .collect()
}
