//! Inbound records supplied by callers at identification and planning.
//!
//! Every field is optional. Accessors resolve missing values to the
//! documented defaults so downstream code never branches on absence.

use crate::{CoordinatorId, ContactChannel};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_AGE: f64 = 65.0;
pub const DEFAULT_RISK_SCORE: f64 = 0.5;
pub const DEFAULT_PRIOR_YEAR_COMPLIANCE: f64 = 0.75;
pub const DEFAULT_ZIP_CODE: &str = "00000";
pub const DEFAULT_EDUCATION_LEVEL: &str = "Unknown";
pub const DEFAULT_DAYS_SINCE_VISIT: i64 = 365;
pub const DEFAULT_PCP_QUALITY_SCORE: f64 = 3.5;
pub const DEFAULT_PCP_PATIENT_COUNT: f64 = 1000.0;
pub const DEFAULT_DISTANCE_MILES: f64 = 10.0;
pub const MIN_UTC_OFFSET_HOURS: i64 = -12;
pub const MAX_UTC_OFFSET_HOURS: i64 = 14;
pub const DEFAULT_RESPONSE_RATE: f64 = 0.5;
pub const DEFAULT_NO_SHOW_RATE: f64 = 0.1;
pub const DEFAULT_BEST_CONTACT_HOUR: u32 = 10;
pub const DEFAULT_COORDINATOR_ACTIVE_GAPS: f64 = 50.0;
pub const DEFAULT_COORDINATOR_CLOSURE_RATE: f64 = 0.75;

// ── Member ───────────────────────────────────────────────────────────

/// Member characteristics and contact preferences
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberProfile {
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub risk_score: Option<f64>,
    pub chronic_conditions: Vec<String>,
    pub prior_year_compliance_rate: Option<f64>,
    pub member_since: Option<DateTime<Utc>>,
    pub zip_code: Option<String>,
    pub education_level: Option<String>,
    pub last_visit_date: Option<DateTime<Utc>>,
    pub pcp: PcpProfile,
    pub distance_to_facility: Option<f64>,
    /// Hours to shift the base contact hour for the member's timezone
    pub timezone_offset: Option<i64>,
    pub prefers_sms: bool,
    pub prefers_email: bool,
    pub prefers_mail: bool,
    pub language_preference: Option<String>,
    pub transportation_issues: bool,
    pub language_barrier: bool,
    pub financial_concerns: bool,
    pub health_literacy: bool,
}

impl MemberProfile {
    pub fn age(&self) -> f64 {
        self.age.unwrap_or(DEFAULT_AGE)
    }

    pub fn risk_score(&self) -> f64 {
        self.risk_score.unwrap_or(DEFAULT_RISK_SCORE)
    }

    pub fn prior_year_compliance(&self) -> f64 {
        self.prior_year_compliance_rate
            .unwrap_or(DEFAULT_PRIOR_YEAR_COMPLIANCE)
    }

    /// Enrollment date, one year before `now` when unknown
    pub fn member_since_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.member_since.unwrap_or(now - Duration::days(365))
    }

    pub fn zip_code(&self) -> &str {
        self.zip_code.as_deref().unwrap_or(DEFAULT_ZIP_CODE)
    }

    pub fn education_level(&self) -> &str {
        self.education_level
            .as_deref()
            .unwrap_or(DEFAULT_EDUCATION_LEVEL)
    }

    /// Days since the last visit, 365 when no visit is on record
    pub fn days_since_last_visit(&self, now: DateTime<Utc>) -> i64 {
        self.last_visit_date
            .map(|visit| now.signed_duration_since(visit).num_days())
            .unwrap_or(DEFAULT_DAYS_SINCE_VISIT)
    }

    pub fn distance_to_facility(&self) -> f64 {
        self.distance_to_facility.unwrap_or(DEFAULT_DISTANCE_MILES)
    }

    /// Whole-hour UTC offset, clamped to the real range of -12..=+14
    pub fn timezone_offset(&self) -> i64 {
        self.timezone_offset
            .unwrap_or(0)
            .clamp(MIN_UTC_OFFSET_HOURS, MAX_UTC_OFFSET_HOURS)
    }

    pub fn has_condition(&self, condition: &str) -> bool {
        self.chronic_conditions.iter().any(|c| c == condition)
    }
}

/// Primary care provider characteristics
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcpProfile {
    pub quality_score: Option<f64>,
    pub patient_count: Option<f64>,
}

impl PcpProfile {
    pub fn quality_score(&self) -> f64 {
        self.quality_score.unwrap_or(DEFAULT_PCP_QUALITY_SCORE)
    }

    pub fn patient_count(&self) -> f64 {
        self.patient_count.unwrap_or(DEFAULT_PCP_PATIENT_COUNT)
    }
}

// ── Engagement ───────────────────────────────────────────────────────

/// How the member has engaged with the plan historically
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementProfile {
    pub portal_logins_last_90_days: Option<u32>,
    pub outreach_history: Vec<OutreachRecord>,
    pub appointment_history: Vec<AppointmentRecord>,
    pub preferred_contact_channel: Option<ContactChannel>,
    pub best_contact_hour: Option<u32>,
}

impl EngagementProfile {
    pub fn portal_logins(&self) -> u32 {
        self.portal_logins_last_90_days.unwrap_or(0)
    }

    /// Share of past outreach the member responded to
    pub fn response_rate(&self) -> f64 {
        if self.outreach_history.is_empty() {
            return DEFAULT_RESPONSE_RATE;
        }
        let responded = self.outreach_history.iter().filter(|o| o.responded).count();
        responded as f64 / self.outreach_history.len() as f64
    }

    /// Share of past appointments missed
    pub fn no_show_rate(&self) -> f64 {
        if self.appointment_history.is_empty() {
            return DEFAULT_NO_SHOW_RATE;
        }
        let no_shows = self.appointment_history.iter().filter(|a| a.no_show).count();
        no_shows as f64 / self.appointment_history.len() as f64
    }

    pub fn preferred_channel(&self) -> ContactChannel {
        self.preferred_contact_channel.unwrap_or_default()
    }

    pub fn best_contact_hour(&self) -> u32 {
        self.best_contact_hour.unwrap_or(DEFAULT_BEST_CONTACT_HOUR)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutreachRecord {
    pub responded: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentRecord {
    pub no_show: bool,
}

// ── Operational ──────────────────────────────────────────────────────

/// Operational factors around the gap
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationalContext {
    pub coordinators: HashMap<CoordinatorId, CoordinatorStats>,
    pub planned_intervention_type: Option<ContactChannel>,
}

impl OperationalContext {
    pub fn coordinator(&self, id: Option<&CoordinatorId>) -> CoordinatorStats {
        id.and_then(|id| self.coordinators.get(id))
            .cloned()
            .unwrap_or_default()
    }

    pub fn planned_intervention(&self) -> ContactChannel {
        self.planned_intervention_type.unwrap_or_default()
    }
}

/// Workload and performance of one coordinator
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorStats {
    pub active_gaps: Option<f64>,
    pub closure_rate: Option<f64>,
}

impl CoordinatorStats {
    pub fn active_gaps(&self) -> f64 {
        self.active_gaps.unwrap_or(DEFAULT_COORDINATOR_ACTIVE_GAPS)
    }

    pub fn closure_rate(&self) -> f64 {
        self.closure_rate.unwrap_or(DEFAULT_COORDINATOR_CLOSURE_RATE)
    }
}

// ── Gap Context ──────────────────────────────────────────────────────

/// Everything a caller knows about a gap at identification time
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapContext {
    pub member: MemberProfile,
    pub engagement: EngagementProfile,
    pub operational: OperationalContext,
    /// Free-form metadata copied onto the gap
    pub attributes: HashMap<String, String>,
}

impl GapContext {
    pub fn with_member(mut self, member: MemberProfile) -> Self {
        self.member = member;
        self
    }

    pub fn with_engagement(mut self, engagement: EngagementProfile) -> Self {
        self.engagement = engagement;
        self
    }

    pub fn with_operational(mut self, operational: OperationalContext) -> Self {
        self.operational = operational;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
