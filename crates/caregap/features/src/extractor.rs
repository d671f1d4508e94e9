//! Feature extractor: member, clinical, engagement and operational groups

use crate::names::*;
use crate::FeatureVector;
use caregap_types::{
    ContactChannel, CoordinatorId, EngagementProfile, GapContext, GapReason, MeasureId,
    MemberProfile, OperationalContext,
};
use chrono::{DateTime, Datelike, Utc};

const PREVENTIVE_MEASURES: [&str; 3] = ["COL", "MAM", "CCS"];
const CHRONIC_MEASURES: [&str; 2] = ["HBA1C", "BP"];

/// Facts about the gap itself that feed the clinical and operational groups
#[derive(Clone, Copy, Debug)]
pub struct GapFacts<'a> {
    pub measure_id: &'a MeasureId,
    pub gap_reason: &'a GapReason,
    pub deadline: DateTime<Utc>,
    pub assigned_coordinator: Option<&'a CoordinatorId>,
}

/// Stateless feature extractor
#[derive(Clone, Debug, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Build the complete feature vector for one gap
    pub fn create_feature_vector(
        &self,
        facts: &GapFacts<'_>,
        context: &GapContext,
        now: DateTime<Utc>,
    ) -> FeatureVector {
        let mut features = FeatureVector::new();
        features.extend(self.extract_member_characteristics(&context.member, now));
        features.extend(self.extract_clinical_factors(facts, &context.member, now));
        features.extend(self.extract_engagement_factors(&context.engagement));
        features.extend(self.extract_operational_factors(facts, &context.operational, now));
        features
    }

    /// Demographics, risk, chronic conditions, compliance, tenure and
    /// socioeconomic indicators
    pub fn extract_member_characteristics(
        &self,
        member: &MemberProfile,
        now: DateTime<Utc>,
    ) -> FeatureVector {
        let mut f = FeatureVector::new();

        let age = member.age();
        f.insert(AGE, age);
        f.insert_flag(AGE_GROUP_18_49, age < 50.0);
        f.insert_flag(AGE_GROUP_50_64, (50.0..65.0).contains(&age));
        f.insert_flag(AGE_GROUP_65_74, (65.0..75.0).contains(&age));
        f.insert_flag(AGE_GROUP_75_PLUS, age >= 75.0);
        f.insert_flag(GENDER_MALE, member.gender.as_deref() == Some("Male"));
        f.insert_flag(GENDER_FEMALE, member.gender.as_deref() == Some("Female"));

        let risk = member.risk_score();
        f.insert(RISK_SCORE, risk);
        f.insert_flag(RISK_SCORE_HIGH, risk > 0.7);
        f.insert_flag(RISK_SCORE_MEDIUM, (0.3..=0.7).contains(&risk));
        f.insert_flag(RISK_SCORE_LOW, risk < 0.3);

        f.insert(CHRONIC_CONDITIONS_COUNT, member.chronic_conditions.len() as f64);
        f.insert_flag(HAS_DIABETES, member.has_condition("Diabetes"));
        f.insert_flag(HAS_HYPERTENSION, member.has_condition("Hypertension"));
        f.insert_flag(HAS_COPD, member.has_condition("COPD"));

        let compliance = member.prior_year_compliance();
        f.insert(PRIOR_YEAR_COMPLIANCE, compliance);
        f.insert_flag(PRIOR_YEAR_COMPLIANCE_HIGH, compliance > 0.8);

        let tenure_years =
            now.signed_duration_since(member.member_since_or(now)).num_days() as f64 / 365.0;
        f.insert(MEMBER_TENURE_YEARS, tenure_years);
        f.insert_flag(MEMBER_TENURE_NEW, tenure_years < 1.0);

        f.insert(ZIP_CODE_PREFIX, zip_prefix(member.zip_code()));
        f.insert_flag(EDUCATION_HIGH_SCHOOL, member.education_level() == "High School");
        f.insert_flag(EDUCATION_COLLEGE, member.education_level() == "College");

        f
    }

    /// Measure type, gap severity and reason, visit recency, PCP and distance
    pub fn extract_clinical_factors(
        &self,
        facts: &GapFacts<'_>,
        member: &MemberProfile,
        now: DateTime<Utc>,
    ) -> FeatureVector {
        let mut f = FeatureVector::new();

        let measure = facts.measure_id.as_str();
        f.insert_flag(MEASURE_TYPE_PREVENTIVE, PREVENTIVE_MEASURES.contains(&measure));
        f.insert_flag(MEASURE_TYPE_CHRONIC, CHRONIC_MEASURES.contains(&measure));

        let reason = facts.gap_reason;
        f.insert_flag(GAP_SEVERITY_LOW, matches!(reason, GapReason::LabPending));
        f.insert_flag(GAP_SEVERITY_MEDIUM, matches!(reason, GapReason::NotScheduled));
        f.insert_flag(
            GAP_SEVERITY_HIGH,
            matches!(
                reason,
                GapReason::MissedAppointment | GapReason::ProviderDelay
            ),
        );
        f.insert_flag(REASON_LAB_PENDING, matches!(reason, GapReason::LabPending));
        f.insert_flag(REASON_NOT_SCHEDULED, matches!(reason, GapReason::NotScheduled));
        f.insert_flag(
            REASON_MISSED_APPOINTMENT,
            matches!(reason, GapReason::MissedAppointment),
        );
        f.insert_flag(REASON_PROVIDER_DELAY, matches!(reason, GapReason::ProviderDelay));

        let days_since_visit = member.days_since_last_visit(now);
        f.insert(DAYS_SINCE_LAST_VISIT, days_since_visit as f64);
        f.insert_flag(RECENT_VISIT, days_since_visit < 90);

        let pcp_quality = member.pcp.quality_score();
        f.insert(PCP_QUALITY_SCORE, pcp_quality);
        f.insert_flag(PCP_HIGH_QUALITY, pcp_quality > 4.0);
        f.insert(PCP_PATIENT_COUNT, member.pcp.patient_count());

        let distance = member.distance_to_facility();
        f.insert(DISTANCE_TO_FACILITY_MILES, distance);
        f.insert_flag(DISTANCE_CLOSE, distance < 5.0);
        f.insert_flag(DISTANCE_FAR, distance > 20.0);

        f
    }

    /// Portal usage, responsiveness, no-shows, channel and contact hour
    pub fn extract_engagement_factors(&self, engagement: &EngagementProfile) -> FeatureVector {
        let mut f = FeatureVector::new();

        let logins = engagement.portal_logins();
        f.insert(PORTAL_LOGINS_LAST_90_DAYS, logins as f64);
        f.insert_flag(PORTAL_ACTIVE_USER, logins > 5);

        let response_rate = engagement.response_rate();
        f.insert(OUTREACH_RESPONSE_RATE, response_rate);
        f.insert_flag(HIGH_RESPONSE_RATE, response_rate > 0.7);

        let no_show_rate = engagement.no_show_rate();
        f.insert(NO_SHOW_RATE, no_show_rate);
        f.insert_flag(LOW_NO_SHOW_RATE, no_show_rate < 0.2);

        let channel = engagement.preferred_channel();
        f.insert_flag(PREFERS_PHONE, channel == ContactChannel::Phone);
        f.insert_flag(PREFERS_SMS, channel == ContactChannel::Sms);
        f.insert_flag(PREFERS_EMAIL, channel == ContactChannel::Email);

        let hour = engagement.best_contact_hour();
        f.insert(BEST_CONTACT_HOUR, hour as f64);
        f.insert_flag(BEST_CONTACT_MORNING, (8..12).contains(&hour));
        f.insert_flag(BEST_CONTACT_AFTERNOON, (12..17).contains(&hour));

        f
    }

    /// Coordinator workload, planned intervention, season and deadline
    pub fn extract_operational_factors(
        &self,
        facts: &GapFacts<'_>,
        operational: &OperationalContext,
        now: DateTime<Utc>,
    ) -> FeatureVector {
        let mut f = FeatureVector::new();

        let stats = operational.coordinator(facts.assigned_coordinator);
        f.insert(COORDINATOR_ACTIVE_GAPS, stats.active_gaps());
        f.insert_flag(COORDINATOR_WORKLOAD_HIGH, stats.active_gaps() > 75.0);
        f.insert(COORDINATOR_CLOSURE_RATE, stats.closure_rate());
        f.insert_flag(COORDINATOR_HIGH_PERFORMER, stats.closure_rate() > 0.85);

        let planned = operational.planned_intervention();
        f.insert_flag(INTERVENTION_PHONE, planned == ContactChannel::Phone);
        f.insert_flag(INTERVENTION_SMS, planned == ContactChannel::Sms);
        f.insert_flag(INTERVENTION_EMAIL, planned == ContactChannel::Email);

        let month = now.month();
        f.insert(MONTH, month as f64);
        f.insert_flag(SEASON_SPRING, (3..=5).contains(&month));
        f.insert_flag(SEASON_SUMMER, (6..=8).contains(&month));
        f.insert_flag(SEASON_FALL, (9..=11).contains(&month));
        f.insert_flag(SEASON_WINTER, matches!(month, 12 | 1 | 2));

        let days_until = facts.deadline.signed_duration_since(now).num_days();
        f.insert(DAYS_UNTIL_DEADLINE, days_until as f64);
        f.insert_flag(DEADLINE_URGENT, days_until < 30);
        f.insert_flag(DEADLINE_CRITICAL, days_until < 15);

        f
    }
}

/// Leading three digits of a zip code, 0 when not numeric
fn zip_prefix(zip: &str) -> f64 {
    zip.get(..3)
        .and_then(|prefix| prefix.parse::<u32>().ok())
        .map(f64::from)
        .unwrap_or(0.0)
}
