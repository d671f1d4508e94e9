//! Feature names shared between the extractor and the estimators

// Member characteristics
pub const AGE: &str = "age";
pub const AGE_GROUP_18_49: &str = "age_group_18_49";
pub const AGE_GROUP_50_64: &str = "age_group_50_64";
pub const AGE_GROUP_65_74: &str = "age_group_65_74";
pub const AGE_GROUP_75_PLUS: &str = "age_group_75_plus";
pub const GENDER_MALE: &str = "gender_male";
pub const GENDER_FEMALE: &str = "gender_female";
pub const RISK_SCORE: &str = "risk_score";
pub const RISK_SCORE_HIGH: &str = "risk_score_high";
pub const RISK_SCORE_MEDIUM: &str = "risk_score_medium";
pub const RISK_SCORE_LOW: &str = "risk_score_low";
pub const CHRONIC_CONDITIONS_COUNT: &str = "chronic_conditions_count";
pub const HAS_DIABETES: &str = "has_diabetes";
pub const HAS_HYPERTENSION: &str = "has_hypertension";
pub const HAS_COPD: &str = "has_copd";
pub const PRIOR_YEAR_COMPLIANCE: &str = "prior_year_compliance";
pub const PRIOR_YEAR_COMPLIANCE_HIGH: &str = "prior_year_compliance_high";
pub const MEMBER_TENURE_YEARS: &str = "member_tenure_years";
pub const MEMBER_TENURE_NEW: &str = "member_tenure_new";
pub const ZIP_CODE_PREFIX: &str = "zip_code_prefix";
pub const EDUCATION_HIGH_SCHOOL: &str = "education_high_school";
pub const EDUCATION_COLLEGE: &str = "education_college";

// Clinical factors
pub const MEASURE_TYPE_PREVENTIVE: &str = "measure_type_preventive";
pub const MEASURE_TYPE_CHRONIC: &str = "measure_type_chronic";
pub const GAP_SEVERITY_LOW: &str = "gap_severity_low";
pub const GAP_SEVERITY_MEDIUM: &str = "gap_severity_medium";
pub const GAP_SEVERITY_HIGH: &str = "gap_severity_high";
pub const REASON_LAB_PENDING: &str = "reason_lab_pending";
pub const REASON_NOT_SCHEDULED: &str = "reason_not_scheduled";
pub const REASON_MISSED_APPOINTMENT: &str = "reason_missed_appointment";
pub const REASON_PROVIDER_DELAY: &str = "reason_provider_delay";
pub const DAYS_SINCE_LAST_VISIT: &str = "days_since_last_visit";
pub const RECENT_VISIT: &str = "recent_visit";
pub const PCP_QUALITY_SCORE: &str = "pcp_quality_score";
pub const PCP_HIGH_QUALITY: &str = "pcp_high_quality";
pub const PCP_PATIENT_COUNT: &str = "pcp_patient_count";
pub const DISTANCE_TO_FACILITY_MILES: &str = "distance_to_facility_miles";
pub const DISTANCE_CLOSE: &str = "distance_close";
pub const DISTANCE_FAR: &str = "distance_far";

// Engagement factors
pub const PORTAL_LOGINS_LAST_90_DAYS: &str = "portal_logins_last_90_days";
pub const PORTAL_ACTIVE_USER: &str = "portal_active_user";
pub const OUTREACH_RESPONSE_RATE: &str = "outreach_response_rate";
pub const HIGH_RESPONSE_RATE: &str = "high_response_rate";
pub const NO_SHOW_RATE: &str = "no_show_rate";
pub const LOW_NO_SHOW_RATE: &str = "low_no_show_rate";
pub const PREFERS_PHONE: &str = "prefers_phone";
pub const PREFERS_SMS: &str = "prefers_sms";
pub const PREFERS_EMAIL: &str = "prefers_email";
pub const BEST_CONTACT_HOUR: &str = "best_contact_hour";
pub const BEST_CONTACT_MORNING: &str = "best_contact_morning";
pub const BEST_CONTACT_AFTERNOON: &str = "best_contact_afternoon";

// Operational factors
pub const COORDINATOR_ACTIVE_GAPS: &str = "coordinator_active_gaps";
pub const COORDINATOR_WORKLOAD_HIGH: &str = "coordinator_workload_high";
pub const COORDINATOR_CLOSURE_RATE: &str = "coordinator_closure_rate";
pub const COORDINATOR_HIGH_PERFORMER: &str = "coordinator_high_performer";
pub const INTERVENTION_PHONE: &str = "intervention_phone";
pub const INTERVENTION_SMS: &str = "intervention_sms";
pub const INTERVENTION_EMAIL: &str = "intervention_email";
pub const MONTH: &str = "month";
pub const SEASON_SPRING: &str = "season_spring";
pub const SEASON_SUMMER: &str = "season_summer";
pub const SEASON_FALL: &str = "season_fall";
pub const SEASON_WINTER: &str = "season_winter";
pub const DAYS_UNTIL_DEADLINE: &str = "days_until_deadline";
pub const DEADLINE_URGENT: &str = "deadline_urgent";
pub const DEADLINE_CRITICAL: &str = "deadline_critical";
