//! Configuration for the workflow engine

use caregap_estimator::EstimatorConfig;
use caregap_types::CoordinatorId;
use serde::{Deserialize, Serialize};

/// Main engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Value and priority scoring
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Coordinator pools and capacity
    #[serde(default)]
    pub assignment: AssignmentConfig,

    /// Outreach planning defaults and scripts
    #[serde(default)]
    pub outreach: OutreachConfig,

    #[serde(default)]
    pub escalation: EscalationConfig,

    /// Closure-probability model
    #[serde(default)]
    pub estimator: EstimatorConfig,

    #[serde(default)]
    pub verification: VerificationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weight of one measure in the value score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureWeight {
    pub measure_id: String,
    pub weight: f64,
}

impl MeasureWeight {
    fn new(measure_id: &str, weight: f64) -> Self {
        Self {
            measure_id: measure_id.to_string(),
            weight,
        }
    }
}

/// Scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_value_base")]
    pub value_base: f64,

    #[serde(default = "default_measure_weights")]
    pub measure_weights: Vec<MeasureWeight>,

    /// Weight for measures not listed above
    #[serde(default = "default_measure_weight")]
    pub default_measure_weight: f64,

    #[serde(default = "default_measure_multiplier")]
    pub measure_multiplier: f64,

    /// Contribution of the member risk score to value
    #[serde(default = "default_risk_weight")]
    pub risk_weight: f64,

    #[serde(default = "default_value_weight")]
    pub value_weight: f64,

    #[serde(default = "default_urgency_weight")]
    pub urgency_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            value_base: default_value_base(),
            measure_weights: default_measure_weights(),
            default_measure_weight: default_measure_weight(),
            measure_multiplier: default_measure_multiplier(),
            risk_weight: default_risk_weight(),
            value_weight: default_value_weight(),
            urgency_weight: default_urgency_weight(),
        }
    }
}

impl ScoringConfig {
    pub fn measure_weight(&self, measure_id: &str) -> f64 {
        self.measure_weights
            .iter()
            .find(|w| w.measure_id == measure_id)
            .map(|w| w.weight)
            .unwrap_or(self.default_measure_weight)
    }
}

/// Coordinator routing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentConfig {
    /// Receives P1 gaps
    #[serde(default = "default_senior_pool")]
    pub senior_pool: Vec<CoordinatorId>,

    /// Receives P2 gaps
    #[serde(default = "default_mid_pool")]
    pub mid_pool: Vec<CoordinatorId>,

    /// Receives P3 and P4 gaps
    #[serde(default = "default_general_pool")]
    pub general_pool: Vec<CoordinatorId>,

    /// Open gaps a coordinator may hold before being skipped
    #[serde(default = "default_max_active")]
    pub max_active_per_coordinator: usize,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            senior_pool: default_senior_pool(),
            mid_pool: default_mid_pool(),
            general_pool: default_general_pool(),
            max_active_per_coordinator: default_max_active(),
        }
    }
}

/// Outreach script keyed by measure and gap reason label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptTemplate {
    pub measure_id: String,
    pub gap_reason: String,
    pub script: String,
}

impl ScriptTemplate {
    fn new(measure_id: &str, gap_reason: &str, script: &str) -> Self {
        Self {
            measure_id: measure_id.to_string(),
            gap_reason: gap_reason.to_string(),
            script: script.to_string(),
        }
    }
}

/// Outreach planning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachConfig {
    /// Contact hour (UTC) before the member timezone shift
    #[serde(default = "default_base_contact_hour")]
    pub base_contact_hour: u32,

    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default = "default_templates")]
    pub templates: Vec<ScriptTemplate>,

    #[serde(default = "default_fallback_template")]
    pub fallback_template: String,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            base_contact_hour: default_base_contact_hour(),
            default_language: default_language(),
            templates: default_templates(),
            fallback_template: default_fallback_template(),
        }
    }
}

impl OutreachConfig {
    pub fn script_for(&self, measure_id: &str, gap_reason: &str) -> &str {
        self.templates
            .iter()
            .find(|t| t.measure_id == measure_id && t.gap_reason == gap_reason)
            .map(|t| t.script.as_str())
            .unwrap_or(&self.fallback_template)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Distinct barriers in one contact that force escalation
    #[serde(default = "default_barrier_threshold")]
    pub barrier_threshold: usize,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            barrier_threshold: default_barrier_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Reject closure of gaps that never had a logged intervention
    #[serde(default)]
    pub require_intervention_history: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_value_base() -> f64 {
    0.5
}

fn default_measure_weights() -> Vec<MeasureWeight> {
    vec![
        MeasureWeight::new("HBA1C", 0.15),
        MeasureWeight::new("BP", 0.12),
        MeasureWeight::new("COL", 0.10),
    ]
}

fn default_measure_weight() -> f64 {
    0.08
}

fn default_measure_multiplier() -> f64 {
    2.0
}

fn default_risk_weight() -> f64 {
    0.2
}

fn default_value_weight() -> f64 {
    0.6
}

fn default_urgency_weight() -> f64 {
    0.4
}

fn default_senior_pool() -> Vec<CoordinatorId> {
    vec![CoordinatorId::new("COORD001")]
}

fn default_mid_pool() -> Vec<CoordinatorId> {
    vec![CoordinatorId::new("COORD002")]
}

fn default_general_pool() -> Vec<CoordinatorId> {
    vec![CoordinatorId::new("COORD003")]
}

fn default_max_active() -> usize {
    150
}

fn default_base_contact_hour() -> u32 {
    10
}

fn default_language() -> String {
    "English".to_string()
}

fn default_templates() -> Vec<ScriptTemplate> {
    vec![
        ScriptTemplate::new(
            "HBA1C",
            "Not Scheduled",
            "Introduce yourself and the plan, then offer to book the member's HbA1c lab test.",
        ),
        ScriptTemplate::new(
            "BP",
            "Missed Appointment",
            "Mention the missed blood pressure check and offer a new appointment time.",
        ),
        ScriptTemplate::new(
            "COL",
            "Lab Pending",
            "Follow up on the outstanding colorectal cancer screening kit or lab result.",
        ),
    ]
}

fn default_fallback_template() -> String {
    "Standard outreach script".to_string()
}

fn default_barrier_threshold() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// Load configuration: defaults, then an optional file, then
    /// `CAREGAP_`-prefixed environment variables (`__` separates sections,
    /// e.g. `CAREGAP_ESCALATION__BARRIER_THRESHOLD=4`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&EngineConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CAREGAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
