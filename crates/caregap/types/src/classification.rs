//! Closed vocabularies: gap reasons, contact outcomes, channels,
//! closure methods and barriers.
//!
//! Reasons, outcomes and barriers are drawn from a closed set but
//! tolerate free-form values through an `Other` variant. Channels and
//! closure methods are strict.

use crate::{TypeError, TypeResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ── Gap Reason ───────────────────────────────────────────────────────

/// Why the clinical action is still missing
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GapReason {
    LabPending,
    NotScheduled,
    MissedAppointment,
    ProviderDelay,
    Other(String),
}

impl GapReason {
    pub fn label(&self) -> &str {
        match self {
            Self::LabPending => "Lab Pending",
            Self::NotScheduled => "Not Scheduled",
            Self::MissedAppointment => "Missed Appointment",
            Self::ProviderDelay => "Provider Delay",
            Self::Other(reason) => reason,
        }
    }
}

impl FromStr for GapReason {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "Lab Pending" => Self::LabPending,
            "Not Scheduled" => Self::NotScheduled,
            "Missed Appointment" => Self::MissedAppointment,
            "Provider Delay" => Self::ProviderDelay,
            other => Self::Other(other.to_string()),
        })
    }
}

impl std::fmt::Display for GapReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Contact Outcome ──────────────────────────────────────────────────

/// Result of a single contact attempt
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactOutcome {
    Reached,
    Voicemail,
    NoAnswer,
    Busy,
    Other(String),
}

impl ContactOutcome {
    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Reached => "Reached",
            Self::Voicemail => "Voicemail",
            Self::NoAnswer => "No Answer",
            Self::Busy => "Busy",
            Self::Other(outcome) => outcome,
        }
    }
}

impl FromStr for ContactOutcome {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "Reached" => Self::Reached,
            "Voicemail" => Self::Voicemail,
            "No Answer" => Self::NoAnswer,
            "Busy" => Self::Busy,
            other => Self::Other(other.to_string()),
        })
    }
}

impl std::fmt::Display for ContactOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Contact Channel ──────────────────────────────────────────────────

/// Communication channel used to reach a member
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContactChannel {
    #[default]
    Phone,
    Sms,
    Email,
    Mail,
}

impl ContactChannel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Phone => "Phone",
            Self::Sms => "SMS",
            Self::Email => "Email",
            Self::Mail => "Mail",
        }
    }
}

impl FromStr for ContactChannel {
    type Err = TypeError;

    fn from_str(s: &str) -> TypeResult<Self> {
        match s.trim() {
            "Phone" => Ok(Self::Phone),
            "SMS" | "Sms" => Ok(Self::Sms),
            "Email" => Ok(Self::Email),
            "Mail" => Ok(Self::Mail),
            other => Err(TypeError::UnknownVariant {
                kind: "contact channel",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ContactChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Closure Method ───────────────────────────────────────────────────

/// Evidence used to close a gap
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosureMethod {
    Claims,
    LabResults,
    Manual,
}

impl ClosureMethod {
    /// Claims and lab results are strong enough to close without review
    pub fn is_automatic_evidence(&self) -> bool {
        matches!(self, Self::Claims | Self::LabResults)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Claims => "Claims",
            Self::LabResults => "Lab Results",
            Self::Manual => "Manual",
        }
    }
}

impl FromStr for ClosureMethod {
    type Err = TypeError;

    fn from_str(s: &str) -> TypeResult<Self> {
        match s.trim() {
            "Claims" => Ok(Self::Claims),
            "Lab Results" => Ok(Self::LabResults),
            "Manual" => Ok(Self::Manual),
            other => Err(TypeError::UnknownVariant {
                kind: "closure method",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ClosureMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Barrier ──────────────────────────────────────────────────────────

/// Obstacle keeping a member from completing the clinical action
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Barrier {
    Transportation,
    Language,
    Financial,
    HealthLiteracy,
    Other(String),
}

impl Barrier {
    pub fn label(&self) -> &str {
        match self {
            Self::Transportation => "Transportation",
            Self::Language => "Language",
            Self::Financial => "Financial",
            Self::HealthLiteracy => "Health Literacy",
            Self::Other(barrier) => barrier,
        }
    }
}

impl FromStr for Barrier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "Transportation" => Self::Transportation,
            "Language" => Self::Language,
            "Financial" => Self::Financial,
            "Health Literacy" => Self::HealthLiteracy,
            other => Self::Other(other.to_string()),
        })
    }
}

impl std::fmt::Display for Barrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_reason_parsing() {
        assert_eq!("Lab Pending".parse::<GapReason>().unwrap(), GapReason::LabPending);
        assert_eq!(
            "Provider Delay".parse::<GapReason>().unwrap(),
            GapReason::ProviderDelay
        );
        let other: GapReason = "Pharmacy Issue".parse().unwrap();
        assert_eq!(other, GapReason::Other("Pharmacy Issue".into()));
        assert_eq!(other.to_string(), "Pharmacy Issue");
    }

    #[test]
    fn test_contact_outcome_parsing() {
        assert!("Reached".parse::<ContactOutcome>().unwrap().is_reached());
        assert_eq!(
            "No Answer".parse::<ContactOutcome>().unwrap(),
            ContactOutcome::NoAnswer
        );
        assert!(!"Wrong Number".parse::<ContactOutcome>().unwrap().is_reached());
    }

    #[test]
    fn test_strict_enums_reject_unknown_values() {
        assert_eq!("SMS".parse::<ContactChannel>().unwrap(), ContactChannel::Sms);
        assert!("Pigeon".parse::<ContactChannel>().is_err());

        assert_eq!(
            "Lab Results".parse::<ClosureMethod>().unwrap(),
            ClosureMethod::LabResults
        );
        let err = "Guess".parse::<ClosureMethod>().unwrap_err();
        assert!(err.to_string().contains("closure method"));
    }

    #[test]
    fn test_automatic_evidence() {
        assert!(ClosureMethod::Claims.is_automatic_evidence());
        assert!(ClosureMethod::LabResults.is_automatic_evidence());
        assert!(!ClosureMethod::Manual.is_automatic_evidence());
    }

    #[test]
    fn test_barrier_labels() {
        assert_eq!(Barrier::HealthLiteracy.to_string(), "Health Literacy");
        assert_eq!(
            "Housing".parse::<Barrier>().unwrap(),
            Barrier::Other("Housing".into())
        );
    }
}
