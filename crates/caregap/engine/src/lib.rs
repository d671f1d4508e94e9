//! Care gap workflow engine
//!
//! The engine owns the gap lifecycle. It is the only component that
//! writes to the registry; everything else reads through
//! [`GapWorkflowEngine::reader`].
//!
//! # Architecture
//!
//! [`GapWorkflowEngine`] composes:
//!
//! - [`GapScorer`]: value, urgency and priority scoring
//! - [`CoordinatorRoster`]: tiered coordinator assignment with capacity
//! - [`OutreachPlanner`]: contact time, channel, script and barriers
//! - [`EscalationPolicy`] and [`determine_follow_up`]: contact rules
//! - [`next_status`]: lifecycle transition checks
//! - [`GapLocks`]: per-gap serialization of stage calls
//!
//! # Example
//!
//! ```rust
//! use caregap_engine::{ClosureRequest, EngineConfig, GapWorkflowEngine};
//! use caregap_types::*;
//! use chrono::{Duration, Utc};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let engine = GapWorkflowEngine::new(EngineConfig::default());
//!     let gap = engine
//!         .identify_gap(
//!             MemberId::new("M1"),
//!             MeasureId::new("HBA1C"),
//!             GapReason::NotScheduled,
//!             Utc::now() + Duration::days(10),
//!             GapContext::default(),
//!         )
//!         .await
//!         .unwrap();
//!     assert_eq!(gap.urgency, Urgency::Critical);
//!
//!     let outcome = engine
//!         .verify_closure(&gap.gap_id, ClosureRequest::new(ClosureMethod::Claims, "claims", "system"))
//!         .await
//!         .unwrap();
//!     assert!(!outcome.is_pending());
//! });
//! ```

#![deny(unsafe_code)]

pub mod assignment;
pub mod config;
pub mod engine;
pub mod error;
pub mod escalation;
pub mod locks;
pub mod outreach;
pub mod scoring;
pub mod stage;
pub mod state_machine;

pub use assignment::CoordinatorRoster;
pub use config::EngineConfig;
pub use engine::{GapWorkflowEngine, LOST_TO_FOLLOWUP_REASON_KEY};
pub use error::{EngineError, EngineResult};
pub use escalation::{determine_follow_up, EscalationPolicy, FollowUp};
pub use locks::GapLocks;
pub use outreach::OutreachPlanner;
pub use scoring::{GapScorer, GapScores};
pub use stage::{ClosureOutcome, ClosureRequest, GapWorkflowSnapshot};
pub use state_machine::{next_status, WorkflowAction};
