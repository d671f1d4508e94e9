//! Care Gap Domain Types
//!
//! A care gap is an unmet clinical quality action for a health-plan
//! member. This crate holds the vocabulary every other care gap crate
//! speaks.
//!
//! # Key Concepts
//!
//! - **Gap**: the central entity, created once at identification and
//!   advanced through [`GapStatus`] by the workflow engine.
//! - **OutreachPlan**: how and when to contact the member about a gap.
//!   Re-planning overwrites the previous plan.
//! - **Intervention**: one logged contact attempt. Append-only.
//! - **ClosureVerification**: the evidence that closed (or excluded) a
//!   gap. At most one per gap.
//! - **GapContext**: the typed member, engagement and operational records
//!   supplied at identification, with documented defaults for every
//!   missing field.
//!
//! All four entities share the [`GapId`] as correlation key. Nothing is
//! ever deleted; gaps only move forward through their lifecycle.

#![deny(unsafe_code)]

mod classification;
mod context;
mod errors;
mod gap;
mod ids;
mod records;
mod status;

pub use classification::*;
pub use context::*;
pub use errors::*;
pub use gap::*;
pub use ids::*;
pub use records::*;
pub use status::*;
