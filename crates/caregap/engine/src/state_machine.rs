//! Gap lifecycle transitions
//!
//! ```text
//! IDENTIFIED -> ASSIGNED -> OUTREACH_PLANNED -> CONTACT_ATTEMPTED
//!     -> INTERVENTION_IN_PROGRESS <-> (re-plan / contact)
//!     -> PENDING_VERIFICATION -> CLOSED | EXCLUDED
//! ```
//!
//! LOST_TO_FOLLOWUP can be entered from any open status and is left by
//! the next logged contact. Nothing ever returns to IDENTIFIED.

use caregap_types::{GapId, GapStatus};

use crate::error::{EngineError, EngineResult};

/// Stage operation requested on a gap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowAction {
    Assign,
    PlanOutreach,
    LogContact { reached: bool },
    Verify { approved: bool, exclusion: bool },
    MarkLost,
}

/// Status a gap moves to when `action` is applied from `from`
pub fn next_status(gap_id: &GapId, from: GapStatus, action: WorkflowAction) -> EngineResult<GapStatus> {
    if from.is_terminal() {
        return match action {
            // Audit trail keeps growing; status does not move
            WorkflowAction::LogContact { .. } => Ok(from),
            WorkflowAction::Verify { .. } => Err(EngineError::invalid_transition(
                gap_id,
                from,
                "closure already verified",
            )),
            _ => Err(EngineError::invalid_transition(gap_id, from, "gap is closed")),
        };
    }

    match action {
        WorkflowAction::Assign if from == GapStatus::Identified => Ok(GapStatus::Assigned),
        WorkflowAction::Assign => Err(EngineError::invalid_transition(
            gap_id,
            from,
            "only identified gaps can be assigned",
        )),
        WorkflowAction::PlanOutreach => Ok(GapStatus::OutreachPlanned),
        WorkflowAction::LogContact { reached: true } => Ok(GapStatus::InterventionInProgress),
        WorkflowAction::LogContact { reached: false } => Ok(GapStatus::ContactAttempted),
        WorkflowAction::Verify { approved: false, .. } => Ok(GapStatus::PendingVerification),
        WorkflowAction::Verify { exclusion: true, .. } => Ok(GapStatus::Excluded),
        WorkflowAction::Verify { .. } => Ok(GapStatus::Closed),
        WorkflowAction::MarkLost => Ok(GapStatus::LostToFollowup),
    }
}
