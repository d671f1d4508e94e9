//! Gap workflow engine: the only writer of gap state
//!
//! Each stage method loads the gap under its per-gap lock, computes the
//! new status and record, and commits both in one [`GapTransition`].
//! Nothing is written until every check has passed.

use caregap_estimator::{MonitorSummary, ResilientEstimator};
use caregap_features::{FeatureExtractor, GapFacts};
use caregap_registry::{GapReader, GapStore, GapTransition, InMemoryGapStore};
use caregap_types::{
    Barrier, ClosureVerification, ContactChannel, ContactOutcome, CoordinatorId, Gap, GapContext,
    GapId, GapReason, GapStatus, Intervention, InterventionId, MeasureId, MemberId, MemberProfile,
    OutreachPlan,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::assignment::CoordinatorRoster;
use crate::config::{EngineConfig, VerificationConfig};
use crate::error::{EngineError, EngineResult};
use crate::escalation::{determine_follow_up, EscalationPolicy};
use crate::locks::GapLocks;
use crate::outreach::OutreachPlanner;
use crate::scoring::GapScorer;
use crate::stage::{ClosureOutcome, ClosureRequest, GapWorkflowSnapshot};
use crate::state_machine::{next_status, WorkflowAction};

/// Metadata key recording why a gap was marked lost to follow-up
pub const LOST_TO_FOLLOWUP_REASON_KEY: &str = "lost_to_followup_reason";

type Clock = dyn Fn() -> DateTime<Utc> + Send + Sync;

/// Orchestrates identification, outreach planning, intervention logging
/// and closure verification for care gaps.
pub struct GapWorkflowEngine<S: GapStore + 'static = InMemoryGapStore> {
    store: Arc<S>,
    extractor: FeatureExtractor,
    estimator: ResilientEstimator,
    scorer: GapScorer,
    roster: CoordinatorRoster,
    planner: OutreachPlanner,
    escalation: EscalationPolicy,
    verification: VerificationConfig,
    locks: GapLocks,
    clock: Arc<Clock>,
}

impl GapWorkflowEngine<InMemoryGapStore> {
    /// Engine over a fresh in-memory registry
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryGapStore::new()))
    }
}

impl<S: GapStore + 'static> GapWorkflowEngine<S> {
    pub fn with_store(config: EngineConfig, store: Arc<S>) -> Self {
        let estimator = ResilientEstimator::from_config(&config.estimator);
        info!(
            estimator = estimator.primary_name(),
            "Gap workflow engine initialized"
        );

        Self {
            store,
            extractor: FeatureExtractor::new(),
            estimator,
            scorer: GapScorer::new(config.scoring),
            roster: CoordinatorRoster::new(config.assignment),
            planner: OutreachPlanner::new(config.outreach),
            escalation: EscalationPolicy::new(config.escalation),
            verification: config.verification,
            locks: GapLocks::new(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the estimator chosen from configuration
    pub fn with_estimator(mut self, estimator: ResilientEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Use an injected clock instead of the system time
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Read-only handle for dashboards, alerting and sweeps
    pub fn reader(&self) -> Arc<dyn GapReader> {
        self.store.clone()
    }

    pub fn roster(&self) -> &CoordinatorRoster {
        &self.roster
    }

    pub fn prediction_summary(&self) -> MonitorSummary {
        self.estimator.monitor().summary()
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    async fn load_gap(&self, gap_id: &GapId) -> EngineResult<Gap> {
        self.store
            .get_gap(gap_id)
            .await?
            .ok_or_else(|| EngineError::GapNotFound(gap_id.clone()))
    }

    // ── Identification ───────────────────────────────────────────────

    /// Register a newly detected gap, score it and route it to a
    /// coordinator.
    ///
    /// The gap stays IDENTIFIED when no coordinator has capacity. A
    /// missing, failing or slow estimator degrades to the heuristic. The
    /// gap's lock is held from insert to assignment, so other stage calls
    /// only ever see it after identification is complete.
    pub async fn identify_gap(
        &self,
        member_id: MemberId,
        measure_id: MeasureId,
        gap_reason: GapReason,
        deadline: DateTime<Utc>,
        context: GapContext,
    ) -> EngineResult<Gap> {
        let now = self.now();
        let days_to_deadline = deadline.signed_duration_since(now).num_days();
        let scores = self
            .scorer
            .score(&measure_id, context.member.risk_score(), days_to_deadline);

        let features = self.extractor.create_feature_vector(
            &GapFacts {
                measure_id: &measure_id,
                gap_reason: &gap_reason,
                deadline,
                assigned_coordinator: None,
            },
            &context,
            now,
        );
        let estimate = self.estimator.estimate(&features).await;

        let gap_id = GapId::generate(&member_id, &measure_id);
        debug!(
            gap_id = %gap_id,
            days_to_deadline,
            value_score = scores.value_score,
            priority_score = scores.priority_score,
            closure_probability = estimate.estimate.probability,
            "Gap scored"
        );

        let mut gap = Gap {
            gap_id: gap_id.clone(),
            member_id,
            measure_id,
            gap_reason,
            identified_date: now,
            deadline_date: deadline,
            urgency: scores.urgency,
            priority: scores.priority,
            priority_score: scores.priority_score,
            value_score: scores.value_score,
            closure_probability: estimate.estimate.probability,
            probability_source: estimate.source,
            assigned_coordinator: None,
            status: GapStatus::Identified,
            metadata: context.attributes,
            updated_at: now,
        };
        // Held until assignment is committed; stage calls that find the gap
        // through a reader wait here instead of being overwritten.
        let _guard = self.locks.acquire(&gap_id).await;
        self.store.insert_gap(gap.clone()).await?;

        info!(
            gap_id = %gap_id,
            member_id = %gap.member_id,
            measure_id = %gap.measure_id,
            urgency = %gap.urgency,
            priority = %gap.priority,
            "Gap identified"
        );

        let assigned = next_status(&gap_id, gap.status, WorkflowAction::Assign)?;
        let Some(coordinator) = self.roster.assign(gap.priority) else {
            warn!(gap_id = %gap_id, priority = %gap.priority, "Gap left unassigned");
            return Ok(gap);
        };

        gap.status = assigned;
        gap.assigned_coordinator = Some(coordinator.clone());
        if let Err(e) = self.store.commit(GapTransition::status_only(gap.clone())).await {
            self.roster.release(&coordinator);
            return Err(e.into());
        }

        info!(gap_id = %gap_id, coordinator = %coordinator, "Gap assigned");
        Ok(gap)
    }

    // ── Outreach Planning ────────────────────────────────────────────

    /// Compute and store an outreach plan, replacing any earlier one
    pub async fn plan_outreach(
        &self,
        gap_id: &GapId,
        member: &MemberProfile,
    ) -> EngineResult<OutreachPlan> {
        let _guard = self.locks.acquire(gap_id).await;
        let mut gap = self.load_gap(gap_id).await?;
        let status = next_status(gap_id, gap.status, WorkflowAction::PlanOutreach)?;

        let now = self.now();
        let history = self.store.interventions_for_member(&gap.member_id).await?;
        let plan = self.planner.plan(&gap, member, &history, now);

        gap.status = status;
        gap.updated_at = now;
        self.store
            .commit(GapTransition::with_plan(gap, plan.clone()))
            .await?;

        info!(
            gap_id = %gap_id,
            channel = %plan.preferred_channel,
            barriers = plan.barriers.len(),
            "Outreach planned"
        );
        Ok(plan)
    }

    // ── Intervention Logging ─────────────────────────────────────────

    /// Record a contact attempt with its follow-up and escalation
    pub async fn log_intervention(
        &self,
        gap_id: &GapId,
        coordinator_id: CoordinatorId,
        contact_method: ContactChannel,
        contact_outcome: ContactOutcome,
        notes: impl Into<String>,
        barriers: Vec<Barrier>,
    ) -> EngineResult<Intervention> {
        let _guard = self.locks.acquire(gap_id).await;
        let mut gap = self.load_gap(gap_id).await?;
        let status = next_status(
            gap_id,
            gap.status,
            WorkflowAction::LogContact {
                reached: contact_outcome.is_reached(),
            },
        )?;

        let now = self.now();
        let follow_up = determine_follow_up(&contact_outcome, now);
        let escalation_reason = self
            .escalation
            .check(gap.urgency, &contact_outcome, &barriers);

        let intervention = Intervention {
            intervention_id: InterventionId::generate(gap_id),
            gap_id: gap_id.clone(),
            coordinator_id,
            contact_date: now,
            contact_method,
            contact_outcome,
            conversation_notes: notes.into(),
            barriers_identified: barriers,
            follow_up_date: follow_up.as_ref().map(|f| f.date),
            follow_up_reason: follow_up.map(|f| f.reason),
            escalation_triggered: escalation_reason.is_some(),
            escalation_reason,
        };

        if gap.is_terminal() {
            debug!(gap_id = %gap_id, status = %gap.status, "Contact logged on closed gap");
        }
        gap.status = status;
        gap.updated_at = now;
        self.store
            .commit(GapTransition::with_intervention(gap, intervention.clone()))
            .await?;

        info!(
            gap_id = %gap_id,
            intervention_id = %intervention.intervention_id,
            outcome = %intervention.contact_outcome,
            status = %status,
            "Intervention logged"
        );
        if let Some(reason) = &intervention.escalation_reason {
            warn!(gap_id = %gap_id, reason = %reason, "Gap escalated");
        }
        Ok(intervention)
    }

    // ── Closure Verification ─────────────────────────────────────────

    /// Close or exclude a gap on sufficient evidence.
    ///
    /// Claims and lab results close without review unless an exclusion
    /// is applied. Everything else needs supervisor approval; without it
    /// the gap moves to PENDING_VERIFICATION and no record is created.
    pub async fn verify_closure(
        &self,
        gap_id: &GapId,
        request: ClosureRequest,
    ) -> EngineResult<ClosureOutcome> {
        let _guard = self.locks.acquire(gap_id).await;
        let mut gap = self.load_gap(gap_id).await?;

        let auto_close =
            ClosureVerification::is_auto_close(request.method, request.exclusion_applied);
        let approved = auto_close || request.supervisor_approval;
        let status = next_status(
            gap_id,
            gap.status,
            WorkflowAction::Verify {
                approved,
                exclusion: request.exclusion_applied,
            },
        )?;

        if self.verification.require_intervention_history
            && self.store.interventions(gap_id).await?.is_empty()
        {
            return Err(EngineError::invalid_transition(
                gap_id,
                gap.status,
                "no intervention history",
            ));
        }

        let now = self.now();
        gap.status = status;
        gap.updated_at = now;

        if !approved {
            self.store.commit(GapTransition::status_only(gap)).await?;
            info!(gap_id = %gap_id, method = %request.method, "Closure awaiting supervisor approval");
            return Ok(ClosureOutcome::PendingApproval);
        }

        let verification = ClosureVerification {
            gap_id: gap_id.clone(),
            closure_date: now,
            closure_method: request.method,
            verification_source: request.verification_source,
            verified_by: request.verified_by,
            supervisor_approval: request.supervisor_approval,
            exclusion_applied: request.exclusion_applied,
            exclusion_reason: request.exclusion_reason,
            notes: request.notes,
        };
        let coordinator = gap.assigned_coordinator.clone();
        self.store
            .commit(GapTransition::with_verification(gap, verification.clone()))
            .await?;

        if let Some(coordinator) = coordinator {
            self.roster.release(&coordinator);
        }
        info!(
            gap_id = %gap_id,
            method = %verification.closure_method,
            status = %status,
            "Gap closure verified"
        );
        Ok(ClosureOutcome::Verified(verification))
    }

    // ── Lost to Follow-up ────────────────────────────────────────────

    /// Park an open gap as lost to follow-up. The next logged contact
    /// resumes it.
    pub async fn mark_lost_to_followup(
        &self,
        gap_id: &GapId,
        reason: impl Into<String>,
    ) -> EngineResult<Gap> {
        let _guard = self.locks.acquire(gap_id).await;
        let mut gap = self.load_gap(gap_id).await?;
        gap.status = next_status(gap_id, gap.status, WorkflowAction::MarkLost)?;
        gap.updated_at = self.now();

        let reason = reason.into();
        gap.metadata
            .insert(LOST_TO_FOLLOWUP_REASON_KEY.to_string(), reason.clone());
        self.store.commit(GapTransition::status_only(gap.clone())).await?;

        info!(gap_id = %gap_id, reason = %reason, "Gap marked lost to follow-up");
        Ok(gap)
    }

    /// Mark every in-progress gap without contact for longer than
    /// `threshold` as lost to follow-up
    pub async fn sweep_stale_contacts(&self, threshold: Duration) -> EngineResult<Vec<Gap>> {
        let stale = self.reader().stale_in_progress(threshold, self.now()).await?;
        let mut marked = Vec::with_capacity(stale.len());
        for gap in stale {
            let reason = format!("No contact for more than {} days", threshold.num_days());
            match self.mark_lost_to_followup(&gap.gap_id, reason).await {
                Ok(gap) => marked.push(gap),
                // Closed between the scan and the lock
                Err(EngineError::InvalidTransition { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(marked)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub async fn workflow_status(&self, gap_id: &GapId) -> EngineResult<GapWorkflowSnapshot> {
        let gap = self.load_gap(gap_id).await?;
        let outreach_plan = self.store.outreach_plan(gap_id).await?;
        let interventions = self.store.interventions(gap_id).await?;
        let verification = self.store.verification(gap_id).await?;

        Ok(GapWorkflowSnapshot {
            current_stage: gap.status.label().to_string(),
            days_in_workflow: gap.days_in_workflow(self.now()),
            gap,
            outreach_plan,
            interventions,
            verification,
        })
    }
}

impl<S: GapStore + 'static> std::fmt::Debug for GapWorkflowEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GapWorkflowEngine")
            .field("estimator", &self.estimator)
            .field("roster", &self.roster)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssignmentConfig;
    use caregap_types::{ClosureMethod, Priority, ProbabilitySource, Urgency};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn engine() -> GapWorkflowEngine {
        GapWorkflowEngine::new(EngineConfig::default()).with_clock(fixed_now)
    }

    async fn identify(engine: &GapWorkflowEngine, reason: GapReason, days: i64) -> Gap {
        engine
            .identify_gap(
                MemberId::new("M1"),
                MeasureId::new("HBA1C"),
                reason,
                fixed_now() + Duration::days(days),
                GapContext::default(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_identify_scores_and_assigns() {
        let engine = engine();
        let gap = identify(&engine, GapReason::NotScheduled, 10).await;

        assert_eq!(gap.urgency, Urgency::Critical);
        assert_eq!(gap.priority, Priority::P1);
        assert_eq!(gap.status, GapStatus::Assigned);
        assert_eq!(gap.assigned_coordinator, Some(CoordinatorId::new("COORD001")));
        assert!((gap.closure_probability - 0.7).abs() < 1e-9);
        assert_eq!(gap.probability_source, ProbabilitySource::Heuristic);

        let stored = engine.reader().get_gap(&gap.gap_id).await.unwrap().unwrap();
        assert_eq!(stored, gap);
    }

    #[tokio::test]
    async fn test_identical_identify_calls_give_distinct_ids() {
        let engine = engine();
        let a = identify(&engine, GapReason::LabPending, 40).await;
        let b = identify(&engine, GapReason::LabPending, 40).await;
        assert_ne!(a.gap_id, b.gap_id);
    }

    #[tokio::test]
    async fn test_no_capacity_leaves_gap_identified() {
        let config = EngineConfig {
            assignment: AssignmentConfig {
                max_active_per_coordinator: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let engine = GapWorkflowEngine::new(config).with_clock(fixed_now);
        let gap = identify(&engine, GapReason::NotScheduled, 10).await;
        assert_eq!(gap.status, GapStatus::Identified);
        assert_eq!(gap.assigned_coordinator, None);
    }

    #[tokio::test]
    async fn test_unknown_gap_is_not_found() {
        let engine = engine();
        let missing = GapId::new("GAP-NOPE");

        assert!(matches!(
            engine.plan_outreach(&missing, &MemberProfile::default()).await,
            Err(EngineError::GapNotFound(_))
        ));
        assert!(matches!(
            engine
                .log_intervention(
                    &missing,
                    CoordinatorId::new("C"),
                    ContactChannel::Phone,
                    ContactOutcome::Reached,
                    "",
                    vec![],
                )
                .await,
            Err(EngineError::GapNotFound(_))
        ));
        assert!(matches!(
            engine
                .verify_closure(&missing, ClosureRequest::new(ClosureMethod::Claims, "x", "y"))
                .await,
            Err(EngineError::GapNotFound(_))
        ));
        assert!(matches!(
            engine.workflow_status(&missing).await,
            Err(EngineError::GapNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_contact_outcomes_drive_status_and_follow_up() {
        let engine = engine();
        let gap = identify(&engine, GapReason::NotScheduled, 45).await;

        let voicemail = engine
            .log_intervention(
                &gap.gap_id,
                CoordinatorId::new("COORD002"),
                ContactChannel::Phone,
                ContactOutcome::Voicemail,
                "left message",
                vec![],
            )
            .await
            .unwrap();
        assert_eq!(voicemail.follow_up_date, Some(fixed_now() + Duration::days(2)));
        assert!(!voicemail.escalation_triggered);
        let status = engine.workflow_status(&gap.gap_id).await.unwrap();
        assert_eq!(status.gap.status, GapStatus::ContactAttempted);

        let reached = engine
            .log_intervention(
                &gap.gap_id,
                CoordinatorId::new("COORD002"),
                ContactChannel::Phone,
                ContactOutcome::Reached,
                "scheduled lab",
                vec![],
            )
            .await
            .unwrap();
        assert_eq!(reached.follow_up_date, None);
        let status = engine.workflow_status(&gap.gap_id).await.unwrap();
        assert_eq!(status.gap.status, GapStatus::InterventionInProgress);
        assert_eq!(status.interventions.len(), 2);
    }

    #[tokio::test]
    async fn test_critical_unreached_contact_escalates() {
        let engine = engine();
        let gap = identify(&engine, GapReason::MissedAppointment, 5).await;
        let intervention = engine
            .log_intervention(
                &gap.gap_id,
                CoordinatorId::new("COORD001"),
                ContactChannel::Phone,
                ContactOutcome::NoAnswer,
                "",
                vec![],
            )
            .await
            .unwrap();
        assert!(intervention.escalation_triggered);
        assert_eq!(
            intervention.escalation_reason.as_deref(),
            Some("Critical gap, multiple failed contact attempts")
        );
        assert_eq!(engine.reader().escalated_interventions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_manual_closure_needs_approval() {
        let engine = engine();
        let gap = identify(&engine, GapReason::NotScheduled, 45).await;

        let outcome = engine
            .verify_closure(
                &gap.gap_id,
                ClosureRequest::new(ClosureMethod::Manual, "chart review", "nurse.a"),
            )
            .await
            .unwrap();
        assert!(outcome.is_pending());
        let status = engine.workflow_status(&gap.gap_id).await.unwrap();
        assert_eq!(status.gap.status, GapStatus::PendingVerification);
        assert!(status.verification.is_none());

        let outcome = engine
            .verify_closure(
                &gap.gap_id,
                ClosureRequest::new(ClosureMethod::Manual, "chart review", "nurse.a")
                    .with_supervisor_approval(),
            )
            .await
            .unwrap();
        assert!(outcome.verification().is_some());
        let status = engine.workflow_status(&gap.gap_id).await.unwrap();
        assert_eq!(status.gap.status, GapStatus::Closed);
    }

    #[tokio::test]
    async fn test_exclusion_needs_approval_even_with_claims() {
        let engine = engine();
        let gap = identify(&engine, GapReason::NotScheduled, 45).await;

        let pending = engine
            .verify_closure(
                &gap.gap_id,
                ClosureRequest::new(ClosureMethod::Claims, "claims", "system")
                    .with_exclusion("Hospice"),
            )
            .await
            .unwrap();
        assert!(pending.is_pending());

        let excluded = engine
            .verify_closure(
                &gap.gap_id,
                ClosureRequest::new(ClosureMethod::Claims, "claims", "supervisor.b")
                    .with_exclusion("Hospice")
                    .with_supervisor_approval(),
            )
            .await
            .unwrap();
        let verification = excluded.verification().unwrap();
        assert_eq!(verification.exclusion_reason.as_deref(), Some("Hospice"));
        let status = engine.workflow_status(&gap.gap_id).await.unwrap();
        assert_eq!(status.gap.status, GapStatus::Excluded);
    }

    #[tokio::test]
    async fn test_terminal_gap_rejects_replan_and_reverify() {
        let engine = engine();
        let gap = identify(&engine, GapReason::LabPending, 45).await;
        engine
            .verify_closure(
                &gap.gap_id,
                ClosureRequest::new(ClosureMethod::LabResults, "lab feed", "system"),
            )
            .await
            .unwrap();

        assert!(matches!(
            engine.plan_outreach(&gap.gap_id, &MemberProfile::default()).await,
            Err(EngineError::InvalidTransition { .. })
        ));
        assert!(matches!(
            engine
                .verify_closure(
                    &gap.gap_id,
                    ClosureRequest::new(ClosureMethod::Claims, "claims", "system"),
                )
                .await,
            Err(EngineError::InvalidTransition { .. })
        ));

        // Audit trail still grows, status does not move
        engine
            .log_intervention(
                &gap.gap_id,
                CoordinatorId::new("COORD002"),
                ContactChannel::Sms,
                ContactOutcome::Reached,
                "thank-you message",
                vec![],
            )
            .await
            .unwrap();
        let status = engine.workflow_status(&gap.gap_id).await.unwrap();
        assert_eq!(status.gap.status, GapStatus::Closed);
        assert_eq!(status.interventions.len(), 1);
    }

    #[tokio::test]
    async fn test_require_intervention_history_policy() {
        let config = EngineConfig {
            verification: VerificationConfig {
                require_intervention_history: true,
            },
            ..Default::default()
        };
        let engine = GapWorkflowEngine::new(config).with_clock(fixed_now);
        let gap = identify(&engine, GapReason::LabPending, 45).await;

        let result = engine
            .verify_closure(
                &gap.gap_id,
                ClosureRequest::new(ClosureMethod::Claims, "claims", "system"),
            )
            .await;
        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
        let stored = engine.reader().get_gap(&gap.gap_id).await.unwrap().unwrap();
        assert_eq!(stored.status, GapStatus::Assigned);
    }

    #[tokio::test]
    async fn test_closure_releases_coordinator_slot() {
        let engine = engine();
        let gap = identify(&engine, GapReason::NotScheduled, 10).await;
        let coordinator = gap.assigned_coordinator.clone().unwrap();
        assert_eq!(engine.roster().active_load(&coordinator), 1);

        engine
            .verify_closure(
                &gap.gap_id,
                ClosureRequest::new(ClosureMethod::Claims, "claims", "system"),
            )
            .await
            .unwrap();
        assert_eq!(engine.roster().active_load(&coordinator), 0);
    }

    #[tokio::test]
    async fn test_plan_outreach_includes_member_history() {
        let engine = engine();
        let first = identify(&engine, GapReason::NotScheduled, 45).await;
        engine
            .log_intervention(
                &first.gap_id,
                CoordinatorId::new("COORD002"),
                ContactChannel::Phone,
                ContactOutcome::NoAnswer,
                "",
                vec![],
            )
            .await
            .unwrap();

        let second = identify(&engine, GapReason::LabPending, 45).await;
        let member = MemberProfile {
            prefers_email: true,
            timezone_offset: Some(2),
            ..Default::default()
        };
        let plan = engine.plan_outreach(&second.gap_id, &member).await.unwrap();

        assert_eq!(plan.preferred_channel, ContactChannel::Email);
        assert_eq!(
            plan.optimal_contact_time,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(plan.prior_contact_history.len(), 1);
        assert_eq!(plan.prior_contact_history[0].gap_id, first.gap_id);

        let status = engine.workflow_status(&second.gap_id).await.unwrap();
        assert_eq!(status.gap.status, GapStatus::OutreachPlanned);
        assert_eq!(status.outreach_plan, Some(plan));
    }

    #[tokio::test]
    async fn test_plan_outreach_tolerates_bad_timezone_offset() {
        let engine = engine();
        let gap = identify(&engine, GapReason::NotScheduled, 45).await;
        let member = MemberProfile {
            timezone_offset: Some(i64::MAX / 1000),
            ..Default::default()
        };
        let plan = engine.plan_outreach(&gap.gap_id, &member).await.unwrap();
        assert_eq!(
            plan.optimal_contact_time,
            Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_sweep_marks_stale_gaps_lost() {
        let start = fixed_now();
        let engine = GapWorkflowEngine::new(EngineConfig::default()).with_clock(move || start);
        let gap = identify(&engine, GapReason::NotScheduled, 120).await;
        engine
            .log_intervention(
                &gap.gap_id,
                CoordinatorId::new("COORD003"),
                ContactChannel::Phone,
                ContactOutcome::Reached,
                "",
                vec![],
            )
            .await
            .unwrap();

        let later = engine.with_clock(move || start + Duration::days(45));
        let marked = later.sweep_stale_contacts(Duration::days(30)).await.unwrap();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].status, GapStatus::LostToFollowup);
        assert!(marked[0].metadata_value(LOST_TO_FOLLOWUP_REASON_KEY).is_some());

        let resumed = later
            .log_intervention(
                &gap.gap_id,
                CoordinatorId::new("COORD003"),
                ContactChannel::Phone,
                ContactOutcome::Reached,
                "back in touch",
                vec![],
            )
            .await
            .unwrap();
        assert!(resumed.follow_up_date.is_none());
        let status = later.workflow_status(&gap.gap_id).await.unwrap();
        assert_eq!(status.gap.status, GapStatus::InterventionInProgress);
        assert_eq!(status.days_in_workflow, 45);
    }
}
