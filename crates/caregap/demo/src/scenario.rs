//! Scripted gaps and the dashboard printout

use anyhow::Context;
use caregap_engine::{ClosureRequest, GapWorkflowEngine, GapWorkflowSnapshot};
use caregap_registry::GapQuery;
use caregap_types::*;
use chrono::{Duration, Utc};

fn diabetic_member() -> GapContext {
    GapContext::default()
        .with_member(MemberProfile {
            age: Some(68.0),
            gender: Some("Female".into()),
            risk_score: Some(0.72),
            chronic_conditions: vec!["Diabetes".into(), "Hypertension".into()],
            prefers_sms: true,
            timezone_offset: Some(-5),
            ..Default::default()
        })
        .with_engagement(EngagementProfile {
            portal_logins_last_90_days: Some(7),
            best_contact_hour: Some(9),
            ..Default::default()
        })
        .with_attribute("region", "Northeast")
}

fn hard_to_reach_member() -> GapContext {
    GapContext::default()
        .with_member(MemberProfile {
            age: Some(81.0),
            risk_score: Some(0.4),
            language_preference: Some("Spanish".into()),
            transportation_issues: true,
            language_barrier: true,
            financial_concerns: true,
            distance_to_facility: Some(27.0),
            ..Default::default()
        })
        .with_attribute("region", "Southwest")
}

/// Run three gaps through different paths and return their snapshots
pub async fn run(engine: &GapWorkflowEngine) -> anyhow::Result<Vec<GapWorkflowSnapshot>> {
    let now = Utc::now();

    // 1. Straight path: plan, reach, close on claims
    let hba1c_ctx = diabetic_member();
    let hba1c = engine
        .identify_gap(
            MemberId::new("M1001"),
            MeasureId::new("HBA1C"),
            GapReason::NotScheduled,
            now + Duration::days(12),
            hba1c_ctx.clone(),
        )
        .await
        .context("identifying HbA1c gap")?;
    engine.plan_outreach(&hba1c.gap_id, &hba1c_ctx.member).await?;
    let coordinator = hba1c
        .assigned_coordinator
        .clone()
        .unwrap_or_else(|| CoordinatorId::new("COORD001"));
    engine
        .log_intervention(
            &hba1c.gap_id,
            coordinator.clone(),
            ContactChannel::Sms,
            ContactOutcome::NoAnswer,
            "No reply to first text",
            vec![],
        )
        .await?;
    engine
        .log_intervention(
            &hba1c.gap_id,
            coordinator,
            ContactChannel::Phone,
            ContactOutcome::Reached,
            "Lab visit booked",
            vec![],
        )
        .await?;
    engine
        .verify_closure(
            &hba1c.gap_id,
            ClosureRequest::new(ClosureMethod::Claims, "claims feed", "system"),
        )
        .await?;

    // 2. Barriers escalate; manual closure waits for a supervisor
    let col_ctx = hard_to_reach_member();
    let col = engine
        .identify_gap(
            MemberId::new("M2002"),
            MeasureId::new("COL"),
            GapReason::LabPending,
            now + Duration::days(75),
            col_ctx.clone(),
        )
        .await
        .context("identifying colorectal screening gap")?;
    engine.plan_outreach(&col.gap_id, &col_ctx.member).await?;
    engine
        .log_intervention(
            &col.gap_id,
            CoordinatorId::new("COORD003"),
            ContactChannel::Phone,
            ContactOutcome::Reached,
            "Needs a ride and an interpreter",
            vec![Barrier::Transportation, Barrier::Language, Barrier::Financial],
        )
        .await?;
    engine
        .verify_closure(
            &col.gap_id,
            ClosureRequest::new(ClosureMethod::Manual, "chart review", "nurse.kim")
                .with_notes("Kit returned at clinic"),
        )
        .await?;

    // 3. Exclusion with approval
    let bp = engine
        .identify_gap(
            MemberId::new("M3003"),
            MeasureId::new("BP"),
            GapReason::MissedAppointment,
            now + Duration::days(40),
            GapContext::default(),
        )
        .await
        .context("identifying blood pressure gap")?;
    engine
        .verify_closure(
            &bp.gap_id,
            ClosureRequest::new(ClosureMethod::Manual, "enrollment file", "supervisor.lee")
                .with_exclusion("Hospice enrollment")
                .with_supervisor_approval(),
        )
        .await?;

    let mut snapshots = Vec::new();
    for gap_id in [&hba1c.gap_id, &col.gap_id, &bp.gap_id] {
        snapshots.push(engine.workflow_status(gap_id).await?);
    }
    Ok(snapshots)
}

/// Print what a read-only dashboard sees
pub async fn print_dashboard(engine: &GapWorkflowEngine) -> anyhow::Result<()> {
    let reader = engine.reader();

    println!("  {:<40} {:<10} {:<4} {:<26} {:>6}", "Gap", "Urgency", "Tier", "Status", "P(close)");
    for gap in reader.list_gaps().await? {
        println!(
            "  {:<40} {:<10} {:<4} {:<26} {:>6.2}",
            gap.gap_id.as_str().get(..40).unwrap_or(gap.gap_id.as_str()),
            gap.urgency.label(),
            gap.priority.label(),
            gap.status.label(),
            gap.closure_probability
        );
    }

    let escalated = reader.escalated_interventions().await?;
    println!("\n  Escalations: {}", escalated.len());
    for intervention in &escalated {
        println!(
            "    {} - {}",
            intervention.gap_id,
            intervention.escalation_reason.as_deref().unwrap_or("")
        );
    }

    let pending = reader
        .query(&GapQuery::new().with_status(GapStatus::PendingVerification))
        .await?;
    println!("  Awaiting supervisor approval: {}", pending.len());

    let summary = engine.prediction_summary();
    println!(
        "  Predictions: {} (mean {:.2}, fallback rate {:.0}%)\n",
        summary.count,
        summary.mean_probability,
        summary.fallback_rate * 100.0
    );
    Ok(())
}
