//! End-to-end gap lifecycle through the public engine API

use async_trait::async_trait;
use caregap_engine::{ClosureRequest, EngineConfig, GapWorkflowEngine};
use caregap_estimator::{
    ClosureEstimate, ClosureEstimator, EstimatorConfig, EstimatorError, EstimatorResult,
    ResilientEstimator,
};
use caregap_features::FeatureVector;
use caregap_registry::GapQuery;
use caregap_types::*;
use chrono::{Duration, Utc};
use std::io::Write;
use std::sync::Arc;

fn member_context() -> GapContext {
    GapContext::default()
        .with_member(MemberProfile {
            age: Some(67.0),
            risk_score: Some(0.6),
            chronic_conditions: vec!["Diabetes".into()],
            prefers_sms: true,
            ..Default::default()
        })
        .with_attribute("region", "north")
}

#[tokio::test]
async fn test_full_lifecycle_closes_with_one_verification() {
    let engine = GapWorkflowEngine::new(EngineConfig::default());

    let gap = engine
        .identify_gap(
            MemberId::new("M1"),
            MeasureId::new("HBA1C"),
            GapReason::NotScheduled,
            Utc::now() + Duration::days(10),
            member_context(),
        )
        .await
        .unwrap();
    assert_eq!(gap.urgency, Urgency::Critical);
    assert!(matches!(gap.priority, Priority::P1 | Priority::P2));
    assert!(matches!(gap.status, GapStatus::Assigned | GapStatus::Identified));
    assert_eq!(gap.metadata_value("region"), Some("north"));

    let member = member_context().member;
    let plan = engine.plan_outreach(&gap.gap_id, &member).await.unwrap();
    assert_eq!(plan.preferred_channel, ContactChannel::Sms);

    let intervention = engine
        .log_intervention(
            &gap.gap_id,
            CoordinatorId::new("COORD001"),
            ContactChannel::Sms,
            ContactOutcome::Reached,
            "Member agreed to lab visit",
            vec![],
        )
        .await
        .unwrap();
    assert!(intervention.follow_up_date.is_none());
    assert!(!intervention.escalation_triggered);

    let outcome = engine
        .verify_closure(
            &gap.gap_id,
            ClosureRequest::new(ClosureMethod::Claims, "claims feed", "system"),
        )
        .await
        .unwrap();
    assert!(outcome.verification().is_some());

    let snapshot = engine.workflow_status(&gap.gap_id).await.unwrap();
    assert_eq!(snapshot.gap.status, GapStatus::Closed);
    assert_eq!(snapshot.current_stage, "Closed");
    assert_eq!(snapshot.interventions.len(), 1);
    assert!(snapshot.verification.is_some());
    assert!(snapshot.outreach_plan.is_some());
}

#[tokio::test]
async fn test_reader_queries_follow_workflow_state() {
    let engine = GapWorkflowEngine::new(EngineConfig::default());
    let now = Utc::now();

    let urgent = engine
        .identify_gap(
            MemberId::new("M1"),
            MeasureId::new("BP"),
            GapReason::MissedAppointment,
            now + Duration::days(20),
            GapContext::default(),
        )
        .await
        .unwrap();
    let later = engine
        .identify_gap(
            MemberId::new("M2"),
            MeasureId::new("COL"),
            GapReason::LabPending,
            now + Duration::days(120),
            GapContext::default(),
        )
        .await
        .unwrap();

    let reader = engine.reader();
    let critical = reader
        .query(&GapQuery::new().with_urgency(Urgency::Critical))
        .await
        .unwrap();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].gap_id, urgent.gap_id);

    let by_member = reader
        .query(&GapQuery::new().for_member(MemberId::new("M2")))
        .await
        .unwrap();
    assert_eq!(by_member[0].gap_id, later.gap_id);

    engine
        .verify_closure(
            &later.gap_id,
            ClosureRequest::new(ClosureMethod::LabResults, "lab", "system"),
        )
        .await
        .unwrap();
    let open = reader.query(&GapQuery::new().open_only()).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].gap_id, urgent.gap_id);
}

struct BrokenModel;

#[async_trait]
impl ClosureEstimator for BrokenModel {
    fn name(&self) -> &str {
        "broken"
    }

    async fn estimate(&self, _features: &FeatureVector) -> EstimatorResult<ClosureEstimate> {
        Err(EstimatorError::Unavailable("weights corrupted".into()))
    }
}

struct StalledModel;

#[async_trait]
impl ClosureEstimator for StalledModel {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn estimate(&self, features: &FeatureVector) -> EstimatorResult<ClosureEstimate> {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        Ok(ClosureEstimate::from_probability(0.99, vec![], features, "stalled"))
    }
}

struct OvershootingModel;

#[async_trait]
impl ClosureEstimator for OvershootingModel {
    fn name(&self) -> &str {
        "overshooting"
    }

    async fn estimate(&self, features: &FeatureVector) -> EstimatorResult<ClosureEstimate> {
        let mut estimate = ClosureEstimate::from_probability(0.9, vec![], features, "uncalibrated");
        estimate.probability = 1.7;
        Ok(estimate)
    }
}

async fn identify_with(engine: &GapWorkflowEngine) -> Gap {
    engine
        .identify_gap(
            MemberId::new("M9"),
            MeasureId::new("COL"),
            GapReason::ProviderDelay,
            Utc::now() + Duration::days(70),
            GapContext::default(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_failing_estimator_uses_heuristic() {
    let engine = GapWorkflowEngine::new(EngineConfig::default()).with_estimator(
        ResilientEstimator::new(Arc::new(BrokenModel), std::time::Duration::from_millis(100)),
    );
    let gap = identify_with(&engine).await;
    assert!((gap.closure_probability - 0.45).abs() < 1e-9);
    assert_eq!(gap.probability_source, ProbabilitySource::Heuristic);
    assert_eq!(engine.prediction_summary().fallback_rate, 1.0);
}

#[tokio::test]
async fn test_out_of_range_estimate_is_never_stored() {
    let engine = GapWorkflowEngine::new(EngineConfig::default()).with_estimator(
        ResilientEstimator::new(Arc::new(OvershootingModel), std::time::Duration::from_millis(100)),
    );
    let gap = identify_with(&engine).await;
    assert!((0.0..=1.0).contains(&gap.closure_probability));
    assert!((gap.closure_probability - 0.45).abs() < 1e-9);
    assert_eq!(gap.probability_source, ProbabilitySource::Heuristic);

    let stored = engine.reader().get_gap(&gap.gap_id).await.unwrap().unwrap();
    assert_eq!(stored.closure_probability, gap.closure_probability);
}

#[tokio::test]
async fn test_slow_estimator_times_out_to_heuristic() {
    let engine = GapWorkflowEngine::new(EngineConfig::default()).with_estimator(
        ResilientEstimator::new(Arc::new(StalledModel), std::time::Duration::from_millis(50)),
    );
    let gap = identify_with(&engine).await;
    assert!((gap.closure_probability - 0.45).abs() < 1e-9);
    assert_eq!(gap.probability_source, ProbabilitySource::Heuristic);
}

#[tokio::test]
async fn test_missing_model_file_still_identifies() {
    let config = EngineConfig {
        estimator: EstimatorConfig {
            model_path: Some("/nonexistent/closure-model.json".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    let engine = GapWorkflowEngine::new(config);
    let gap = identify_with(&engine).await;
    assert!((0.0..=1.0).contains(&gap.closure_probability));
    assert_eq!(gap.probability_source, ProbabilitySource::Heuristic);
}

#[tokio::test]
async fn test_model_file_drives_probability() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    let weights = serde_json::json!({
        "version": "lr-test",
        "intercept": 2.0,
        "features": { "reason_provider_delay": { "weight": 0.0 } }
    });
    write!(file, "{weights}").unwrap();

    let config = EngineConfig {
        estimator: EstimatorConfig {
            model_path: Some(file.path().to_path_buf()),
            ..Default::default()
        },
        ..Default::default()
    };
    let engine = GapWorkflowEngine::new(config);
    let gap = identify_with(&engine).await;

    let expected = 1.0 / (1.0 + (-2.0f64).exp());
    assert!((gap.closure_probability - expected).abs() < 1e-9);
    assert_eq!(gap.probability_source, ProbabilitySource::Model);
}
