// ABOUTME: Integration tests for Pilates program generation in both strategies
// ABOUTME: Covers preconditions, phase tagging, reasoning enforcement, catalog expansion and extra exercises
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use helpers::scripted_llm::ScriptedLlm;
use helpers::test_utils::{analysis_reply, generation_request, more_reply, program_reply};
use serde_json::json;
use soulfit_server::config::{GenerationConfig, GenerationStrategy, UnresolvedExercisePolicy};
use soulfit_server::constants::{messages, phases};
use soulfit_server::errors::{AppError, ErrorCode};
use soulfit_server::llm::LlmProvider;
use soulfit_server::models::{Difficulty, Equipment};
use soulfit_server::services::program::{CatalogExercise, ExerciseCatalog};
use soulfit_server::services::{GenerationRequest, ProgramGenerator};
use std::sync::Arc;

fn settings(strategy: GenerationStrategy) -> GenerationConfig {
    GenerationConfig {
        strategy,
        response_language: "English".to_owned(),
        ..GenerationConfig::default()
    }
}

fn generator(provider: &Arc<ScriptedLlm>, settings: GenerationConfig) -> ProgramGenerator {
    ProgramGenerator::new(Arc::clone(provider) as Arc<dyn LlmProvider>, settings)
}

fn request() -> GenerationRequest {
    serde_json::from_value(generation_request()).unwrap()
}

fn catalog_pick(id: &str, reasoning: &str) -> serde_json::Value {
    json!({
        "exerciseId": id,
        "description": "Controlled movement",
        "duration": 3,
        "repetitions": 8,
        "sets": 2,
        "targetAreas": ["Upper back"],
        "difficulty": "easy",
        "modifications": [],
        "reasoning": reasoning
    })
}

fn catalog_session(main_id: &str) -> String {
    json!({
        "title": "Catalog Session",
        "duration": 45,
        "warmUp": [catalog_pick("mat-breathing", "Sets up breathing pattern")],
        "mainWorkout": [catalog_pick(main_id, "Opens the chest for rounded shoulders")],
        "coolDown": [catalog_pick("mat-childs-pose", "Releases the lower back")],
        "reasoning": "Mobility first, then extension strength",
        "targetedIssues": ["Rounded shoulders"],
        "expectedOutcomes": ["Open chest"],
        "progressionTips": ["Add springs"]
    })
    .to_string()
}

// ============================================================================
// Preconditions
// ============================================================================

#[tokio::test]
async fn test_empty_equipment_rejected_without_call() {
    let provider = Arc::new(ScriptedLlm::silent());
    let mut request = request();
    request.selected_equipment.clear();

    let error = generator(&provider, settings(GenerationStrategy::TwoPhase))
        .generate(&request)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(error.message, messages::MISSING_EQUIPMENT);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_empty_equipment_allowed_when_not_required() {
    let provider = Arc::new(ScriptedLlm::new([
        analysis_reply().to_string(),
        program_reply("Extends the thoracic spine").to_string(),
    ]));
    let mut request = request();
    request.selected_equipment.clear();
    let settings = GenerationConfig {
        require_equipment: false,
        ..settings(GenerationStrategy::TwoPhase)
    };

    generator(&provider, settings).generate(&request).await.unwrap();

    let prompt = &provider.requests()[1].messages[1].content;
    assert!(prompt.contains("Equipment Available: Mat"));
}

#[tokio::test]
async fn test_missing_posture_analysis_rejected() {
    let provider = Arc::new(ScriptedLlm::silent());
    let mut request = request();
    request.posture_analysis = Some("   ".to_owned());

    let error = generator(&provider, settings(GenerationStrategy::TwoPhase))
        .generate(&request)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::MissingRequiredField);
    assert_eq!(error.message, messages::MISSING_POSTURE_ANALYSIS);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_empty_catalog_for_selection_is_no_exercises_available() {
    let provider = Arc::new(ScriptedLlm::silent());
    let mat_only = ExerciseCatalog::new(vec![CatalogExercise {
        id: "mat-hundred".to_owned(),
        name: "The Hundred".to_owned(),
        equipment: Equipment::Mat,
        difficulty: Difficulty::Medium,
        focus: vec!["core".to_owned()],
    }]);
    let mut request = request();
    request.selected_equipment = vec![Equipment::Cadillac];

    let error = generator(&provider, settings(GenerationStrategy::SingleCall))
        .with_catalog(mat_only)
        .generate(&request)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::NoExercisesAvailable);
    assert_eq!(error.http_status(), 422);
    assert_eq!(provider.calls(), 0);
}

// ============================================================================
// Two-phase strategy
// ============================================================================

#[tokio::test]
async fn test_two_phase_embeds_analysis_and_accepts() {
    let provider = Arc::new(ScriptedLlm::new([
        analysis_reply().to_string(),
        program_reply("Extends the thoracic spine").to_string(),
    ]));

    let program = generator(&provider, settings(GenerationStrategy::TwoPhase))
        .generate(&request())
        .await
        .unwrap();

    assert!(program.id.starts_with("program_"));
    assert!(program.created_at.is_some());
    assert_eq!(program.total_exercises, 4);
    let analysis = program.comprehensive_analysis.unwrap();
    assert_eq!(
        analysis.movement_assessment.primary_dysfunctions,
        vec!["Forward head posture"]
    );

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].response_format.as_ref().unwrap().name,
        "comprehensive_analysis"
    );
    assert_eq!(requests[1].response_format.as_ref().unwrap().name, "pilates_program");
    assert!(requests[1].messages[1].content.contains("45-minute"));
    assert!(requests[1].messages[1].content.contains("Forward head posture"));
}

#[tokio::test]
async fn test_two_phase_rejects_unreasoned_exercise() {
    let provider = Arc::new(ScriptedLlm::new([
        analysis_reply().to_string(),
        program_reply("  ").to_string(),
    ]));

    let error = generator(&provider, settings(GenerationStrategy::TwoPhase))
        .generate(&request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ResponseShape);
    assert!(error.message.contains("Swan Prep"));
    assert_eq!(error.context.phase.as_deref(), Some(phases::DESIGN));
    assert_eq!(error.context.headline.as_deref(), Some(messages::GENERATION_FAILED));
}

#[tokio::test]
async fn test_two_phase_tags_analysis_failure() {
    let provider = Arc::new(
        ScriptedLlm::silent().then_fail(AppError::external_service("Scripted", "rate limited")),
    );

    let error = generator(&provider, settings(GenerationStrategy::TwoPhase))
        .generate(&request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalServiceError);
    assert_eq!(error.context.phase.as_deref(), Some(phases::ANALYSIS));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_two_phase_tags_unparseable_design() {
    let provider = Arc::new(ScriptedLlm::new([
        analysis_reply().to_string(),
        "Here is your program: ...".to_owned(),
    ]));

    let error = generator(&provider, settings(GenerationStrategy::TwoPhase))
        .generate(&request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ResponseShape);
    assert_eq!(error.context.phase.as_deref(), Some(phases::DESIGN));
}

#[tokio::test]
async fn test_two_phase_generate_more() {
    let provider = Arc::new(ScriptedLlm::new([more_reply().to_string()]));
    let existing = vec!["Swan Prep".to_owned(), "Chest Lift".to_owned()];

    let extra = generator(&provider, settings(GenerationStrategy::TwoPhase))
        .generate_more(&request(), &existing)
        .await
        .unwrap();

    assert_eq!(extra.len(), 1);
    assert_eq!(extra[0].name, "Swimming");
    let prompt = &provider.requests()[0].messages[1].content;
    assert!(prompt.contains("Swan Prep, Chest Lift"));
}

#[tokio::test]
async fn test_generate_more_rejects_empty_reply_list() {
    let provider = Arc::new(ScriptedLlm::new([json!({ "mainWorkout": [] }).to_string()]));

    let error = generator(&provider, settings(GenerationStrategy::TwoPhase))
        .generate_more(&request(), &[])
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ResponseShape);
    assert_eq!(
        error.context.headline.as_deref(),
        Some(messages::GENERATE_MORE_FAILED)
    );
}

// ============================================================================
// Single-call strategy
// ============================================================================

#[tokio::test]
async fn test_single_call_expands_catalog_ids() {
    let provider = Arc::new(ScriptedLlm::new([catalog_session("Reformer-Chest-Expansion")]));

    let program = generator(&provider, settings(GenerationStrategy::SingleCall))
        .generate(&request())
        .await
        .unwrap();

    assert_eq!(program.main_workout[0].name, "Chest Expansion");
    assert_eq!(program.main_workout[0].equipment, vec!["Reformer"]);
    assert_eq!(program.warm_up[0].name, "Pilates Breathing");
    assert!(program.comprehensive_analysis.is_none());
    assert_eq!(program.total_exercises, 3);

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].response_format.as_ref().unwrap().name, "pilates_session");
    let prompt = &requests[0].messages[1].content;
    assert!(prompt.contains("reformer-chest-expansion"));
    assert!(!prompt.contains("cadillac-tower"));
}

#[tokio::test]
async fn test_single_call_unknown_id_placeholder() {
    let provider = Arc::new(ScriptedLlm::new([catalog_session("mat-invented-move")]));

    let program = generator(&provider, settings(GenerationStrategy::SingleCall))
        .generate(&request())
        .await
        .unwrap();

    assert_eq!(program.main_workout[0].name, "mat-invented-move");
    assert_eq!(program.main_workout[0].equipment, vec!["Unknown"]);
}

#[tokio::test]
async fn test_single_call_unknown_id_rejected_by_policy() {
    let provider = Arc::new(ScriptedLlm::new([catalog_session("mat-invented-move")]));
    let settings = GenerationConfig {
        unresolved_exercises: UnresolvedExercisePolicy::Reject,
        ..settings(GenerationStrategy::SingleCall)
    };

    let error = generator(&provider, settings)
        .generate(&request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ResponseShape);
    assert!(error.message.contains("mat-invented-move"));
    assert_eq!(error.context.phase, None);
}
