// ABOUTME: HTTP tests for the health, analysis and wizard session routes
// ABOUTME: Drives the router in-process with oneshot requests over a scripted provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use axum::Router;
use helpers::axum_test::{AxumTestRequest, FilePart};
use helpers::scripted_llm::ScriptedLlm;
use helpers::test_utils::{
    analysis_reply, generation_request, posture_reply, program_reply, report_reply, test_app,
};
use serde_json::{json, Value};
use soulfit_server::config::GenerationStrategy;
use soulfit_server::constants::{messages, phases};
use std::sync::Arc;
use uuid::Uuid;

fn posture_parts() -> Vec<FilePart> {
    ["frontImage", "backImage", "sideImage", "bendDownImage"]
        .into_iter()
        .map(FilePart::jpeg)
        .collect()
}

async fn create_session(app: &Router) -> String {
    let response = AxumTestRequest::post("/api/wizard").send(app.clone()).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["state"]["currentStep"], 1);
    body["id"].as_str().unwrap().to_owned()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_and_ready() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (_, app) = test_app(&provider, GenerationStrategy::SingleCall);

    let health = AxumTestRequest::get("/health").send(app.clone()).await;
    assert_eq!(health.status(), 200);
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");

    let ready = AxumTestRequest::get("/ready").send(app).await;
    assert_eq!(ready.status(), 200);
    let body: Value = ready.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["provider"], "Scripted");
    assert_eq!(body["model"], "scripted-model");
    assert_eq!(body["strategy"], "single_phase");
    assert_eq!(body["sessions"], 0);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_ready_is_503_when_llm_endpoint_is_down() {
    let provider = Arc::new(ScriptedLlm::silent().unhealthy());
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);

    let ready = AxumTestRequest::get("/ready").send(app).await;
    assert_eq!(ready.status(), 503);
    let body: Value = ready.json();
    assert_eq!(body["status"], "unavailable");
    assert_eq!(body["provider"], "Scripted");
}

// ============================================================================
// Stateless analysis endpoints
// ============================================================================

#[tokio::test]
async fn test_analyze_posture_endpoint() {
    let provider = Arc::new(ScriptedLlm::new([posture_reply()]));
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);

    let response = AxumTestRequest::post("/analyze-posture")
        .multipart(&posture_parts())
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert!(body["analysis"]
        .as_str()
        .unwrap()
        .contains("Forward head posture"));
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_analyze_posture_with_three_photos_is_400() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let mut parts = posture_parts();
    parts.pop();

    let response = AxumTestRequest::post("/analyze-posture")
        .multipart(&parts)
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], messages::MISSING_POSTURE_IMAGES);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body.get("details").is_none());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_extract_body_composition_endpoint() {
    let provider = Arc::new(ScriptedLlm::new([report_reply()]));
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);

    let response = AxumTestRequest::post("/extract-body-composition")
        .multipart(&[FilePart::jpeg("reportImage")])
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["height"], 172.0);
    assert_eq!(body["data"]["weight"], 64.3);
}

#[tokio::test]
async fn test_extract_failure_reports_headline_and_details() {
    let provider = Arc::new(ScriptedLlm::new(["no table here"]));
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);

    let response = AxumTestRequest::post("/extract-body-composition")
        .multipart(&[FilePart::jpeg("reportImage")])
        .send(app)
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], messages::EXTRACTION_FAILED);
    assert_eq!(body["code"], "RESPONSE_SHAPE_ERROR");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_generate_program_endpoint() {
    let provider = Arc::new(ScriptedLlm::new([
        analysis_reply().to_string(),
        program_reply("Extends the thoracic spine").to_string(),
    ]));
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);

    let response = AxumTestRequest::post("/generate-program")
        .json(&generation_request())
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Posture Reset");
    assert_eq!(body["data"]["totalExercises"], 4);
}

#[tokio::test]
async fn test_generate_program_without_equipment_is_400() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let mut request = generation_request();
    request["selectedEquipment"] = json!([]);

    let response = AxumTestRequest::post("/generate-program")
        .json(&request)
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], messages::MISSING_EQUIPMENT);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_carries_phase() {
    let provider = Arc::new(ScriptedLlm::new([
        analysis_reply().to_string(),
        "not a program".to_owned(),
    ]));
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);

    let response = AxumTestRequest::post("/generate-program")
        .json(&generation_request())
        .send(app)
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], messages::GENERATION_FAILED);
    assert_eq!(body["phase"], phases::DESIGN);
}

// ============================================================================
// Wizard sessions
// ============================================================================

#[tokio::test]
async fn test_wizard_session_lifecycle() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (resources, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;
    assert_eq!(resources.sessions.len(), 1);

    let fetched = AxumTestRequest::get(&format!("/api/wizard/{id}"))
        .send(app.clone())
        .await;
    assert_eq!(fetched.status(), 200);

    let deleted = AxumTestRequest::delete(&format!("/api/wizard/{id}"))
        .send(app.clone())
        .await;
    assert_eq!(deleted.status(), 204);

    let missing = AxumTestRequest::get(&format!("/api/wizard/{id}"))
        .send(app)
        .await;
    assert_eq!(missing.status(), 404);
    let body: Value = missing.json();
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_next_is_gated_by_step_requirements() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;

    let refused = AxumTestRequest::post(&format!("/api/wizard/{id}/next"))
        .send(app.clone())
        .await;
    let body: Value = refused.json();
    assert_eq!(body["advanced"], false);
    assert_eq!(body["state"]["currentStep"], 1);

    let action = json!({
        "type": "updatePostureSubmission",
        "payload": { "analysis": "Neutral alignment", "recommendations": [] }
    });
    let updated = AxumTestRequest::post(&format!("/api/wizard/{id}/actions"))
        .json(&action)
        .send(app.clone())
        .await;
    assert_eq!(updated.status(), 200);

    let moved = AxumTestRequest::post(&format!("/api/wizard/{id}/next"))
        .send(app)
        .await;
    let body: Value = moved.json();
    assert_eq!(body["advanced"], true);
    assert_eq!(body["state"]["currentStep"], 2);
}

#[tokio::test]
async fn test_unknown_action_is_rejected() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;

    let response = AxumTestRequest::post(&format!("/api/wizard/{id}/actions"))
        .json(&json!({ "type": "teleport" }))
        .send(app)
        .await;

    assert!(response.status() >= 400 && response.status() < 500);
}

#[tokio::test]
async fn test_posture_upload_stores_analysis() {
    let provider = Arc::new(ScriptedLlm::new([posture_reply()]));
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;

    let response = AxumTestRequest::post(&format!("/api/wizard/{id}/posture-images"))
        .multipart(&posture_parts())
        .send(app.clone())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);
    assert!(body["state"]["postureSubmission"]["analysis"].is_string());
    assert_eq!(body["state"]["isLoading"], false);

    let moved = AxumTestRequest::post(&format!("/api/wizard/{id}/next"))
        .send(app)
        .await;
    let body: Value = moved.json();
    assert_eq!(body["advanced"], true);
}

#[tokio::test]
async fn test_failed_posture_upload_records_error_on_session() {
    let provider = Arc::new(ScriptedLlm::new(["  "]));
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;

    let response = AxumTestRequest::post(&format!("/api/wizard/{id}/posture-images"))
        .multipart(&posture_parts())
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 500);

    let state: Value = AxumTestRequest::get(&format!("/api/wizard/{id}"))
        .send(app)
        .await
        .json();
    assert_eq!(state["error"], messages::POSTURE_FAILED);
    assert_eq!(state["isLoading"], false);
}

#[tokio::test]
async fn test_failed_posture_rerun_drops_previous_analysis() {
    let provider = Arc::new(ScriptedLlm::new([posture_reply(), "  ".to_owned()]));
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;
    let uri = format!("/api/wizard/{id}/posture-images");

    let first = AxumTestRequest::post(&uri)
        .multipart(&posture_parts())
        .send(app.clone())
        .await;
    assert_eq!(first.status(), 200);

    let second = AxumTestRequest::post(&uri)
        .multipart(&posture_parts())
        .send(app.clone())
        .await;
    assert_eq!(second.status(), 500);

    let state: Value = AxumTestRequest::get(&format!("/api/wizard/{id}"))
        .send(app.clone())
        .await
        .json();
    assert!(state["postureSubmission"]["analysis"].is_null());
    assert!(state["postureSubmission"]["recommendations"].is_null());
    assert_eq!(state["error"], messages::POSTURE_FAILED);

    let moved: Value = AxumTestRequest::post(&format!("/api/wizard/{id}/next"))
        .send(app)
        .await
        .json();
    assert_eq!(moved["advanced"], false);
}

#[tokio::test]
async fn test_call_on_busy_session_is_409() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;

    AxumTestRequest::post(&format!("/api/wizard/{id}/actions"))
        .json(&json!({ "type": "setLoading", "payload": true }))
        .send(app.clone())
        .await;

    let response = AxumTestRequest::post(&format!("/api/wizard/{id}/program"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json();
    assert_eq!(body["code"], "RESOURCE_LOCKED");
    assert_eq!(provider.calls(), 0);

    let state: Value = AxumTestRequest::get(&format!("/api/wizard/{id}"))
        .send(app)
        .await
        .json();
    assert_eq!(state["isLoading"], true);
}

#[tokio::test]
async fn test_report_upload_without_image_is_400() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;

    let response = AxumTestRequest::post(&format!("/api/wizard/{id}/report-image"))
        .multipart(&[])
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], messages::MISSING_REPORT_IMAGE);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_export_requires_program() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;

    let response = AxumTestRequest::get(&format!("/api/wizard/{id}/export"))
        .send(app)
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_program_generation_and_export() {
    let provider = Arc::new(ScriptedLlm::new([
        analysis_reply().to_string(),
        program_reply("Extends the thoracic spine").to_string(),
    ]));
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);
    let id = create_session(&app).await;

    let actions = [
        json!({ "type": "updatePostureSubmission", "payload": { "analysis": "Forward head posture" } }),
        json!({ "type": "updateHealthAssessment", "payload": { "bodyCompositionReport": { "height": 168.0, "weight": 60.0 } } }),
        json!({ "type": "updateSelectedEquipment", "payload": ["Mat"] }),
    ];
    for action in &actions {
        let response = AxumTestRequest::post(&format!("/api/wizard/{id}/actions"))
            .json(action)
            .send(app.clone())
            .await;
        assert_eq!(response.status(), 200);
    }

    let generated = AxumTestRequest::post(&format!("/api/wizard/{id}/program"))
        .send(app.clone())
        .await;
    assert_eq!(generated.status(), 200);
    let body: Value = generated.json();
    assert_eq!(body["state"]["exerciseRows"].as_array().unwrap().len(), 4);

    let export = AxumTestRequest::get(&format!("/api/wizard/{id}/export"))
        .send(app)
        .await;
    assert_eq!(export.status(), 200);
    let disposition = export.header("content-disposition").unwrap();
    assert!(disposition.starts_with("attachment; filename=\"soulfit-program-"));
    assert!(disposition.ends_with(".json\""));
    let body: Value = export.json();
    assert_eq!(body["generatedProgram"]["title"], "Posture Reset");
    assert_eq!(body["exercises"][0]["no"], 1);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let provider = Arc::new(ScriptedLlm::silent());
    let (_, app) = test_app(&provider, GenerationStrategy::TwoPhase);

    let uri = format!("/api/wizard/{}/program", Uuid::new_v4());
    let response = AxumTestRequest::post(&uri).send(app).await;

    assert_eq!(response.status(), 404);
}
