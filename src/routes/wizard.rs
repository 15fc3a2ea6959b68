// ABOUTME: Session-scoped wizard routes exposing the state store over HTTP
// ABOUTME: Create, inspect, mutate, gated advance, uploads, generation and JSON export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! Wizard session routes
//!
//! Every session lives in memory only. A service call runs on a snapshot
//! taken when it starts; only its outcome is merged back into the live
//! store, so actions dispatched meanwhile are kept. A second call on the
//! same session while one is in flight is refused with 409.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use super::uploads::{posture_views, read_image_parts, report_image};
use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use crate::services::program::ProgramExport;
use crate::wizard::{PosturePatch, WizardAction, WizardFlow, WizardState};

/// Created session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSession {
    id: Uuid,
    state: WizardState,
}

/// Result of a gated advance
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdvanceOutcome {
    advanced: bool,
    state: WizardState,
}

/// Wizard routes handler
pub struct WizardRoutes;

impl WizardRoutes {
    /// Create all wizard session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/wizard", post(Self::handle_create))
            .route(
                "/api/wizard/:id",
                get(Self::handle_get).delete(Self::handle_delete),
            )
            .route("/api/wizard/:id/actions", post(Self::handle_action))
            .route("/api/wizard/:id/next", post(Self::handle_next))
            .route(
                "/api/wizard/:id/posture-images",
                post(Self::handle_posture_images),
            )
            .route("/api/wizard/:id/report-image", post(Self::handle_report_image))
            .route("/api/wizard/:id/program", post(Self::handle_program))
            .route("/api/wizard/:id/program/more", post(Self::handle_program_more))
            .route("/api/wizard/:id/export", get(Self::handle_export))
            .with_state(resources)
    }

    async fn handle_create(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
        let (id, state) = resources.sessions.create();
        (StatusCode::CREATED, Json(CreatedSession { id, state }))
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<Json<WizardState>> {
        Ok(Json(resources.sessions.state(id)?))
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        resources.sessions.remove(id)?;
        Ok(StatusCode::NO_CONTENT)
    }

    async fn handle_action(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(action): Json<WizardAction>,
    ) -> AppResult<Json<WizardState>> {
        let state = resources
            .sessions
            .update(id, |store| store.dispatch(action).clone())?;
        Ok(Json(state))
    }

    async fn handle_next(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<Json<AdvanceOutcome>> {
        let outcome = resources.sessions.update(id, |store| AdvanceOutcome {
            advanced: store.try_advance(),
            state: store.state().clone(),
        })?;
        Ok(Json(outcome))
    }

    /// Store the uploaded photos in their slots, then analyze all four slots
    async fn handle_posture_images(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        multipart: Multipart,
    ) -> AppResult<Json<Value>> {
        let views = posture_views(read_image_parts(multipart).await?)?;
        let call = resources.sessions.begin_call(id, |store| {
            for (view, image) in views {
                store.update_posture_submission(PosturePatch::image(view, image));
            }
            store.update_posture_submission(PosturePatch::cleared_analysis());
        })?;
        let result = resources.flow.posture_for(call.state()).await;
        let state = call.finish(|store| WizardFlow::record_posture(store, &result))?;
        let analysis = result?;
        Ok(Json(json!({
            "analysis": analysis.analysis,
            "recommendations": analysis.recommendations,
            "state": state
        })))
    }

    /// Extract the uploaded report; on failure the caller may enter data by hand
    async fn handle_report_image(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        multipart: Multipart,
    ) -> AppResult<Json<Value>> {
        let image = report_image(read_image_parts(multipart).await?)
            .ok_or_else(|| AppError::invalid_input(messages::MISSING_REPORT_IMAGE))?;

        let call = resources.sessions.begin_call(id, |_| {})?;
        let result = resources.flow.report_for(&image).await;
        let state = call.finish(|store| WizardFlow::record_report(store, &result, image))?;
        let report = result?;
        Ok(Json(json!({ "success": true, "data": report, "state": state })))
    }

    async fn handle_program(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<Json<Value>> {
        let call = resources.sessions.begin_call(id, |_| {})?;
        let result = resources.flow.program_for(call.state()).await;
        let state = call.finish(|store| WizardFlow::record_program(store, &result))?;
        let program = result?;
        Ok(Json(json!({ "success": true, "data": program, "state": state })))
    }

    async fn handle_program_more(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<Json<Value>> {
        let call = resources.sessions.begin_call(id, |_| {})?;
        let result = resources.flow.more_for(call.state()).await;
        let state = call.finish(|store| WizardFlow::record_more(store, &result))?;
        let extra = result?;
        Ok(Json(json!({
            "success": true,
            "data": { "mainWorkout": extra },
            "state": state
        })))
    }

    /// Program and table as a downloadable JSON file
    async fn handle_export(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<Response> {
        let state = resources.sessions.state(id)?;
        let program = state
            .generated_program
            .as_ref()
            .ok_or_else(|| AppError::not_found("Generated program"))?;

        let export = ProgramExport::new(program, &state.exercise_rows, Utc::now());
        let body = export.to_pretty_json()?;
        let disposition = HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            export.file_name()
        ))
        .map_err(|e| AppError::internal(format!("Invalid export file name: {e}")))?;

        Ok((
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            body,
        )
            .into_response())
    }
}
