// ABOUTME: Stateless analysis endpoints for posture, report extraction and program generation
// ABOUTME: Thin handlers that parse the request and delegate to the service clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! Analysis routes
//!
//! These endpoints carry no session: the caller sends everything the
//! service needs with each request.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::uploads::{read_image_parts, report_image};
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::{GenerationRequest, PostureAnalysis};
use soulfit_core::models::UploadedImage;

/// Analysis routes handler
pub struct AnalysisRoutes;

impl AnalysisRoutes {
    /// Create all analysis routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/analyze-posture", post(Self::handle_analyze_posture))
            .route(
                "/extract-body-composition",
                post(Self::handle_extract_body_composition),
            )
            .route("/generate-program", post(Self::handle_generate_program))
            .with_state(resources)
    }

    /// `{ analysis, recommendations }` for four uploaded photos
    async fn handle_analyze_posture(
        State(resources): State<Arc<ServerResources>>,
        multipart: Multipart,
    ) -> Result<Json<PostureAnalysis>, AppError> {
        let parts = read_image_parts(multipart).await?;
        let images: Vec<&UploadedImage> = parts.iter().map(|part| &part.image).collect();
        let analysis = resources.flow.posture().analyze(&images).await?;
        Ok(Json(analysis))
    }

    /// `{ success, data }` with the extracted report
    async fn handle_extract_body_composition(
        State(resources): State<Arc<ServerResources>>,
        multipart: Multipart,
    ) -> Result<Json<Value>, AppError> {
        let image = report_image(read_image_parts(multipart).await?);
        let report = resources.flow.extractor().extract(image.as_ref()).await?;
        Ok(Json(json!({ "success": true, "data": report })))
    }

    /// `{ success, data }` with the accepted program, or with
    /// `{ mainWorkout }` when more exercises were requested
    async fn handle_generate_program(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<GenerationRequest>,
    ) -> Result<Json<Value>, AppError> {
        let generator = resources.flow.generator();
        if request.request_more_exercises {
            let extra = generator
                .generate_more(&request, &request.existing_exercises)
                .await?;
            return Ok(Json(json!({
                "success": true,
                "data": { "mainWorkout": extra }
            })));
        }

        let program = generator.generate(&request).await?;
        Ok(Json(json!({ "success": true, "data": program })))
    }
}
