// ABOUTME: Route module organization for the SoulFit wizard HTTP surface
// ABOUTME: Assembles health, analysis and wizard session routes with tracing, request-id, CORS and body limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! Route module for the SoulFit server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service clients and the wizard layer.

/// Stateless posture, extraction and generation endpoints
pub mod analysis;
/// Health check and readiness routes
pub mod health;
/// Multipart upload parsing
pub mod uploads;
/// Wizard session routes
pub mod wizard;

pub use analysis::AnalysisRoutes;
pub use health::HealthRoutes;
pub use wizard::WizardRoutes;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id_middleware, setup_cors};
use crate::resources::ServerResources;

/// Full application router
///
/// Layers, outermost first: CORS, request id, HTTP tracing, body limit.
pub fn router(resources: &Arc<ServerResources>) -> Router {
    let config = Arc::clone(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(AnalysisRoutes::routes(Arc::clone(resources)))
        .merge(WizardRoutes::routes(Arc::clone(resources)))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(setup_cors(&config.cors))
}
