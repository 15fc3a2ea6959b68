// ABOUTME: Health check route handlers for liveness and readiness checks
// ABOUTME: Reports service status, version and the active generation strategy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! Health check routes
//!
//! `/health` never touches the model provider. `/ready` checks the
//! provider endpoint and reports the model and generation strategy the
//! server was started with; it answers 503 while the endpoint is down.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::constants::service_names::SOULFIT_SERVER;
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": SOULFIT_SERVER,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339()
        }))
    }

    async fn handle_ready(
        State(resources): State<Arc<ServerResources>>,
    ) -> (StatusCode, Json<Value>) {
        let reachable = match resources.provider.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e.message, "LLM endpoint health check failed");
                false
            }
        };
        let (status, label) = if reachable {
            (StatusCode::OK, "ready")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        };

        let body = json!({
            "status": label,
            "provider": resources.provider.display_name(),
            "model": resources.provider.default_model(),
            "strategy": resources.config.generation.strategy.as_str(),
            "sessions": resources.sessions.len(),
            "timestamp": Utc::now().to_rfc3339()
        });
        (status, Json(body))
    }
}
