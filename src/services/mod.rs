// ABOUTME: Service clients wrapping the LLM calls behind each wizard step
// ABOUTME: Posture analysis, body-composition extraction and Pilates program generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! Service client layer
//!
//! Each client validates its inputs before any network call, sends one
//! structured request per call (two for two-phase generation) and decides
//! how strictly to treat a reply that does not match its schema.

/// Body-composition report extraction
pub mod body_composition;

/// Posture findings and recommendation rules
pub mod posture;

/// Program generation strategies, catalog and exercise table
pub mod program;

pub use body_composition::BodyCompositionExtractor;
pub use posture::{PostureAnalysis, PostureAnalyzer};
pub use program::{GenerationRequest, ProgramGenerator};

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatRequest, LlmProvider};
use crate::logging::AppLogger;

/// Send one request and return the trimmed reply text
///
/// An empty reply is a service failure: there is nothing to parse or
/// degrade to.
async fn complete_text(
    provider: &dyn LlmProvider,
    request: &ChatRequest,
    operation: &str,
) -> AppResult<String> {
    let response = provider.complete(request).await?;
    AppLogger::log_llm_call(
        operation,
        &response.model,
        request.image_count(),
        response.content.len(),
    );

    let content = response.content.trim();
    if content.is_empty() {
        return Err(AppError::external_service(
            provider.display_name(),
            format!("{operation}: empty reply"),
        ));
    }
    Ok(content.to_owned())
}
