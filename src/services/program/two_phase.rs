// ABOUTME: Two-phase program generation, movement analysis first and program design second
// ABOUTME: Embeds the phase-one analysis in the program and tags failures with their phase
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time;
use tracing::{debug, info};

use super::{more_schema, session_schema, string_array, GenerationRequest, MoreExercises, ProgramGenerator};
use crate::constants::{phases, token_budgets};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{language_instruction, MOVEMENT_ANALYST_PROMPT, PROGRAM_DESIGNER_PROMPT};
use crate::llm::{ChatMessage, ChatRequest, ResponseFormat};
use crate::logging::AppLogger;
use crate::services::complete_text;
use soulfit_core::models::{ComprehensiveAnalysis, Exercise, GeneratedProgram};

const ANALYSIS_OPERATION: &str = "program analysis";
const DESIGN_OPERATION: &str = "program design";
const MORE_OPERATION: &str = "additional exercises";

fn object(properties: &Value) -> Value {
    let required: Vec<String> = properties
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Schema of the phase-one reply
pub(super) fn comprehensive_analysis_schema() -> Value {
    let text = json!({ "type": "string" });
    object(&json!({
        "movement_assessment": object(&json!({
            "primary_dysfunctions": string_array(),
            "muscle_imbalances": string_array(),
            "postural_deviations": string_array(),
            "mobility_restrictions": string_array(),
            "postural_description": text
        })),
        "health_considerations": object(&json!({
            "body_composition_insights": text,
            "strength_levels": text,
            "risk_factors": string_array(),
            "exercise_contraindications": string_array()
        })),
        "priority_areas": object(&json!({
            "immediate_focus": string_array(),
            "secondary_goals": string_array(),
            "long_term_objectives": string_array()
        })),
        "pilates_strategy": object(&json!({
            "key_principles": string_array(),
            "optimal_exercise_types": string_array(),
            "progression_approach": text,
            "session_structure_rationale": text
        }))
    }))
}

fn parse<T: DeserializeOwned>(raw: &str, operation: &str) -> AppResult<T> {
    serde_json::from_str(raw).map_err(|e| {
        AppLogger::log_unparseable_reply(operation, &e.to_string(), raw);
        AppError::response_shape(format!("{operation}: reply is not the expected JSON: {e}"))
    })
}

fn analysis_prompt(request: &GenerationRequest, analysis: &str) -> AppResult<String> {
    Ok(format!(
        "Perform a comprehensive analysis of this user's movement, health and goals before any exercise is chosen.\n\n\
         POSTURE ANALYSIS RESULTS:\n{analysis}\n\n\
         POSTURE RECOMMENDATIONS: {}\n\n\
         HEALTH ASSESSMENT DATA:\n{}\n\n\
         USER GOALS & PREFERENCES:\n{}\n\n\
         Identify movement dysfunctions, health considerations, priority areas and the Pilates strategy that fits this user.",
        request.recommendations.join(", "),
        request.health_json()?,
        request.goals_json()?,
    ))
}

fn design_prompt(
    request: &GenerationRequest,
    analysis: &ComprehensiveAnalysis,
    language: &str,
) -> AppResult<String> {
    let minutes = request.user_goals.available_time.minutes();
    Ok(format!(
        "Based on this comprehensive analysis, design a specific {minutes}-minute Pilates program.\n\n\
         COMPREHENSIVE ANALYSIS:\n{}\n\n\
         ORIGINAL USER DATA:\n{}\n\n\
         Structure the session as a warm-up, a main workout and a cool-down. \
         Main-workout exercises must state sets and the apparatus they use.\n\
         For EACH exercise, explain WHY it was chosen based on the analysis. {}",
        serde_json::to_string_pretty(analysis)?,
        request.goals_summary(),
        language_instruction(language),
    ))
}

fn more_prompt(
    request: &GenerationRequest,
    analysis: &str,
    existing: &[String],
    language: &str,
) -> String {
    format!(
        "Suggest additional main-workout Pilates exercises for this user.\n\n\
         POSTURE ANALYSIS RESULTS:\n{analysis}\n\n\
         USER DATA:\n{}\n\n\
         EXERCISES ALREADY IN THE PROGRAM (do not repeat): {}\n\n\
         For EACH exercise, explain WHY it was chosen for this user. {}",
        request.goals_summary(),
        if existing.is_empty() {
            "none".to_owned()
        } else {
            existing.join(", ")
        },
        language_instruction(language),
    )
}

fn structured(system: &str, prompt: String, name: &str, schema: Value) -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(prompt)])
        .with_max_tokens(token_budgets::PROGRAM_GENERATION)
        .with_response_format(ResponseFormat::strict(name, schema))
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        debug!(delay_ms = delay.as_millis(), "Pausing between generation phases");
        time::sleep(delay).await;
    }
}

/// Phase one: movement and health analysis
async fn analyze(
    generator: &ProgramGenerator,
    request: &GenerationRequest,
    analysis: &str,
) -> AppResult<ComprehensiveAnalysis> {
    let prompt = analysis_prompt(request, analysis)?;
    let chat = structured(
        MOVEMENT_ANALYST_PROMPT,
        prompt,
        "comprehensive_analysis",
        comprehensive_analysis_schema(),
    );
    let raw = complete_text(generator.provider.as_ref(), &chat, ANALYSIS_OPERATION).await?;
    parse(&raw, ANALYSIS_OPERATION)
}

/// Phase two: program design guided by the analysis
async fn design(
    generator: &ProgramGenerator,
    request: &GenerationRequest,
    analysis: &ComprehensiveAnalysis,
) -> AppResult<GeneratedProgram> {
    let prompt = design_prompt(request, analysis, &generator.settings.response_language)?;
    let chat = structured(
        PROGRAM_DESIGNER_PROMPT,
        prompt,
        "pilates_program",
        session_schema("name", true),
    );
    let raw = complete_text(generator.provider.as_ref(), &chat, DESIGN_OPERATION).await?;
    parse(&raw, DESIGN_OPERATION)
}

/// Run both phases and embed the analysis in the designed program
pub(super) async fn generate(
    generator: &ProgramGenerator,
    request: &GenerationRequest,
    analysis: &str,
) -> AppResult<GeneratedProgram> {
    let comprehensive = analyze(generator, request, analysis)
        .await
        .map_err(|e| e.with_phase(phases::ANALYSIS))?;
    info!(
        dysfunctions = comprehensive.movement_assessment.primary_dysfunctions.len(),
        immediate_focus = comprehensive.priority_areas.immediate_focus.len(),
        "Phase 1 analysis complete"
    );

    pause(generator.settings.phase_delay).await;

    let mut program = design(generator, request, &comprehensive)
        .await
        .map_err(|e| e.with_phase(phases::DESIGN))?;
    program.comprehensive_analysis = Some(comprehensive);
    Ok(program)
}

/// Additional main-workout exercises with full text
pub(super) async fn more(
    generator: &ProgramGenerator,
    request: &GenerationRequest,
    analysis: &str,
    existing: &[String],
) -> AppResult<Vec<Exercise>> {
    let prompt = more_prompt(
        request,
        analysis,
        existing,
        &generator.settings.response_language,
    );
    let chat = structured(
        PROGRAM_DESIGNER_PROMPT,
        prompt,
        "additional_exercises",
        more_schema("name"),
    );
    let raw = complete_text(generator.provider.as_ref(), &chat, MORE_OPERATION).await?;
    let reply: MoreExercises<Exercise> = parse(&raw, MORE_OPERATION)?;
    Ok(reply.main_workout)
}
