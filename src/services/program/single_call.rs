// ABOUTME: Single-call program generation choosing exercises from the built-in catalog
// ABOUTME: Expands model-chosen identifiers into names and apparatus under the unresolved-id policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use serde::Deserialize;
use tracing::warn;

use super::{more_schema, session_schema, ExerciseCatalog, GenerationRequest, MoreExercises, ProgramGenerator};
use crate::config::UnresolvedExercisePolicy;
use crate::constants::{program::UNKNOWN_EQUIPMENT_LABEL, token_budgets};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{language_instruction, CATALOG_DESIGNER_PROMPT};
use crate::llm::{ChatMessage, ChatRequest, ResponseFormat};
use crate::logging::AppLogger;
use crate::services::complete_text;
use soulfit_core::models::{Difficulty, Exercise, GeneratedProgram};

const OPERATION: &str = "catalog program";
const MORE_OPERATION: &str = "catalog additional exercises";
const IDENTITY: &str = "exerciseId";

/// One exercise picked from the catalog
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogChoice {
    exercise_id: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    repetitions: Option<u32>,
    #[serde(default)]
    sets: Option<u32>,
    #[serde(default)]
    target_areas: Vec<String>,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    modifications: Vec<String>,
    #[serde(default)]
    reasoning: String,
}

/// Session built from catalog picks
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogSession {
    #[serde(default)]
    title: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    warm_up: Vec<CatalogChoice>,
    #[serde(default)]
    main_workout: Vec<CatalogChoice>,
    #[serde(default)]
    cool_down: Vec<CatalogChoice>,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    targeted_issues: Vec<String>,
    #[serde(default)]
    expected_outcomes: Vec<String>,
    #[serde(default)]
    progression_tips: Vec<String>,
}

/// Turn a catalog pick into a full exercise
///
/// Apparatus always comes from the catalog, never from the model.
fn expand(
    choice: CatalogChoice,
    catalog: &ExerciseCatalog,
    policy: UnresolvedExercisePolicy,
) -> AppResult<Exercise> {
    let (name, equipment) = match catalog.resolve(&choice.exercise_id) {
        Some(entry) => (entry.name.clone(), vec![entry.equipment.as_str().to_owned()]),
        None => match policy {
            UnresolvedExercisePolicy::Placeholder => {
                warn!(
                    exercise_id = %choice.exercise_id,
                    "Model chose an exercise outside the catalog, keeping a placeholder"
                );
                (
                    choice.exercise_id.clone(),
                    vec![UNKNOWN_EQUIPMENT_LABEL.to_owned()],
                )
            }
            UnresolvedExercisePolicy::Reject => {
                return Err(AppError::response_shape(format!(
                    "Model chose exercise '{}' which is not in the catalog",
                    choice.exercise_id
                )));
            }
        },
    };

    Ok(Exercise {
        name,
        description: choice.description,
        duration: choice.duration,
        repetitions: choice.repetitions,
        sets: choice.sets,
        target_areas: choice.target_areas,
        difficulty: choice.difficulty,
        modifications: choice.modifications,
        equipment,
        reasoning: choice.reasoning,
    })
}

fn expand_all(
    choices: Vec<CatalogChoice>,
    catalog: &ExerciseCatalog,
    policy: UnresolvedExercisePolicy,
) -> AppResult<Vec<Exercise>> {
    choices
        .into_iter()
        .map(|choice| expand(choice, catalog, policy))
        .collect()
}

fn into_program(
    session: CatalogSession,
    catalog: &ExerciseCatalog,
    policy: UnresolvedExercisePolicy,
) -> AppResult<GeneratedProgram> {
    Ok(GeneratedProgram {
        title: session.title,
        duration: session.duration,
        warm_up: expand_all(session.warm_up, catalog, policy)?,
        main_workout: expand_all(session.main_workout, catalog, policy)?,
        cool_down: expand_all(session.cool_down, catalog, policy)?,
        reasoning: session.reasoning,
        targeted_issues: session.targeted_issues,
        expected_outcomes: session.expected_outcomes,
        progression_tips: session.progression_tips,
        ..GeneratedProgram::default()
    })
}

fn parse<T: for<'de> Deserialize<'de>>(raw: &str, operation: &str) -> AppResult<T> {
    serde_json::from_str(raw).map_err(|e| {
        AppLogger::log_unparseable_reply(operation, &e.to_string(), raw);
        AppError::response_shape(format!("{operation}: reply is not the expected JSON: {e}"))
    })
}

fn catalog_prompt(
    request: &GenerationRequest,
    analysis: &str,
    catalog: &ExerciseCatalog,
    language: &str,
) -> AppResult<String> {
    Ok(format!(
        "Design a {}-minute Pilates session for this user using ONLY exercises from the catalog below. \
         Refer to each exercise by its id in the exerciseId field.\n\n\
         POSTURE ANALYSIS RESULTS:\n{analysis}\n\n\
         POSTURE RECOMMENDATIONS: {}\n\n\
         HEALTH ASSESSMENT DATA:\n{}\n\n\
         USER DATA:\n{}\n\n\
         CATALOG (id | name | apparatus | difficulty | focus):\n{}\n\n\
         For EACH exercise, explain WHY it was chosen for this user. {}",
        request.user_goals.available_time.minutes(),
        request.recommendations.join(", "),
        request.health_json()?,
        request.goals_summary(),
        catalog.prompt_listing(),
        language_instruction(language),
    ))
}

fn more_prompt(
    request: &GenerationRequest,
    analysis: &str,
    existing: &[String],
    catalog: &ExerciseCatalog,
    language: &str,
) -> String {
    format!(
        "Pick additional main-workout exercises for this user using ONLY the catalog below. \
         Refer to each exercise by its id in the exerciseId field.\n\n\
         POSTURE ANALYSIS RESULTS:\n{analysis}\n\n\
         USER DATA:\n{}\n\n\
         EXERCISES ALREADY IN THE PROGRAM (do not repeat): {}\n\n\
         CATALOG (id | name | apparatus | difficulty | focus):\n{}\n\n\
         For EACH exercise, explain WHY it was chosen for this user. {}",
        request.goals_summary(),
        if existing.is_empty() {
            "none".to_owned()
        } else {
            existing.join(", ")
        },
        catalog.prompt_listing(),
        language_instruction(language),
    )
}

fn structured(prompt: String, name: &str, schema: serde_json::Value) -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system(CATALOG_DESIGNER_PROMPT),
        ChatMessage::user(prompt),
    ])
    .with_max_tokens(token_budgets::PROGRAM_GENERATION)
    .with_response_format(ResponseFormat::strict(name, schema))
}

/// One call returning a whole session of catalog picks
pub(super) async fn generate(
    generator: &ProgramGenerator,
    request: &GenerationRequest,
    analysis: &str,
    catalog: &ExerciseCatalog,
) -> AppResult<GeneratedProgram> {
    let prompt = catalog_prompt(
        request,
        analysis,
        catalog,
        &generator.settings.response_language,
    )?;
    let chat = structured(prompt, "pilates_session", session_schema(IDENTITY, false));
    let raw = complete_text(generator.provider.as_ref(), &chat, OPERATION).await?;
    let session: CatalogSession = parse(&raw, OPERATION)?;
    into_program(session, catalog, generator.settings.unresolved_exercises)
}

/// Additional main-workout picks from the catalog
pub(super) async fn more(
    generator: &ProgramGenerator,
    request: &GenerationRequest,
    analysis: &str,
    existing: &[String],
    catalog: &ExerciseCatalog,
) -> AppResult<Vec<Exercise>> {
    let prompt = more_prompt(
        request,
        analysis,
        existing,
        catalog,
        &generator.settings.response_language,
    );
    let chat = structured(prompt, "additional_exercises", more_schema(IDENTITY));
    let raw = complete_text(generator.provider.as_ref(), &chat, MORE_OPERATION).await?;
    let reply: MoreExercises<CatalogChoice> = parse(&raw, MORE_OPERATION)?;
    expand_all(reply.main_workout, catalog, generator.settings.unresolved_exercises)
}
