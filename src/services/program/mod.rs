// ABOUTME: Pilates program generation client with two interchangeable strategies
// ABOUTME: Validates preconditions, runs the configured strategy and accepts only fully reasoned programs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! # Program Generation
//!
//! [`ProgramGenerator`] hides the two generation strategies behind one
//! interface:
//!
//! - **Two-phase**: a movement analysis call followed by a design call that
//!   returns complete exercise text. The analysis is embedded in the result.
//! - **Single-call**: one call that picks exercises from the built-in
//!   catalog by identifier; the client expands identifiers back into names
//!   and apparatus.
//!
//! Both paths end in [`accept`], which rejects any program with a missing
//! title, an empty main workout or an exercise without reasoning.

/// Built-in exercise catalog
pub mod catalog;
mod single_call;
/// Exercise table and export snapshot
pub mod table;
mod two_phase;

pub use catalog::{CatalogExercise, ExerciseCatalog};
pub use table::{appended_rows, program_rows, ExerciseRow, ProgramExport};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::{GenerationConfig, GenerationStrategy};
use crate::constants::{messages, phases, program::ID_PREFIX};
use crate::errors::{AppError, AppResult};
use crate::llm::LlmProvider;
use soulfit_core::models::{
    Equipment, Exercise, GeneratedProgram, HealthAssessment, UserGoals,
};

/// Everything a generation call needs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Rendered posture analysis, required
    #[serde(default)]
    pub posture_analysis: Option<String>,
    /// Posture recommendations
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Health data
    #[serde(default)]
    pub health_assessment: HealthAssessment,
    /// Goals questionnaire
    #[serde(default)]
    pub user_goals: UserGoals,
    /// Apparatus the session may use
    #[serde(default)]
    pub selected_equipment: Vec<Equipment>,
    /// Ask only for additional main-workout exercises
    #[serde(default)]
    pub request_more_exercises: bool,
    /// Names already in the program, used with `request_more_exercises`
    #[serde(default)]
    pub existing_exercises: Vec<String>,
}

impl GenerationRequest {
    /// Apparatus names for prompts; falls back to the goals preferences, then Mat
    fn equipment_names(&self) -> String {
        if !self.selected_equipment.is_empty() {
            return self
                .selected_equipment
                .iter()
                .map(Equipment::as_str)
                .collect::<Vec<_>>()
                .join(", ");
        }
        if !self.user_goals.preferences.equipment.is_empty() {
            return self.user_goals.preferences.equipment.join(", ");
        }
        Equipment::Mat.as_str().to_owned()
    }

    /// Goal lines shared by the design and catalog prompts
    fn goals_summary(&self) -> String {
        let goals = &self.user_goals;
        let focus = if goals.focus_areas.is_empty() {
            "none specified".to_owned()
        } else {
            goals.focus_areas.join(", ")
        };
        let limitations = if goals.limitations.is_empty() {
            "none".to_owned()
        } else {
            goals.limitations.join(", ")
        };
        format!(
            "- Primary Goal: {}\n\
             - Experience Level: {}\n\
             - Available Time: {} minutes\n\
             - Sessions per Week: {}\n\
             - Focus Areas: {focus}\n\
             - Limitations: {limitations}\n\
             - Equipment Available: {}\n\
             - Intensity Preference: {}",
            goals.primary_goal,
            goals.experience_level,
            goals.available_time.minutes(),
            goals.frequency.per_week(),
            self.equipment_names(),
            goals.preferences.intensity.as_str(),
        )
    }

    /// Health assessment as pretty JSON
    fn health_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.health_assessment)?)
    }

    /// Goals as pretty JSON
    fn goals_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.user_goals)?)
    }
}

/// Reply of a generate-more call
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoreExercises<T> {
    main_workout: Vec<T>,
}

fn string_array() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn required_keys(properties: &Value) -> Vec<String> {
    properties
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

/// Schema of one exercise; main-workout entries add sets and apparatus
///
/// `identity` is the property naming the exercise (`name`, or
/// `exerciseId` for catalog picks).
fn exercise_schema(identity: &str, main: bool) -> Value {
    let mut properties = json!({
        "description": { "type": "string" },
        "duration": { "type": "number", "description": "Minutes" },
        "repetitions": { "type": ["integer", "null"] },
        "targetAreas": string_array(),
        "difficulty": { "type": "string", "enum": ["easy", "medium", "hard"] },
        "modifications": string_array(),
        "reasoning": {
            "type": "string",
            "description": "Why this exercise was chosen: connection between the assessment findings and the user's goals"
        }
    });
    if let Some(map) = properties.as_object_mut() {
        map.insert(identity.to_owned(), json!({ "type": "string" }));
        if main {
            map.insert("sets".to_owned(), json!({ "type": ["integer", "null"] }));
            map.insert("equipment".to_owned(), string_array());
        }
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required_keys(&properties),
        "additionalProperties": false
    })
}

/// Schema of a whole session whose exercises are named by `identity`
fn session_schema(identity: &str, with_id: bool) -> Value {
    let mut properties = json!({
        "title": { "type": "string", "description": "Program title" },
        "duration": { "type": "number", "description": "Total duration in minutes" },
        "warmUp": { "type": "array", "items": exercise_schema(identity, false) },
        "mainWorkout": { "type": "array", "items": exercise_schema(identity, true) },
        "coolDown": { "type": "array", "items": exercise_schema(identity, false) },
        "reasoning": { "type": "string", "description": "Overall explanation of the design" },
        "targetedIssues": string_array(),
        "expectedOutcomes": string_array(),
        "progressionTips": string_array()
    });
    if with_id {
        if let Some(map) = properties.as_object_mut() {
            map.insert(
                "id".to_owned(),
                json!({ "type": "string", "description": "Unique program identifier" }),
            );
            map.insert("totalExercises".to_owned(), json!({ "type": "integer" }));
        }
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required_keys(&properties),
        "additionalProperties": false
    })
}

/// Schema of a generate-more reply
fn more_schema(identity: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "mainWorkout": { "type": "array", "items": exercise_schema(identity, true) }
        },
        "required": ["mainWorkout"],
        "additionalProperties": false
    })
}

/// Accept a generated program into the wizard
///
/// Mints `program_<unix millis>` when the id is missing, stamps the
/// creation time and recomputes the exercise count.
///
/// # Errors
///
/// Returns a response-shape error when the title is empty, the main
/// workout is empty or any exercise lacks reasoning
pub fn accept(mut program: GeneratedProgram, now: DateTime<Utc>) -> AppResult<GeneratedProgram> {
    if program.title.trim().is_empty() {
        return Err(AppError::response_shape("Generated program has no title"));
    }
    if program.main_workout.is_empty() {
        return Err(AppError::response_shape(
            "Generated program has no main-workout exercises",
        ));
    }
    if let Some(missing) = program.missing_reasoning() {
        return Err(AppError::response_shape(format!(
            "Generated program rejected: {missing}"
        )));
    }

    if program.id.trim().is_empty() {
        program.id = format!("{ID_PREFIX}{}", now.timestamp_millis());
    }
    program.created_at = Some(now);
    program.recount();
    Ok(program)
}

/// Check extra main-workout entries before they are appended
///
/// # Errors
///
/// Returns a response-shape error when the list is empty or an entry lacks reasoning
pub fn check_additional(extra: &[Exercise]) -> AppResult<()> {
    if extra.is_empty() {
        return Err(AppError::response_shape("No additional exercises returned"));
    }
    if let Some((index, exercise)) = extra
        .iter()
        .enumerate()
        .find(|(_, exercise)| !exercise.has_reasoning())
    {
        return Err(AppError::response_shape(format!(
            "additional exercise {} ('{}') has no reasoning",
            index + 1,
            exercise.name
        )));
    }
    Ok(())
}

/// Program generation client
#[derive(Clone)]
pub struct ProgramGenerator {
    provider: Arc<dyn LlmProvider>,
    settings: GenerationConfig,
    catalog: ExerciseCatalog,
}

impl ProgramGenerator {
    /// Create a generator using the built-in catalog
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GenerationConfig) -> Self {
        Self {
            provider,
            settings,
            catalog: ExerciseCatalog::builtin(),
        }
    }

    /// Replace the exercise catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: ExerciseCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Active settings
    #[must_use]
    pub const fn settings(&self) -> &GenerationConfig {
        &self.settings
    }

    /// Preconditions checked before any call; returns the trimmed analysis
    fn validate<'a>(&self, request: &'a GenerationRequest) -> AppResult<&'a str> {
        let analysis = request
            .posture_analysis
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::missing_field(messages::MISSING_POSTURE_ANALYSIS))?;

        if self.settings.require_equipment && request.selected_equipment.is_empty() {
            return Err(AppError::invalid_input(messages::MISSING_EQUIPMENT));
        }
        Ok(analysis)
    }

    /// Catalog entries usable with the selection
    ///
    /// # Errors
    ///
    /// Returns `NoExercisesAvailable` when nothing is left after filtering
    pub fn candidate_catalog(&self, selected: &[Equipment]) -> AppResult<ExerciseCatalog> {
        let candidates = self.catalog.filter_by_equipment(selected);
        if candidates.is_empty() {
            let names: Vec<_> = selected.iter().map(Equipment::as_str).collect();
            return Err(AppError::no_exercises_available(format!(
                "No exercises are available for the selected equipment: {}",
                names.join(", ")
            )));
        }
        Ok(candidates)
    }

    /// Generate and accept a program
    ///
    /// # Errors
    ///
    /// Validation errors (missing analysis, missing equipment, empty
    /// catalog) are returned before any call. Service and response-shape
    /// failures are fatal and carry the generation phase when two-phase.
    #[instrument(skip_all, fields(strategy = %self.settings.strategy))]
    pub async fn generate(&self, request: &GenerationRequest) -> AppResult<GeneratedProgram> {
        let analysis = self.validate(request)?;

        let program = match self.settings.strategy {
            GenerationStrategy::TwoPhase => {
                two_phase::generate(self, request, analysis)
                    .await
                    .and_then(|program| {
                        accept(program, Utc::now())
                            .map_err(|e| e.with_phase(phases::DESIGN))
                    })
            }
            GenerationStrategy::SingleCall => {
                let candidates = self.candidate_catalog(&request.selected_equipment)?;
                single_call::generate(self, request, analysis, &candidates)
                    .await
                    .and_then(|program| accept(program, Utc::now()))
            }
        }
        .map_err(|e| e.with_headline(messages::GENERATION_FAILED))?;

        info!(
            program_id = %program.id,
            warm_up = program.warm_up.len(),
            main_workout = program.main_workout.len(),
            cool_down = program.cool_down.len(),
            "Program accepted"
        );
        Ok(program)
    }

    /// Generate additional main-workout exercises
    ///
    /// `existing` lists exercise names already in the program so the model
    /// can avoid repeating them.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`Self::generate`]; an empty or unreasoned
    /// reply is a response-shape error.
    #[instrument(skip_all, fields(strategy = %self.settings.strategy, existing = existing.len()))]
    pub async fn generate_more(
        &self,
        request: &GenerationRequest,
        existing: &[String],
    ) -> AppResult<Vec<Exercise>> {
        let analysis = self.validate(request)?;

        let extra = match self.settings.strategy {
            GenerationStrategy::TwoPhase => two_phase::more(self, request, analysis, existing).await,
            GenerationStrategy::SingleCall => {
                let candidates = self.candidate_catalog(&request.selected_equipment)?;
                single_call::more(self, request, analysis, existing, &candidates).await
            }
        }
        .and_then(|extra| check_additional(&extra).map(|()| extra))
        .map_err(|e| e.with_headline(messages::GENERATE_MORE_FAILED))?;

        info!(added = extra.len(), "Additional exercises generated");
        Ok(extra)
    }
}
