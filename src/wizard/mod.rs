// ABOUTME: Wizard state store with a pure reducer over typed actions
// ABOUTME: Six linear steps, field-level partial updates and gated advancement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! # Wizard State
//!
//! [`WizardState`] is the aggregate root for one user's wizard. Every
//! mutation is a [`WizardAction`] applied by [`reduce`], which takes the
//! current snapshot and returns the next one. [`WizardStore`] owns a
//! snapshot and is the handle callers hold; it never does I/O and none of
//! its operations can fail.
//!
//! Plain `Advance` moves one step forward regardless of the data
//! collected. [`can_advance`] is the gate callers check before advancing
//! from a step that needs input.

/// Service orchestration around the store
pub mod flow;
/// Typed partial updates
pub mod patch;
/// In-memory session map
pub mod sessions;

pub use flow::WizardFlow;
pub use patch::{HealthAssessmentPatch, PosturePatch, UserGoalsPatch};
pub use sessions::{SessionCall, WizardSessions};

use serde::{Deserialize, Serialize};
use std::{fmt, mem};

use crate::constants::wizard::{MAX_STEP, MIN_STEP};
use crate::logging::AppLogger;
use crate::services::program::{appended_rows, program_rows, ExerciseRow, GenerationRequest};
use soulfit_core::models::{
    dedup_preserving_order, Equipment, Exercise, GeneratedProgram, HealthAssessment,
    PostureSubmission, UserGoals,
};

/// Wizard step, serialized as its number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    /// Four posture photos and their analysis
    #[default]
    PostureCapture,
    /// Body-composition report and health notes
    HealthAssessment,
    /// Read-only review of steps one and two
    AnalysisReview,
    /// Goals questionnaire
    GoalsQuestionnaire,
    /// Apparatus selection
    EquipmentSelection,
    /// Generated program, terminal
    ProgramView,
}

impl WizardStep {
    /// Steps in order
    pub const ALL: [Self; 6] = [
        Self::PostureCapture,
        Self::HealthAssessment,
        Self::AnalysisReview,
        Self::GoalsQuestionnaire,
        Self::EquipmentSelection,
        Self::ProgramView,
    ];

    /// Step number, from 1
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::PostureCapture => 1,
            Self::HealthAssessment => 2,
            Self::AnalysisReview => 3,
            Self::GoalsQuestionnaire => 4,
            Self::EquipmentSelection => 5,
            Self::ProgramView => 6,
        }
    }

    /// Step for a number in `1..=6`
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    /// Following step; the terminal step has none
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number().saturating_add(1))
    }

    /// Preceding step; the first step has none
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.number()
            .checked_sub(1)
            .filter(|number| *number >= MIN_STEP)
            .and_then(Self::from_number)
    }

    /// Whether this is the last step
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.number() == MAX_STEP
    }

    /// Short display title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::PostureCapture => "Posture Capture",
            Self::HealthAssessment => "Health Assessment",
            Self::AnalysisReview => "Analysis Review",
            Self::GoalsQuestionnaire => "Goals Questionnaire",
            Self::EquipmentSelection => "Equipment Selection",
            Self::ProgramView => "Program View",
        }
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value)
            .ok_or_else(|| format!("step must be between {MIN_STEP} and {MAX_STEP}, got {value}"))
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Everything collected by one wizard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    /// Current step
    pub current_step: WizardStep,
    /// Posture photos and analysis
    pub posture_submission: PostureSubmission,
    /// Health data
    pub health_assessment: HealthAssessment,
    /// Goals questionnaire
    pub user_goals: UserGoals,
    /// Chosen apparatus, no duplicates
    pub selected_equipment: Vec<Equipment>,
    /// Accepted program
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_program: Option<GeneratedProgram>,
    /// Printable table for the program
    pub exercise_rows: Vec<ExerciseRow>,
    /// A service call is in flight
    pub is_loading: bool,
    /// Message of the last failed call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WizardState {
    /// Generation input assembled from the collected data
    #[must_use]
    pub fn generation_request(&self, request_more_exercises: bool) -> GenerationRequest {
        GenerationRequest {
            posture_analysis: self.posture_submission.analysis.clone(),
            recommendations: self
                .posture_submission
                .recommendations
                .clone()
                .unwrap_or_default(),
            health_assessment: self.health_assessment.clone(),
            user_goals: self.user_goals.clone(),
            selected_equipment: self.selected_equipment.clone(),
            request_more_exercises,
            existing_exercises: if request_more_exercises {
                self.exercise_names()
            } else {
                Vec::new()
            },
        }
    }

    /// Names of every exercise in the accepted program
    #[must_use]
    pub fn exercise_names(&self) -> Vec<String> {
        self.generated_program
            .as_ref()
            .map(|program| {
                program
                    .exercises()
                    .map(|(_, exercise)| exercise.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One state transition
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum WizardAction {
    /// Move forward one step, no-op at the last step
    Advance,
    /// Move back one step, no-op at the first step
    Retreat,
    /// Merge posture fields
    UpdatePostureSubmission(Box<PosturePatch>),
    /// Merge health fields
    UpdateHealthAssessment(Box<HealthAssessmentPatch>),
    /// Merge goals fields
    UpdateUserGoals(Box<UserGoalsPatch>),
    /// Replace the apparatus selection
    UpdateSelectedEquipment(Vec<Equipment>),
    /// Store an accepted program and rebuild its table
    SetGeneratedProgram(Box<GeneratedProgram>),
    /// Append main-workout entries and extend the table
    AppendExercises(Vec<Exercise>),
    /// Set the in-flight flag
    SetLoading(bool),
    /// Set or clear the error message
    SetError(Option<String>),
    /// Back to the initial empty state
    Reset,
}

/// Apply one action to a snapshot
#[must_use]
pub fn reduce(mut state: WizardState, action: WizardAction) -> WizardState {
    match action {
        WizardAction::Advance => {
            if let Some(next) = state.current_step.next() {
                state.current_step = next;
            }
        }
        WizardAction::Retreat => {
            if let Some(previous) = state.current_step.previous() {
                state.current_step = previous;
            }
        }
        WizardAction::UpdatePostureSubmission(patch) => patch.apply(&mut state.posture_submission),
        WizardAction::UpdateHealthAssessment(patch) => patch.apply(&mut state.health_assessment),
        WizardAction::UpdateUserGoals(patch) => patch.apply(&mut state.user_goals),
        WizardAction::UpdateSelectedEquipment(equipment) => {
            state.selected_equipment = dedup_preserving_order(equipment);
        }
        WizardAction::SetGeneratedProgram(program) => {
            state.exercise_rows = program_rows(&program);
            state.generated_program = Some(*program);
        }
        WizardAction::AppendExercises(extra) => {
            if let Some(program) = state.generated_program.as_mut() {
                state
                    .exercise_rows
                    .extend(appended_rows(state.exercise_rows.len(), &extra));
                program.append_main_workout(extra);
            }
        }
        WizardAction::SetLoading(loading) => state.is_loading = loading,
        WizardAction::SetError(error) => state.error = error,
        WizardAction::Reset => state = WizardState::default(),
    }
    state
}

/// Whether the data collected so far allows leaving the current step
#[must_use]
pub fn can_advance(state: &WizardState) -> bool {
    match state.current_step {
        WizardStep::PostureCapture => state.posture_submission.is_analyzed(),
        WizardStep::HealthAssessment => state.health_assessment.has_required_measurements(),
        WizardStep::AnalysisReview | WizardStep::GoalsQuestionnaire => true,
        WizardStep::EquipmentSelection => !state.selected_equipment.is_empty(),
        WizardStep::ProgramView => false,
    }
}

/// Owner of one wizard snapshot
#[derive(Debug, Clone, Default)]
pub struct WizardStore {
    state: WizardState,
    session: Option<String>,
}

impl WizardStore {
    /// Store with the initial empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store labelled with a session id for logging
    #[must_use]
    pub fn for_session(session: impl Into<String>) -> Self {
        Self {
            state: WizardState::default(),
            session: Some(session.into()),
        }
    }

    /// Current snapshot
    #[must_use]
    pub const fn state(&self) -> &WizardState {
        &self.state
    }

    /// Current step
    #[must_use]
    pub const fn current_step(&self) -> WizardStep {
        self.state.current_step
    }

    /// Apply an action and return the new snapshot
    pub fn dispatch(&mut self, action: WizardAction) -> &WizardState {
        let from = self.state.current_step;
        self.state = reduce(mem::take(&mut self.state), action);
        if self.state.current_step != from {
            AppLogger::log_step_change(
                self.session.as_deref(),
                from.number(),
                self.state.current_step.number(),
            );
        }
        &self.state
    }

    /// Move forward one step
    pub fn advance(&mut self) {
        self.dispatch(WizardAction::Advance);
    }

    /// Move back one step
    pub fn retreat(&mut self) {
        self.dispatch(WizardAction::Retreat);
    }

    /// Whether the current step's requirements are met
    #[must_use]
    pub fn can_advance(&self) -> bool {
        can_advance(&self.state)
    }

    /// Advance only when [`can_advance`] allows it; returns whether the step moved
    pub fn try_advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.advance();
        true
    }

    /// Merge posture fields
    pub fn update_posture_submission(&mut self, patch: PosturePatch) {
        self.dispatch(WizardAction::UpdatePostureSubmission(Box::new(patch)));
    }

    /// Merge health fields
    pub fn update_health_assessment(&mut self, patch: HealthAssessmentPatch) {
        self.dispatch(WizardAction::UpdateHealthAssessment(Box::new(patch)));
    }

    /// Merge goals fields
    pub fn update_user_goals(&mut self, patch: UserGoalsPatch) {
        self.dispatch(WizardAction::UpdateUserGoals(Box::new(patch)));
    }

    /// Replace the apparatus selection
    pub fn update_selected_equipment(&mut self, equipment: Vec<Equipment>) {
        self.dispatch(WizardAction::UpdateSelectedEquipment(equipment));
    }

    /// Store an accepted program
    pub fn set_generated_program(&mut self, program: GeneratedProgram) {
        self.dispatch(WizardAction::SetGeneratedProgram(Box::new(program)));
    }

    /// Append main-workout entries to the stored program
    pub fn append_exercises(&mut self, extra: Vec<Exercise>) {
        self.dispatch(WizardAction::AppendExercises(extra));
    }

    /// Set the in-flight flag
    pub fn set_loading(&mut self, loading: bool) {
        self.dispatch(WizardAction::SetLoading(loading));
    }

    /// Set or clear the error message
    pub fn set_error(&mut self, error: Option<String>) {
        self.dispatch(WizardAction::SetError(error));
    }

    /// Discard everything
    pub fn reset(&mut self) {
        self.dispatch(WizardAction::Reset);
    }
}
