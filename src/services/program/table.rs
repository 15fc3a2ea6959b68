// ABOUTME: Exercise table rows and the downloadable program snapshot
// ABOUTME: Numbers warm-up, main and cool-down entries and formats load and sets/reps columns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::program::{DEFAULT_EQUIPMENT_LABEL, WEIGHTS_TAG};
use crate::errors::AppResult;
use soulfit_core::models::{Exercise, GeneratedProgram, ProgramSection};

const BODYWEIGHT: &str = "Bodyweight";
const LIGHT_WEIGHTS: &str = "Light weights";

/// One row of the printable exercise table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRow {
    /// Display position, from 1
    pub no: usize,
    /// Apparatus, comma separated
    pub equipment: String,
    /// Exercise name
    pub exercise: String,
    /// Load column
    pub load: String,
    /// Sets and repetitions column
    pub sets_reps: String,
}

fn amount(exercise: &Exercise) -> String {
    match exercise.repetitions.filter(|reps| *reps > 0) {
        Some(reps) => format!("{reps} reps"),
        None => format!("{} min", exercise.duration),
    }
}

fn row(no: usize, section: ProgramSection, exercise: &Exercise) -> ExerciseRow {
    let equipment = if exercise.equipment.is_empty() {
        DEFAULT_EQUIPMENT_LABEL.to_owned()
    } else {
        exercise.equipment.join(", ")
    };

    let is_main = section == ProgramSection::MainWorkout;
    let load = if is_main && exercise.equipment.iter().any(|e| e == WEIGHTS_TAG) {
        LIGHT_WEIGHTS
    } else {
        BODYWEIGHT
    };
    let sets_reps = if is_main {
        format!("{} sets × {}", exercise.sets.unwrap_or(1), amount(exercise))
    } else {
        amount(exercise)
    };

    ExerciseRow {
        no,
        equipment,
        exercise: exercise.name.clone(),
        load: load.to_owned(),
        sets_reps,
    }
}

/// Table for a whole program, numbered from 1 in session order
#[must_use]
pub fn program_rows(program: &GeneratedProgram) -> Vec<ExerciseRow> {
    program
        .exercises()
        .enumerate()
        .map(|(index, (section, exercise))| row(index + 1, section, exercise))
        .collect()
}

/// Rows for extra main-workout entries, numbered after `existing` rows
#[must_use]
pub fn appended_rows(existing: usize, extra: &[Exercise]) -> Vec<ExerciseRow> {
    extra
        .iter()
        .enumerate()
        .map(|(index, exercise)| row(existing + index + 1, ProgramSection::MainWorkout, exercise))
        .collect()
}

/// Downloadable snapshot of the program and its table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramExport<'a> {
    /// Program as accepted
    pub generated_program: &'a GeneratedProgram,
    /// Table rows as displayed
    pub exercises: &'a [ExerciseRow],
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
}

impl<'a> ProgramExport<'a> {
    /// Snapshot taken at `timestamp`
    #[must_use]
    pub const fn new(
        generated_program: &'a GeneratedProgram,
        exercises: &'a [ExerciseRow],
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            generated_program,
            exercises,
            timestamp,
        }
    }

    /// Suggested download name, `soulfit-program-YYYY-MM-DD.json`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("soulfit-program-{}.json", self.timestamp.format("%Y-%m-%d"))
    }

    /// Pretty-printed JSON body
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the program cannot be encoded
    pub fn to_pretty_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
