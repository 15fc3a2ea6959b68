// ABOUTME: Generated Pilates program with warm-up, main and cool-down exercise sequences
// ABOUTME: Embeds the clinical analysis that guided the design and the per-exercise reasoning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exercise difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Accessible to beginners
    #[default]
    Easy,
    /// Moderate challenge
    Medium,
    /// Demanding
    Hard,
}

impl Difficulty {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// One exercise entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Exercise name
    pub name: String,
    /// How to perform it
    #[serde(default)]
    pub description: String,
    /// Duration in minutes
    #[serde(default)]
    pub duration: f64,
    /// Repetitions per set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,
    /// Number of sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    /// Body areas worked
    #[serde(default)]
    pub target_areas: Vec<String>,
    /// Difficulty
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Easier or harder variations
    #[serde(default)]
    pub modifications: Vec<String>,
    /// Apparatus used
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Why the exercise was chosen for this user
    #[serde(default)]
    pub reasoning: String,
}

impl Exercise {
    /// Reasoning is present and not just whitespace
    #[must_use]
    pub fn has_reasoning(&self) -> bool {
        !self.reasoning.trim().is_empty()
    }
}

/// Movement findings from the first generation phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementAssessment {
    /// Movement patterns that need correction
    pub primary_dysfunctions: Vec<String>,
    /// Muscle imbalances
    pub muscle_imbalances: Vec<String>,
    /// Postural deviations
    pub postural_deviations: Vec<String>,
    /// Areas with limited mobility
    pub mobility_restrictions: Vec<String>,
    /// Narrative description of overall posture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postural_description: Option<String>,
}

/// Health findings from the first generation phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConsiderations {
    /// How body composition affects exercise selection
    pub body_composition_insights: String,
    /// Overall strength capacity
    pub strength_levels: String,
    /// Conditions requiring modifications
    pub risk_factors: Vec<String>,
    /// Movements to avoid
    pub exercise_contraindications: Vec<String>,
}

/// Improvement priorities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityAreas {
    /// Needs attention now
    pub immediate_focus: Vec<String>,
    /// Important but secondary
    pub secondary_goals: Vec<String>,
    /// Ongoing development
    pub long_term_objectives: Vec<String>,
}

/// Pilates approach for this user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilatesStrategy {
    /// Most beneficial Pilates principles
    pub key_principles: Vec<String>,
    /// Most beneficial exercise types
    pub optimal_exercise_types: Vec<String>,
    /// How to progress
    pub progression_approach: String,
    /// Why the session is structured this way
    pub session_structure_rationale: String,
}

/// Clinical and movement analysis that guided program design
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprehensiveAnalysis {
    /// Movement findings
    pub movement_assessment: MovementAssessment,
    /// Health findings
    pub health_considerations: HealthConsiderations,
    /// Improvement priorities
    pub priority_areas: PriorityAreas,
    /// Pilates approach
    pub pilates_strategy: PilatesStrategy,
}

/// Section of a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgramSection {
    /// Warm-up
    WarmUp,
    /// Main workout
    MainWorkout,
    /// Cool-down
    CoolDown,
}

impl ProgramSection {
    /// Sections in session order
    pub const ALL: [Self; 3] = [Self::WarmUp, Self::MainWorkout, Self::CoolDown];

    /// Wire name of the section
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WarmUp => "warmUp",
            Self::MainWorkout => "mainWorkout",
            Self::CoolDown => "coolDown",
        }
    }
}

impl fmt::Display for ProgramSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exercise that failed the reasoning requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReasoning {
    /// Section holding the exercise
    pub section: ProgramSection,
    /// Zero-based position within the section
    pub index: usize,
    /// Exercise name
    pub name: String,
}

impl fmt::Display for MissingReasoning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exercise {} ('{}') in {} has no reasoning",
            self.index + 1,
            self.name,
            self.section
        )
    }
}

/// Program accepted into the wizard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProgram {
    /// Program identifier
    #[serde(default)]
    pub id: String,
    /// Program title
    #[serde(default)]
    pub title: String,
    /// Total duration in minutes
    #[serde(default)]
    pub duration: f64,
    /// Exercise count across all sections
    #[serde(default)]
    pub total_exercises: usize,
    /// Warm-up sequence
    #[serde(default)]
    pub warm_up: Vec<Exercise>,
    /// Main workout sequence
    #[serde(default)]
    pub main_workout: Vec<Exercise>,
    /// Cool-down sequence
    #[serde(default)]
    pub cool_down: Vec<Exercise>,
    /// Analysis that guided the design, when generated in two phases
    #[serde(
        rename = "comprehensive_analysis",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub comprehensive_analysis: Option<ComprehensiveAnalysis>,
    /// Overall design rationale
    #[serde(default)]
    pub reasoning: String,
    /// Issues the program addresses
    #[serde(default)]
    pub targeted_issues: Vec<String>,
    /// Expected benefits
    #[serde(default)]
    pub expected_outcomes: Vec<String>,
    /// How to progress
    #[serde(default)]
    pub progression_tips: Vec<String>,
    /// When the program was accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl GeneratedProgram {
    /// Exercises of one section
    #[must_use]
    pub fn section(&self, section: ProgramSection) -> &[Exercise] {
        match section {
            ProgramSection::WarmUp => &self.warm_up,
            ProgramSection::MainWorkout => &self.main_workout,
            ProgramSection::CoolDown => &self.cool_down,
        }
    }

    /// Every exercise with its section, in session order
    pub fn exercises(&self) -> impl Iterator<Item = (ProgramSection, &Exercise)> {
        ProgramSection::ALL.into_iter().flat_map(move |section| {
            self.section(section)
                .iter()
                .map(move |exercise| (section, exercise))
        })
    }

    /// Recompute `total_exercises` from the three sequences
    pub fn recount(&mut self) {
        self.total_exercises = self.warm_up.len() + self.main_workout.len() + self.cool_down.len();
    }

    /// First exercise lacking reasoning, if any
    #[must_use]
    pub fn missing_reasoning(&self) -> Option<MissingReasoning> {
        ProgramSection::ALL.into_iter().find_map(|section| {
            self.section(section)
                .iter()
                .position(|exercise| !exercise.has_reasoning())
                .map(|index| MissingReasoning {
                    section,
                    index,
                    name: self.section(section)[index].name.clone(),
                })
        })
    }

    /// Append extra main-workout entries, leaving existing ones untouched
    pub fn append_main_workout(&mut self, extra: Vec<Exercise>) {
        self.main_workout.extend(extra);
        self.recount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(name: &str, reasoning: &str) -> Exercise {
        Exercise {
            name: name.to_owned(),
            description: String::new(),
            duration: 3.0,
            repetitions: Some(10),
            sets: None,
            target_areas: vec![],
            difficulty: Difficulty::Easy,
            modifications: vec![],
            equipment: vec![],
            reasoning: reasoning.to_owned(),
        }
    }

    #[test]
    fn test_missing_reasoning_reports_section_and_position() {
        let program = GeneratedProgram {
            warm_up: vec![exercise("Breathing", "sets up ribcage mobility")],
            main_workout: vec![
                exercise("Hundred", "core endurance"),
                exercise("Roll Up", "  "),
            ],
            ..GeneratedProgram::default()
        };
        let missing = program.missing_reasoning().unwrap();
        assert_eq!(missing.section, ProgramSection::MainWorkout);
        assert_eq!(missing.index, 1);
        assert_eq!(missing.name, "Roll Up");
    }

    #[test]
    fn test_append_preserves_existing_and_recounts() {
        let mut program = GeneratedProgram {
            warm_up: vec![exercise("Breathing", "a")],
            main_workout: vec![exercise("Hundred", "b")],
            ..GeneratedProgram::default()
        };
        program.recount();
        assert_eq!(program.total_exercises, 2);

        program.append_main_workout(vec![exercise("Swan", "c"), exercise("Saw", "d")]);
        let names: Vec<_> = program.main_workout.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Hundred", "Swan", "Saw"]);
        assert_eq!(program.total_exercises, 4);
    }

    #[test]
    fn test_analysis_key_stays_snake_case() {
        let program = GeneratedProgram {
            comprehensive_analysis: Some(ComprehensiveAnalysis::default()),
            ..GeneratedProgram::default()
        };
        let json = serde_json::to_value(&program).unwrap();
        assert!(json["comprehensive_analysis"]["movement_assessment"].is_object());
        assert!(json.get("warmUp").is_some());
    }
}
