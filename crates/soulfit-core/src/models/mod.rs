// ABOUTME: Domain model for the SoulFit wizard aggregates
// ABOUTME: Re-exports posture, health, goals, equipment and program types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! Domain model
//!
//! Aggregates collected by the wizard, one module per aggregate. All of them
//! serialize with camelCase keys except the embedded
//! [`ComprehensiveAnalysis`], which keeps the snake_case keys the generation
//! service produces.

mod equipment;
mod goals;
mod health;
mod image;
mod posture;
mod program;

pub use equipment::{dedup_preserving_order, Equipment};
pub use goals::{
    AvailableTime, ExperienceLevel, GoalPreferences, InstructorType, Intensity, PreferredPace,
    PrimaryGoal, SessionFrequency, TrainingFormat, TrainingStyle, UserGoals,
};
pub use health::{
    BodyCompositionReport, ExerciseRecommendations, Gender, HealthAssessment, NutrientLevel,
    NutritionalAssessment, SegmentReading, SegmentalData,
};
pub use image::UploadedImage;
pub use posture::{PostureSubmission, PostureView};
pub use program::{
    ComprehensiveAnalysis, Difficulty, Exercise, GeneratedProgram, HealthConsiderations,
    MissingReasoning, MovementAssessment, PilatesStrategy, PriorityAreas, ProgramSection,
};
