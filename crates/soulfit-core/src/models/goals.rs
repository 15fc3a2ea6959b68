// ABOUTME: User goals questionnaire model with enumerated goal, level, time and frequency
// ABOUTME: Also carries the optional motivation, medical, measurement and expectation fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary training goal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryGoal {
    /// Build strength
    Strength,
    /// Improve flexibility
    Flexibility,
    /// Recover from injury
    Rehabilitation,
    /// Reduce weight
    WeightLoss,
    /// Overall fitness
    #[default]
    GeneralFitness,
}

impl PrimaryGoal {
    /// Wire name of the goal
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Flexibility => "flexibility",
            Self::Rehabilitation => "rehabilitation",
            Self::WeightLoss => "weight-loss",
            Self::GeneralFitness => "general-fitness",
        }
    }
}

impl fmt::Display for PrimaryGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported Pilates experience
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// New to the practice
    #[default]
    Beginner,
    /// Some experience
    Intermediate,
    /// Experienced practitioner
    Advanced,
}

impl ExperienceLevel {
    /// Wire name of the level
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session length in minutes, serialized as the bare number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AvailableTime {
    /// 30 minutes
    Minutes30,
    /// 45 minutes
    #[default]
    Minutes45,
    /// 60 minutes
    Minutes60,
}

impl AvailableTime {
    /// Session length in minutes
    #[must_use]
    pub const fn minutes(self) -> u32 {
        match self {
            Self::Minutes30 => 30,
            Self::Minutes45 => 45,
            Self::Minutes60 => 60,
        }
    }
}

impl TryFrom<u32> for AvailableTime {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            30 => Ok(Self::Minutes30),
            45 => Ok(Self::Minutes45),
            60 => Ok(Self::Minutes60),
            other => Err(format!("available time must be 30, 45 or 60 minutes, got {other}")),
        }
    }
}

impl From<AvailableTime> for u32 {
    fn from(value: AvailableTime) -> Self {
        value.minutes()
    }
}

/// Sessions per week, between 2 and 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SessionFrequency(u8);

impl SessionFrequency {
    /// Fewest sessions per week
    pub const MIN: u8 = 2;
    /// Most sessions per week
    pub const MAX: u8 = 5;

    /// Sessions per week
    #[must_use]
    pub const fn per_week(self) -> u8 {
        self.0
    }
}

impl Default for SessionFrequency {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for SessionFrequency {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "frequency must be between {} and {} sessions per week, got {value}",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

impl From<SessionFrequency> for u8 {
    fn from(value: SessionFrequency) -> Self {
        value.0
    }
}

/// Desired intensity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// Gentle
    Low,
    /// Balanced
    #[default]
    Moderate,
    /// Demanding
    High,
}

impl Intensity {
    /// Wire name of the intensity
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// Pilates school preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingStyle {
    /// Classical repertoire
    Classical,
    /// Contemporary variations
    Contemporary,
    /// Both
    #[default]
    Mixed,
}

/// Preferences block, replaced wholesale on update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPreferences {
    /// Equipment the user would like to use
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Desired intensity
    #[serde(default)]
    pub intensity: Intensity,
    /// Pilates school preference
    #[serde(default)]
    pub style: TrainingStyle,
}

/// Preferred pace of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredPace {
    /// Slow and controlled
    Slow,
    /// Fast flowing
    Fast,
    /// Pushes limits
    Challenging,
    /// Restorative
    Relaxing,
}

/// Preferred instructor attitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructorType {
    /// Encouraging
    Encouraging,
    /// Calm
    Calm,
    /// Strict
    Strict,
}

/// Preferred coaching format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingFormat {
    /// Detailed cueing
    Detailed,
    /// Playful sessions
    Fun,
    /// Something else
    Others,
}

/// Goals questionnaire answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserGoals {
    /// Primary goal
    pub primary_goal: PrimaryGoal,
    /// Experience level
    pub experience_level: ExperienceLevel,
    /// Session length
    pub available_time: AvailableTime,
    /// Sessions per week
    pub frequency: SessionFrequency,
    /// Body areas to focus on
    pub focus_areas: Vec<String>,
    /// Physical limitations
    pub limitations: Vec<String>,
    /// Equipment, intensity and style preferences
    pub preferences: GoalPreferences,

    /// Goals not covered by the fixed list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_goals: Option<String>,
    /// Has exercised regularly before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_exercised_before: Option<bool>,
    /// Has practised Pilates before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_pilates_experience: Option<bool>,
    /// Preferred session pace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_style: Option<PreferredPace>,
    /// What motivates the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    /// Results the user expects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_results: Option<String>,
    /// What stopped the user before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_barriers: Option<String>,
    /// Anticipated obstacles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_obstacles: Option<Vec<String>>,
    /// Concerns about training
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concerns: Option<Vec<String>>,
    /// Declared medical conditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<Vec<String>>,
    /// Conditions not covered by the fixed list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_medical_conditions: Option<String>,
    /// Whether a medical release is needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_release_required: Option<bool>,

    // Body measurements
    /// Height in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Body fat percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_percentage: Option<f64>,
    /// Blood oxygen saturation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_level: Option<f64>,
    /// Blood pressure as written (`120/80`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    /// Resting heart rate in bpm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resting_heart_rate: Option<f64>,
    /// Chest circumference in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest_measurement: Option<f64>,
    /// Waist circumference in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist_measurement: Option<f64>,
    /// Hip circumference in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hip_measurement: Option<f64>,
    /// Left arm circumference in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_arm_measurement: Option<f64>,
    /// Right arm circumference in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_arm_measurement: Option<f64>,
    /// Left thigh circumference in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_thigh_measurement: Option<f64>,
    /// Right thigh circumference in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_thigh_measurement: Option<f64>,

    // Expectations
    /// Desired transformation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_transformation: Option<String>,
    /// Source of inspiration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspiration: Option<String>,
    /// Preferred instructor attitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_instructor_type: Option<InstructorType>,
    /// Preferred coaching format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_training_style: Option<TrainingFormat>,
}
