// ABOUTME: Health assessment aggregate and the flat body-composition report
// ABOUTME: Covers basic metrics, segmental breakdown, nutritional status and history fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use serde::{Deserialize, Serialize};

use super::UploadedImage;

/// Biological gender as printed on composition reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Any other or unspecified value
    Other,
}

impl Gender {
    /// Parse report wording, returning `None` for empty input
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => None,
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            _ => Some(Self::Other),
        }
    }
}

/// Nutritional status level for protein, fat, minerals and water
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientLevel {
    /// Below the standard range
    Low,
    /// Lower end of the standard range (fat only)
    #[serde(rename = "Low-normal")]
    LowNormal,
    /// Within the standard range
    Normal,
    /// Above the standard range
    High,
}

impl NutrientLevel {
    /// Parse report wording, tolerating case, spacing and the common synonyms
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "low" | "under" | "deficient" | "insufficient" => Some(Self::Low),
            "lownormal" => Some(Self::LowNormal),
            "normal" | "adequate" | "standard" => Some(Self::Normal),
            "high" | "over" | "excessive" => Some(Self::High),
            _ => None,
        }
    }
}

/// Muscle and fat mass for one body segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentReading {
    /// Muscle mass in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle: Option<f64>,
    /// Fat mass in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
}

/// Segmental analysis across the five body regions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentalData {
    /// Right arm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_arm: Option<SegmentReading>,
    /// Left arm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_arm: Option<SegmentReading>,
    /// Trunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub torso: Option<SegmentReading>,
    /// Right leg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_leg: Option<SegmentReading>,
    /// Left leg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_leg: Option<SegmentReading>,
}

/// Nutritional status block of the report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionalAssessment {
    /// Protein status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<NutrientLevel>,
    /// Fat status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<NutrientLevel>,
    /// Mineral status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minerals: Option<NutrientLevel>,
    /// Hydration status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<NutrientLevel>,
}

/// Suggested daily cardio minutes printed on some reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecommendations {
    /// Walking minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walking: Option<f64>,
    /// Running minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<f64>,
    /// Swimming minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swimming: Option<f64>,
}

/// Flat body-composition report, extracted or entered by hand
///
/// Every field is optional. The wizard only requires `height` and `weight`
/// before it advances past the health assessment step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyCompositionReport {
    // Basic info
    /// Age in years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Gender
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Height in cm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Weight in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Test date as printed (`YYYY-MM-DD`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_date: Option<String>,
    /// Overall rating out of 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<f64>,

    // Composition
    /// Intracellular fluid in L
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intracellular_fluid: Option<f64>,
    /// Extracellular fluid in L
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracellular_fluid: Option<f64>,
    /// Total body water in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_water: Option<f64>,
    /// Muscle mass in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle_mass: Option<f64>,
    /// Lean body mass in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lean_body_mass: Option<f64>,
    /// Protein mass in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    /// Mineral mass in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minerals: Option<f64>,
    /// Fat mass in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_mass: Option<f64>,

    // Analysis
    /// Body mass index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    /// Body fat percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_percentage: Option<f64>,
    /// Skeletal muscle mass in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skeletal_muscle_mass: Option<f64>,

    // Belly fat
    /// Visceral fat area in cm²
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visceral_fat_area: Option<f64>,
    /// Subcutaneous fat area in cm²
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcutaneous_fat_area: Option<f64>,
    /// Body water to fat-free mass ratio in kg/L
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_water_fat_free_ratio: Option<f64>,

    /// Per-segment muscle and fat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segmental_data: Option<SegmentalData>,
    /// Nutritional status levels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutritional_assessment: Option<NutritionalAssessment>,

    /// Recommended daily calories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_per_day: Option<f64>,
    /// Suggested cardio minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_recommendations: Option<ExerciseRecommendations>,

    // History
    /// Previous weight in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_weight: Option<f64>,
    /// Previous body water in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_body_water: Option<f64>,
    /// Previous body fat percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_fat_percentage: Option<f64>,
}

impl BodyCompositionReport {
    /// Height and weight are both present
    #[must_use]
    pub const fn has_required_measurements(&self) -> bool {
        self.height.is_some() && self.weight.is_some()
    }
}

/// Health data collected in the second wizard step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAssessment {
    /// Assessment identifier (empty until first update)
    #[serde(default)]
    pub id: String,
    /// Body-composition report, extracted or entered by hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_composition_report: Option<BodyCompositionReport>,
    /// Source report photo, never echoed back from clients
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub report_image: Option<UploadedImage>,
    /// Whether the report came from image extraction rather than manual entry
    #[serde(default)]
    pub extracted_from_image: bool,
    /// Declared health conditions
    #[serde(default)]
    pub health_conditions: Vec<String>,
    /// Declared injuries
    #[serde(default)]
    pub injuries: Vec<String>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HealthAssessment {
    /// Height and weight are present on the report
    #[must_use]
    pub fn has_required_measurements(&self) -> bool {
        self.body_composition_report
            .as_ref()
            .is_some_and(BodyCompositionReport::has_required_measurements)
    }
}
