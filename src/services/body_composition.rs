// ABOUTME: Body-composition extraction client reading a report photo into the flat report record
// ABOUTME: Remaps the nested extraction payload field by field and fails hard on any bad reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::complete_text;
use crate::constants::{messages, token_budgets};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{language_instruction, REPORT_EXTRACTOR_PROMPT};
use crate::llm::{require_vision, ChatMessage, ChatRequest, LlmProvider, ResponseFormat};
use crate::logging::AppLogger;
use soulfit_core::models::{
    BodyCompositionReport, Gender, NutrientLevel, NutritionalAssessment, SegmentReading,
    SegmentalData, UploadedImage,
};

const OPERATION: &str = "body composition extraction";

/// `basic_info` section
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedBasicInfo {
    age: Option<f64>,
    gender: Option<String>,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    test_date: Option<String>,
    overall_rating: Option<f64>,
}

/// `body_composition` section
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct ExtractedComposition {
    intracellular_fluid_L: Option<f64>,
    extracellular_fluid_L: Option<f64>,
    body_water_kg: Option<f64>,
    muscle_mass_kg: Option<f64>,
    lean_mass_kg: Option<f64>,
    protein_kg: Option<f64>,
    minerals_kg: Option<f64>,
    fat_mass_kg: Option<f64>,
}

/// `muscle_fat_analysis` section
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedMuscleFat {
    bmi: Option<f64>,
    body_fat_percentage: Option<f64>,
}

/// `belly_fat` section
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedBellyFat {
    visceral_fat_area_cm2: Option<f64>,
    subcutaneous_fat_area_cm2: Option<f64>,
    body_water_fat_free_mass_ratio: Option<f64>,
}

/// One body segment
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedSegment {
    muscle_mass_kg: Option<f64>,
    fat_mass_kg: Option<f64>,
}

/// `segmental_analysis` section
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedSegments {
    right_arm: Option<ExtractedSegment>,
    left_arm: Option<ExtractedSegment>,
    torso: Option<ExtractedSegment>,
    right_leg: Option<ExtractedSegment>,
    left_leg: Option<ExtractedSegment>,
}

/// `nutritional_assessment` section, free wording per nutrient
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedNutrition {
    protein: Option<String>,
    fat: Option<String>,
    minerals: Option<String>,
    water: Option<String>,
}

/// `history` section
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedHistory {
    previous_weight_kg: Option<f64>,
    previous_body_water_kg: Option<f64>,
    previous_fat_percentage: Option<f64>,
}

/// Nested payload returned by the extraction service
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedReport {
    basic_info: Option<ExtractedBasicInfo>,
    body_composition: Option<ExtractedComposition>,
    muscle_fat_analysis: Option<ExtractedMuscleFat>,
    belly_fat: Option<ExtractedBellyFat>,
    segmental_analysis: Option<ExtractedSegments>,
    nutritional_assessment: Option<ExtractedNutrition>,
    history: Option<ExtractedHistory>,
}

fn segment(source: Option<ExtractedSegment>) -> Option<SegmentReading> {
    source.map(|s| SegmentReading {
        muscle: s.muscle_mass_kg,
        fat: s.fat_mass_kg,
    })
}

fn nutrient(field: &str, wording: Option<String>) -> Option<NutrientLevel> {
    let wording = wording?;
    let level = NutrientLevel::parse(&wording);
    if level.is_none() && !wording.trim().is_empty() {
        warn!(nutrient = field, wording = %wording, "Unrecognised nutritional status dropped");
    }
    level
}

fn age_years(age: Option<f64>) -> Option<u32> {
    age.filter(|a| a.is_finite() && *a >= 0.0)
        .map(|a| a.round() as u32)
}

impl ExtractedReport {
    const fn has_any_section(&self) -> bool {
        self.basic_info.is_some()
            || self.body_composition.is_some()
            || self.muscle_fat_analysis.is_some()
            || self.belly_fat.is_some()
            || self.segmental_analysis.is_some()
            || self.nutritional_assessment.is_some()
            || self.history.is_some()
    }

    /// Flatten into the wizard's report shape; absent fields stay absent
    #[must_use]
    pub fn into_report(self) -> BodyCompositionReport {
        let basic = self.basic_info.unwrap_or_default();
        let composition = self.body_composition.unwrap_or_default();
        let muscle_fat = self.muscle_fat_analysis.unwrap_or_default();
        let belly = self.belly_fat.unwrap_or_default();
        let history = self.history.unwrap_or_default();

        BodyCompositionReport {
            age: age_years(basic.age),
            gender: basic.gender.as_deref().and_then(Gender::parse),
            height: basic.height_cm,
            weight: basic.weight_kg,
            test_date: basic.test_date,
            overall_rating: basic.overall_rating,
            intracellular_fluid: composition.intracellular_fluid_L,
            extracellular_fluid: composition.extracellular_fluid_L,
            body_water: composition.body_water_kg,
            muscle_mass: composition.muscle_mass_kg,
            lean_body_mass: composition.lean_mass_kg,
            protein: composition.protein_kg,
            minerals: composition.minerals_kg,
            fat_mass: composition.fat_mass_kg,
            bmi: muscle_fat.bmi,
            body_fat_percentage: muscle_fat.body_fat_percentage,
            skeletal_muscle_mass: composition.muscle_mass_kg,
            visceral_fat_area: belly.visceral_fat_area_cm2,
            subcutaneous_fat_area: belly.subcutaneous_fat_area_cm2,
            body_water_fat_free_ratio: belly.body_water_fat_free_mass_ratio,
            segmental_data: self.segmental_analysis.map(|s| SegmentalData {
                right_arm: segment(s.right_arm),
                left_arm: segment(s.left_arm),
                torso: segment(s.torso),
                right_leg: segment(s.right_leg),
                left_leg: segment(s.left_leg),
            }),
            nutritional_assessment: self.nutritional_assessment.map(|n| NutritionalAssessment {
                protein: nutrient("protein", n.protein),
                fat: nutrient("fat", n.fat),
                minerals: nutrient("minerals", n.minerals),
                water: nutrient("water", n.water),
            }),
            calories_per_day: None,
            exercise_recommendations: None,
            previous_weight: history.previous_weight_kg,
            previous_body_water: history.previous_body_water_kg,
            previous_fat_percentage: history.previous_fat_percentage,
        }
    }
}

/// Parse and remap a raw reply
///
/// # Errors
///
/// Returns a response-shape error when the reply is not a JSON object or
/// carries none of the report sections
pub fn parse_reply(raw: &str) -> AppResult<BodyCompositionReport> {
    let extracted = serde_json::from_str::<ExtractedReport>(raw).map_err(|e| {
        AppLogger::log_unparseable_reply(OPERATION, &e.to_string(), raw);
        AppError::response_shape(format!("Extraction reply is not valid JSON: {e}"))
    })?;
    if !extracted.has_any_section() {
        AppLogger::log_unparseable_reply(OPERATION, "no report sections", raw);
        return Err(AppError::response_shape(
            "Extraction reply carries no report sections",
        ));
    }
    Ok(extracted.into_report())
}

fn number(description: &str) -> Value {
    json!({ "type": ["number", "null"], "description": description })
}

fn text(description: &str) -> Value {
    json!({ "type": ["string", "null"], "description": description })
}

fn section(properties: &Value) -> Value {
    let required: Vec<&String> = properties
        .as_object()
        .map(|map| map.keys().collect())
        .unwrap_or_default();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Strict JSON schema `body_composition_report`
#[must_use]
pub fn body_composition_schema() -> Value {
    let segment_ref = json!({ "$ref": "#/$defs/segment" });
    json!({
        "type": "object",
        "properties": {
            "basic_info": section(&json!({
                "age": { "type": ["integer", "null"], "description": "Age in years" },
                "gender": { "type": ["string", "null"], "enum": ["Male", "Female", null], "description": "Biological gender" },
                "height_cm": number("Height in centimeters"),
                "weight_kg": number("Weight in kilograms"),
                "test_date": text("Date of the test in YYYY-MM-DD format"),
                "overall_rating": number("Overall rating out of 100")
            })),
            "body_composition": section(&json!({
                "intracellular_fluid_L": number("Intracellular fluid in liters"),
                "extracellular_fluid_L": number("Extracellular fluid in liters"),
                "body_water_kg": number("Total body water in kg"),
                "muscle_mass_kg": number("Skeletal muscle mass in kg"),
                "lean_mass_kg": number("Lean body mass in kg"),
                "protein_kg": number("Protein mass in kg"),
                "minerals_kg": number("Minerals mass in kg"),
                "fat_mass_kg": number("Fat mass in kg")
            })),
            "muscle_fat_analysis": section(&json!({
                "bmi": number("Body mass index"),
                "body_fat_percentage": number("Percent body fat")
            })),
            "belly_fat": section(&json!({
                "visceral_fat_area_cm2": number("Visceral fat area in square centimeters"),
                "subcutaneous_fat_area_cm2": number("Subcutaneous fat area in square centimeters"),
                "body_water_fat_free_mass_ratio": number("Body water to fat-free mass ratio")
            })),
            "segmental_analysis": section(&json!({
                "right_arm": segment_ref,
                "left_arm": segment_ref,
                "torso": segment_ref,
                "right_leg": segment_ref,
                "left_leg": segment_ref
            })),
            "nutritional_assessment": section(&json!({
                "protein": text("Protein status: Low, Low-normal, Normal or High"),
                "fat": text("Fat status: Low, Low-normal, Normal or High"),
                "minerals": text("Minerals status: Low, Low-normal, Normal or High"),
                "water": text("Water status: Low, Low-normal, Normal or High")
            })),
            "history": section(&json!({
                "previous_weight_kg": number("Previous weight in kg"),
                "previous_body_water_kg": number("Previous body water in kg"),
                "previous_fat_percentage": number("Previous body fat percentage")
            }))
        },
        "required": [
            "basic_info", "body_composition", "muscle_fat_analysis", "belly_fat",
            "segmental_analysis", "nutritional_assessment", "history"
        ],
        "additionalProperties": false,
        "$defs": {
            "segment": section(&json!({
                "muscle_mass_kg": number("Muscle mass for the segment in kg"),
                "fat_mass_kg": number("Fat mass for the segment in kg")
            }))
        }
    })
}

/// Client for the report extraction call
#[derive(Clone)]
pub struct BodyCompositionExtractor {
    provider: Arc<dyn LlmProvider>,
    language: String,
}

impl BodyCompositionExtractor {
    /// Create a client replying in `language`
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, language: impl Into<String>) -> Self {
        Self {
            provider,
            language: language.into(),
        }
    }

    fn build_request(&self, image: &UploadedImage) -> ChatRequest {
        let prompt = format!(
            "Analyze this body composition report image and extract all numerical data, measurements, and health metrics. Read all text, numbers, charts, and tables visible in the image. Convert the extracted data into the JSON format specified in the schema. {}",
            language_instruction(&self.language)
        );
        ChatRequest::new(vec![
            ChatMessage::system(REPORT_EXTRACTOR_PROMPT),
            ChatMessage::user_with_images(prompt, [image]),
        ])
        .with_max_tokens(token_budgets::REPORT_EXTRACTION)
        .with_response_format(ResponseFormat::strict(
            "body_composition_report",
            body_composition_schema(),
        ))
    }

    /// Extract a report from one photo
    ///
    /// # Errors
    ///
    /// Returns a validation error when no usable image is given, and a
    /// service or response-shape error for any failed, empty or
    /// unparseable reply. There is no degraded result.
    #[instrument(skip_all, fields(image_bytes = image.map_or(0, UploadedImage::len)))]
    pub async fn extract(&self, image: Option<&UploadedImage>) -> AppResult<BodyCompositionReport> {
        let image = image
            .filter(|image| !image.is_empty())
            .ok_or_else(|| AppError::invalid_input(messages::MISSING_REPORT_IMAGE))?;
        require_vision(self.provider.as_ref(), OPERATION)?;

        let request = self.build_request(image);
        let report = async {
            let raw = complete_text(self.provider.as_ref(), &request, OPERATION).await?;
            parse_reply(&raw)
        }
        .await
        .map_err(|e| e.with_headline(messages::EXTRACTION_FAILED))?;

        info!(
            has_height = report.height.is_some(),
            has_weight = report.weight.is_some(),
            "Body composition extraction complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaps_basic_info() {
        let report = parse_reply(
            r#"{"basic_info":{"age":34,"gender":"Female","height_cm":172,"weight_kg":64.3,"test_date":"2025-03-01","overall_rating":78}}"#,
        )
        .unwrap();
        assert_eq!(report.height, Some(172.0));
        assert_eq!(report.weight, Some(64.3));
        assert_eq!(report.age, Some(34));
        assert_eq!(report.gender, Some(Gender::Female));
        assert_eq!(report.test_date.as_deref(), Some("2025-03-01"));
        assert!(report.segmental_data.is_none());
    }

    #[test]
    fn test_muscle_mass_feeds_both_targets() {
        let report =
            parse_reply(r#"{"body_composition":{"muscle_mass_kg":27.5,"lean_mass_kg":45.1}}"#)
                .unwrap();
        assert_eq!(report.muscle_mass, Some(27.5));
        assert_eq!(report.skeletal_muscle_mass, Some(27.5));
        assert_eq!(report.lean_body_mass, Some(45.1));
    }

    #[test]
    fn test_segments_and_nutrition() {
        let report = parse_reply(
            r#"{
                "segmental_analysis": {"torso": {"muscle_mass_kg": 20.1, "fat_mass_kg": null}},
                "nutritional_assessment": {"protein": "Normal", "fat": "Excessive", "minerals": "low-normal", "water": null}
            }"#,
        )
        .unwrap();
        let segments = report.segmental_data.unwrap();
        assert_eq!(segments.torso.as_ref().and_then(|t| t.muscle), Some(20.1));
        assert!(segments.torso.as_ref().unwrap().fat.is_none());
        assert!(segments.left_leg.is_none());

        let nutrition = report.nutritional_assessment.unwrap();
        assert_eq!(nutrition.protein, Some(NutrientLevel::Normal));
        assert_eq!(nutrition.minerals, Some(NutrientLevel::LowNormal));
        assert!(nutrition.water.is_none());
    }

    #[test]
    fn test_non_json_is_fatal() {
        let error = parse_reply("I could not read the report").unwrap_err();
        assert_eq!(error.code, soulfit_core::errors::ErrorCode::ResponseShape);
    }

    #[test]
    fn test_reply_without_sections_is_fatal() {
        for raw in ["{}", r#"{"unrelated": 1}"#] {
            let error = parse_reply(raw).unwrap_err();
            assert_eq!(error.code, soulfit_core::errors::ErrorCode::ResponseShape);
        }
    }

    #[test]
    fn test_schema_sections_require_all_keys() {
        let schema = body_composition_schema();
        let basic = &schema["properties"]["basic_info"];
        assert_eq!(basic["required"].as_array().map(Vec::len), Some(6));
        assert!(schema["$defs"]["segment"].is_object());
    }
}
