// ABOUTME: Posture analysis client turning four photos into findings text and recommendations
// ABOUTME: Renders structured findings, applies keyword rules and degrades to raw text on bad JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, instrument};

use super::complete_text;
use crate::constants::{messages, posture::REQUIRED_VIEWS, token_budgets};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{language_instruction, POSTURE_ASSESSOR_PROMPT};
use crate::llm::{require_vision, ChatMessage, ChatRequest, LlmProvider, ResponseFormat};
use crate::logging::AppLogger;
use soulfit_core::models::UploadedImage;

const FORWARD_HEAD: [&str; 2] = [
    "Focus on cervical spine alignment exercises",
    "Strengthen deep neck flexors",
];
const ROUNDED_SHOULDERS: [&str; 2] = [
    "Strengthen middle trapezius and rhomboids",
    "Stretch chest muscles and anterior deltoids",
];
const PELVIC_TILT: &str = "Core stabilization exercises for pelvic alignment";
const POSTURAL_AWARENESS: &str = "Focus on postural awareness throughout daily activities";
const FALLBACK_RECOMMENDATION: &str = "Follow the analysis recommendations provided above";

const OPERATION: &str = "posture analysis";

/// Findings from the front and back photos
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontBackFindings {
    /// Head tilt or rotation
    pub head_asymmetry: String,
    /// Shoulder level and scapular position
    pub shoulder_and_scapular: String,
    /// Foot placement
    pub feet_position: String,
}

/// Findings from the side photo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideFindings {
    /// Head position relative to the trunk
    pub head_posture: String,
    /// Shoulder and upper-back curvature
    pub shoulder_posture: String,
    /// Lumbar curve and pelvic alignment
    pub lumbar_pelvic_posture: String,
    /// Knee posture
    pub knee_observation: String,
}

/// Findings from the forward-bend photo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BendDownFindings {
    /// Range of spinal flexion
    pub spinal_flexibility: String,
    /// Control and symmetry of the movement
    pub movement_quality: String,
    /// Visible compensations
    pub compensations: String,
    /// Hip hinge pattern
    pub hip_hinge: String,
}

/// Structured reply of the posture service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosturalAssessment {
    /// Front and back views
    pub front_back_findings: FrontBackFindings,
    /// Side view
    pub side_findings: SideFindings,
    /// Forward bend, absent in replies following the older two-section layout
    #[serde(default)]
    pub bend_down_findings: Option<BendDownFindings>,
}

/// Result handed back to the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostureAnalysis {
    /// Human-readable findings
    pub analysis: String,
    /// Ordered recommendations
    pub recommendations: Vec<String>,
    /// Whether the reply failed to parse and the raw text was kept
    #[serde(skip)]
    pub degraded: bool,
}

/// Render findings into the fixed multi-section text block
#[must_use]
pub fn render_assessment(assessment: &PosturalAssessment) -> String {
    let front = &assessment.front_back_findings;
    let side = &assessment.side_findings;

    let mut text = format!(
        "Front/Back View Analysis:\n\
         - Head: {}\n\
         - Shoulders: {}\n\
         - Feet: {}\n\
         \n\
         Side View Analysis:\n\
         - Head Posture: {}\n\
         - Shoulder Posture: {}\n\
         - Lumbar/Pelvic: {}\n\
         - Knees: {}",
        front.head_asymmetry.trim(),
        front.shoulder_and_scapular.trim(),
        front.feet_position.trim(),
        side.head_posture.trim(),
        side.shoulder_posture.trim(),
        side.lumbar_pelvic_posture.trim(),
        side.knee_observation.trim(),
    );

    if let Some(bend) = &assessment.bend_down_findings {
        // Writing to a String cannot fail
        let _ = write!(
            text,
            "\n\nBend-Down Analysis:\n\
             - Spinal Flexibility: {}\n\
             - Movement Quality: {}\n\
             - Compensations: {}\n\
             - Hip Hinge: {}",
            bend.spinal_flexibility.trim(),
            bend.movement_quality.trim(),
            bend.compensations.trim(),
            bend.hip_hinge.trim(),
        );
    }

    text
}

/// Recommendations derived from side-view keywords, in fixed rule order
#[must_use]
pub fn derive_recommendations(assessment: &PosturalAssessment) -> Vec<String> {
    let side = &assessment.side_findings;
    let mut recommendations = Vec::new();

    if side.head_posture.to_lowercase().contains("forward") {
        recommendations.extend(FORWARD_HEAD.iter().map(|r| (*r).to_owned()));
    }
    if side.shoulder_posture.to_lowercase().contains("rounded") {
        recommendations.extend(ROUNDED_SHOULDERS.iter().map(|r| (*r).to_owned()));
    }
    if side.lumbar_pelvic_posture.to_lowercase().contains("tilt") {
        recommendations.push(PELVIC_TILT.to_owned());
    }
    recommendations.push(POSTURAL_AWARENESS.to_owned());

    recommendations
}

/// Interpret a reply, keeping the raw text when it is not the expected JSON
#[must_use]
pub fn interpret_reply(raw: &str) -> PostureAnalysis {
    match serde_json::from_str::<PosturalAssessment>(raw) {
        Ok(assessment) => PostureAnalysis {
            analysis: render_assessment(&assessment),
            recommendations: derive_recommendations(&assessment),
            degraded: false,
        },
        Err(e) => {
            AppLogger::log_unparseable_reply(OPERATION, &e.to_string(), raw);
            PostureAnalysis {
                analysis: raw.trim().to_owned(),
                recommendations: vec![FALLBACK_RECOMMENDATION.to_owned()],
                degraded: true,
            }
        }
    }
}

fn text_field(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// Strict JSON schema `postural_assessment`
#[must_use]
pub fn postural_assessment_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "front_back_findings": {
                "type": "object",
                "description": "Observations based on viewing the subject from the front or back.",
                "properties": {
                    "head_asymmetry": text_field("Right-to-left asymmetry or tilt/rotation of the head."),
                    "shoulder_and_scapular": text_field("Shoulder level and scapular positioning."),
                    "feet_position": text_field("How the feet are positioned or rotated.")
                },
                "required": ["head_asymmetry", "shoulder_and_scapular", "feet_position"],
                "additionalProperties": false
            },
            "side_findings": {
                "type": "object",
                "description": "Observations based on viewing the subject from the side.",
                "properties": {
                    "head_posture": text_field("Head position relative to the body."),
                    "shoulder_posture": text_field("Shoulders and upper-back curvature."),
                    "lumbar_pelvic_posture": text_field("Lumbar curve and pelvic alignment."),
                    "knee_observation": text_field("Knee joint posture.")
                },
                "required": ["head_posture", "shoulder_posture", "lumbar_pelvic_posture", "knee_observation"],
                "additionalProperties": false
            },
            "bend_down_findings": {
                "type": ["object", "null"],
                "description": "Observations from the forward-bend photo, null when it cannot be assessed.",
                "properties": {
                    "spinal_flexibility": text_field("Range and smoothness of spinal flexion."),
                    "movement_quality": text_field("Control and symmetry of the movement."),
                    "compensations": text_field("Visible compensations such as knee bend or shift."),
                    "hip_hinge": text_field("Hip hinge pattern.")
                },
                "required": ["spinal_flexibility", "movement_quality", "compensations", "hip_hinge"],
                "additionalProperties": false
            }
        },
        "required": ["front_back_findings", "side_findings", "bend_down_findings"],
        "additionalProperties": false
    })
}

/// Client for the posture analysis call
#[derive(Clone)]
pub struct PostureAnalyzer {
    provider: Arc<dyn LlmProvider>,
    language: String,
}

impl PostureAnalyzer {
    /// Create a client replying in `language`
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, language: impl Into<String>) -> Self {
        Self {
            provider,
            language: language.into(),
        }
    }

    fn build_request(&self, images: &[&UploadedImage]) -> ChatRequest {
        let prompt = format!(
            "Analyze these 4 posture images (front, back, side, forward bend) and provide a comprehensive postural assessment. {}",
            language_instruction(&self.language)
        );
        ChatRequest::new(vec![
            ChatMessage::system(POSTURE_ASSESSOR_PROMPT),
            ChatMessage::user_with_images(prompt, images.iter().copied()),
        ])
        .with_max_tokens(token_budgets::POSTURE_ANALYSIS)
        .with_response_format(ResponseFormat::strict(
            "postural_assessment",
            postural_assessment_schema(),
        ))
    }

    /// Analyze exactly four posture photos
    ///
    /// # Errors
    ///
    /// Returns a validation error when the photo count is not four, a
    /// configuration error when the provider cannot read images, and a
    /// service error when the call fails or the reply is empty. A reply
    /// that is not the expected JSON is not an error.
    #[instrument(skip_all, fields(images = images.len()))]
    pub async fn analyze(&self, images: &[&UploadedImage]) -> AppResult<PostureAnalysis> {
        if images.len() != REQUIRED_VIEWS {
            return Err(AppError::invalid_input(messages::MISSING_POSTURE_IMAGES));
        }
        require_vision(self.provider.as_ref(), OPERATION)?;

        let request = self.build_request(images);
        let raw = complete_text(self.provider.as_ref(), &request, OPERATION)
            .await
            .map_err(|e| e.with_headline(messages::POSTURE_FAILED))?;

        let result = interpret_reply(&raw);
        info!(
            recommendations = result.recommendations.len(),
            degraded = result.degraded,
            "Posture analysis complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(head: &str, shoulders: &str, pelvis: &str) -> PosturalAssessment {
        PosturalAssessment {
            front_back_findings: FrontBackFindings {
                head_asymmetry: "level".to_owned(),
                shoulder_and_scapular: "right shoulder higher".to_owned(),
                feet_position: "slight external rotation".to_owned(),
            },
            side_findings: SideFindings {
                head_posture: head.to_owned(),
                shoulder_posture: shoulders.to_owned(),
                lumbar_pelvic_posture: pelvis.to_owned(),
                knee_observation: "neutral".to_owned(),
            },
            bend_down_findings: None,
        }
    }

    #[test]
    fn test_all_rules_fire_in_fixed_order() {
        let recs = derive_recommendations(&assessment(
            "Head carried FORWARD",
            "Rounded shoulders",
            "anterior pelvic tilt",
        ));
        assert_eq!(
            recs,
            vec![
                FORWARD_HEAD[0],
                FORWARD_HEAD[1],
                ROUNDED_SHOULDERS[0],
                ROUNDED_SHOULDERS[1],
                PELVIC_TILT,
                POSTURAL_AWARENESS,
            ]
        );
    }

    #[test]
    fn test_no_keywords_gives_awareness_only() {
        let recs = derive_recommendations(&assessment("neutral", "level", "neutral"));
        assert_eq!(recs, vec![POSTURAL_AWARENESS]);
    }

    #[test]
    fn test_render_without_bend_down_section() {
        let text = render_assessment(&assessment("neutral", "level", "neutral"));
        assert!(text.starts_with("Front/Back View Analysis:\n- Head: level"));
        assert!(text.contains("\n\nSide View Analysis:\n- Head Posture: neutral"));
        assert!(text.ends_with("- Knees: neutral"));
        assert!(!text.contains("Bend-Down"));
    }

    #[test]
    fn test_render_with_bend_down_section() {
        let mut findings = assessment("neutral", "level", "neutral");
        findings.bend_down_findings = Some(BendDownFindings {
            spinal_flexibility: "limited".to_owned(),
            movement_quality: "controlled".to_owned(),
            compensations: "knees bend".to_owned(),
            hip_hinge: "good".to_owned(),
        });
        let text = render_assessment(&findings);
        assert!(text.ends_with(
            "Bend-Down Analysis:\n- Spinal Flexibility: limited\n- Movement Quality: controlled\n- Compensations: knees bend\n- Hip Hinge: good"
        ));
    }

    #[test]
    fn test_unparseable_reply_degrades() {
        let result = interpret_reply("  The posture looks balanced overall.  ");
        assert!(result.degraded);
        assert_eq!(result.analysis, "The posture looks balanced overall.");
        assert_eq!(result.recommendations, vec![FALLBACK_RECOMMENDATION]);
    }

    #[test]
    fn test_schema_requires_every_section() {
        let schema = postural_assessment_schema();
        assert_eq!(schema["required"].as_array().map(Vec::len), Some(3));
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(
            schema["properties"]["bend_down_findings"]["type"],
            serde_json::json!(["object", "null"])
        );
    }

    #[test]
    fn test_null_bend_down_findings_render_two_sections() {
        let mut reply = serde_json::to_value(assessment("neutral", "level", "neutral")).unwrap();
        reply["bend_down_findings"] = Value::Null;

        let result = interpret_reply(&reply.to_string());
        assert!(!result.degraded);
        assert!(result.analysis.contains("Side View Analysis:"));
        assert!(!result.analysis.contains("Bend-Down"));
    }
}
