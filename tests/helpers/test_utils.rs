// ABOUTME: Shared fixtures for integration tests
// ABOUTME: Test configuration, canned model replies and router construction over a scripted provider

use axum::Router;
use serde_json::{json, Value};
use soulfit_server::config::{
    CorsConfig, GenerationConfig, GenerationStrategy, LlmConfig, ServerConfig, SessionConfig,
};
use soulfit_server::llm::LlmProvider;
use soulfit_server::models::UploadedImage;
use soulfit_server::resources::ServerResources;
use soulfit_server::routes;
use std::sync::Arc;

use super::scripted_llm::ScriptedLlm;

/// Configuration that never touches the environment
pub fn test_config(strategy: GenerationStrategy) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        host: "127.0.0.1".to_owned(),
        llm: LlmConfig {
            api_key: "test-key".to_owned(),
            base_url: "http://llm.invalid/v1".to_owned(),
            model: "scripted-model".to_owned(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_owned()],
        },
        generation: GenerationConfig {
            strategy,
            response_language: "English".to_owned(),
            ..GenerationConfig::default()
        },
        max_upload_bytes: 1024 * 1024,
        sessions: SessionConfig::default(),
    }
}

/// Resources and router over a scripted provider
pub fn test_app(provider: &Arc<ScriptedLlm>, strategy: GenerationStrategy) -> (Arc<ServerResources>, Router) {
    let dyn_provider: Arc<dyn LlmProvider> = Arc::clone(provider) as Arc<dyn LlmProvider>;
    let resources = Arc::new(ServerResources::with_provider(
        test_config(strategy),
        dyn_provider,
    ));
    let router = routes::router(&resources);
    (resources, router)
}

/// Small JPEG-looking image
pub fn image(name: &str) -> UploadedImage {
    UploadedImage::new(Some("image/jpeg"), Some(name), vec![0xFF, 0xD8, 0xFF, 0xE0])
}

/// Posture reply with forward head and rounded shoulders
pub fn posture_reply() -> String {
    json!({
        "front_back_findings": {
            "head_asymmetry": "Head tilted slightly to the left",
            "shoulder_and_scapular": "Right shoulder higher than left",
            "feet_position": "Feet turned out"
        },
        "side_findings": {
            "head_posture": "Forward head posture",
            "shoulder_posture": "Rounded shoulders",
            "lumbar_pelvic_posture": "Neutral lumbar curve",
            "knee_observation": "Knees slightly hyperextended"
        },
        "bend_down_findings": null
    })
    .to_string()
}

/// Extraction reply for a 172 cm, 64.3 kg report
pub fn report_reply() -> String {
    json!({
        "basic_info": {
            "age": 34, "gender": "Female", "height_cm": 172, "weight_kg": 64.3,
            "test_date": "2025-01-10", "overall_rating": 72
        },
        "body_composition": {
            "intracellular_fluid_L": 20.1, "extracellular_fluid_L": 12.4, "body_water_kg": 32.5,
            "muscle_mass_kg": 44.0, "lean_mass_kg": null, "protein_kg": 8.8,
            "minerals_kg": 3.1, "fat_mass_kg": 18.2
        },
        "muscle_fat_analysis": { "bmi": 21.7, "body_fat_percentage": 28.3 },
        "belly_fat": {
            "visceral_fat_area_cm2": 62.0, "subcutaneous_fat_area_cm2": null,
            "body_water_fat_free_mass_ratio": null
        },
        "segmental_analysis": null,
        "nutritional_assessment": { "protein": "Normal", "fat": "High", "minerals": "Low-normal", "water": "unclear" },
        "history": null
    })
    .to_string()
}

/// Phase-one analysis reply
pub fn analysis_reply() -> Value {
    json!({
        "movement_assessment": {
            "primary_dysfunctions": ["Forward head posture"],
            "muscle_imbalances": ["Tight pectorals", "Weak deep neck flexors"],
            "postural_deviations": ["Rounded shoulders"],
            "mobility_restrictions": ["Thoracic extension"],
            "postural_description": "Upper-crossed pattern"
        },
        "health_considerations": {
            "body_composition_insights": "Healthy BMI",
            "strength_levels": "Moderate",
            "risk_factors": [],
            "exercise_contraindications": ["Loaded cervical flexion"]
        },
        "priority_areas": {
            "immediate_focus": ["Thoracic mobility"],
            "secondary_goals": ["Core endurance"],
            "long_term_objectives": ["Postural endurance"]
        },
        "pilates_strategy": {
            "key_principles": ["Breath", "Alignment"],
            "optimal_exercise_types": ["Spinal extension"],
            "progression_approach": "Mat to Reformer",
            "session_structure_rationale": "Mobilize, strengthen, release"
        }
    })
}

fn exercise(name: &str, reasoning: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "duration": 3,
        "repetitions": 8,
        "sets": 2,
        "targetAreas": ["Upper back"],
        "difficulty": "easy",
        "modifications": ["Smaller range"],
        "equipment": ["Mat"],
        "reasoning": reasoning
    })
}

/// Phase-two design reply; `main_reasoning` is the reasoning of the main exercise
pub fn program_reply(main_reasoning: &str) -> Value {
    json!({
        "title": "Posture Reset",
        "duration": 45,
        "warmUp": [exercise("Breathing", "Sets up ribcage control")],
        "mainWorkout": [
            exercise("Swan Prep", main_reasoning),
            exercise("Chest Lift", "Strengthens deep neck flexors")
        ],
        "coolDown": [exercise("Child's Pose", "Releases the back")],
        "reasoning": "Opens the front line and strengthens the back line",
        "targetedIssues": ["Forward head"],
        "expectedOutcomes": ["Taller posture"],
        "progressionTips": ["Add the Reformer after four weeks"]
    })
}

/// Extra main-workout exercises reply
pub fn more_reply() -> Value {
    json!({
        "mainWorkout": [exercise("Swimming", "Builds back extensor endurance")]
    })
}

/// Generation request body with everything filled in
pub fn generation_request() -> Value {
    json!({
        "postureAnalysis": "Side View Analysis:\n- Head Posture: Forward head posture",
        "recommendations": ["Strengthen deep neck flexors"],
        "healthAssessment": {
            "bodyCompositionReport": { "height": 172.0, "weight": 64.3 },
            "healthConditions": [],
            "injuries": []
        },
        "userGoals": {
            "primaryGoal": "rehabilitation",
            "experienceLevel": "beginner",
            "availableTime": 45,
            "frequency": 3
        },
        "selectedEquipment": ["Mat", "Reformer"]
    })
}
