// ABOUTME: Typed partial updates for the wizard aggregates
// ABOUTME: Absent keys leave fields untouched, explicit null clears optional fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! Partial updates
//!
//! Every patch field is wrapped in one extra `Option`: `None` means the key
//! was absent and the field is left alone. For fields that are themselves
//! optional, `Some(None)` (an explicit JSON `null`) clears the field.
//!
//! Nested objects are never deep-merged. A patch carrying
//! `bodyCompositionReport` or `preferences` replaces that object as a whole.

use serde::{Deserialize, Deserializer};

use soulfit_core::models::{
    AvailableTime, BodyCompositionReport, ExperienceLevel, GoalPreferences, HealthAssessment,
    InstructorType, PostureSubmission, PostureView, PreferredPace, PrimaryGoal, SessionFrequency,
    TrainingFormat, UploadedImage, UserGoals,
};

/// Keep an explicit `null` distinguishable from an absent key
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

macro_rules! assign {
    ($target:expr, $patch:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )*
    };
}

/// Partial update of the posture submission
///
/// Photos cannot be sent as JSON; they are attached by the upload route.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PosturePatch {
    /// Front photo
    #[serde(skip)]
    pub front_image: Option<Option<UploadedImage>>,
    /// Back photo
    #[serde(skip)]
    pub back_image: Option<Option<UploadedImage>>,
    /// Side photo
    #[serde(skip)]
    pub side_image: Option<Option<UploadedImage>>,
    /// Forward-bend photo
    #[serde(skip)]
    pub bend_down_image: Option<Option<UploadedImage>>,
    /// Rendered analysis text
    #[serde(default, deserialize_with = "present")]
    pub analysis: Option<Option<String>>,
    /// Recommendations
    #[serde(default, deserialize_with = "present")]
    pub recommendations: Option<Option<Vec<String>>>,
}

impl PosturePatch {
    /// Patch that sets one photo slot
    #[must_use]
    pub fn image(view: PostureView, image: UploadedImage) -> Self {
        let mut patch = Self::default();
        *patch.image_slot_mut(view) = Some(Some(image));
        patch
    }

    /// Patch that stores an analysis result
    #[must_use]
    pub fn analyzed(analysis: String, recommendations: Vec<String>) -> Self {
        Self {
            analysis: Some(Some(analysis)),
            recommendations: Some(Some(recommendations)),
            ..Self::default()
        }
    }

    /// Patch that drops a previous analysis and its recommendations
    #[must_use]
    pub fn cleared_analysis() -> Self {
        Self {
            analysis: Some(None),
            recommendations: Some(None),
            ..Self::default()
        }
    }

    fn image_slot_mut(&mut self, view: PostureView) -> &mut Option<Option<UploadedImage>> {
        match view {
            PostureView::Front => &mut self.front_image,
            PostureView::Back => &mut self.back_image,
            PostureView::Side => &mut self.side_image,
            PostureView::BendDown => &mut self.bend_down_image,
        }
    }

    /// Merge into `target`
    pub fn apply(self, target: &mut PostureSubmission) {
        assign!(
            target,
            self,
            [
                front_image,
                back_image,
                side_image,
                bend_down_image,
                analysis,
                recommendations,
            ]
        );
    }
}

/// Partial update of the health assessment
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HealthAssessmentPatch {
    /// Assessment identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Replaces the whole report; never merged field by field
    #[serde(default, deserialize_with = "present")]
    pub body_composition_report: Option<Option<BodyCompositionReport>>,
    /// Source photo, attached by the upload route
    #[serde(skip)]
    pub report_image: Option<Option<UploadedImage>>,
    /// Whether the report was extracted from the photo
    #[serde(default)]
    pub extracted_from_image: Option<bool>,
    /// Declared health conditions
    #[serde(default)]
    pub health_conditions: Option<Vec<String>>,
    /// Declared injuries
    #[serde(default)]
    pub injuries: Option<Vec<String>>,
    /// Free-form notes
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

impl HealthAssessmentPatch {
    /// Patch that stores an extracted report and its source photo
    #[must_use]
    pub fn extracted(report: BodyCompositionReport, image: UploadedImage) -> Self {
        Self {
            body_composition_report: Some(Some(report)),
            report_image: Some(Some(image)),
            extracted_from_image: Some(true),
            ..Self::default()
        }
    }

    /// Merge into `target`
    pub fn apply(self, target: &mut HealthAssessment) {
        assign!(
            target,
            self,
            [
                id,
                body_composition_report,
                report_image,
                extracted_from_image,
                health_conditions,
                injuries,
                notes,
            ]
        );
    }
}

/// Partial update of the goals questionnaire
///
/// Field names and meanings match [`UserGoals`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserGoalsPatch {
    /// Primary goal
    #[serde(default)]
    pub primary_goal: Option<PrimaryGoal>,
    /// Experience level
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    /// Session length
    #[serde(default)]
    pub available_time: Option<AvailableTime>,
    /// Sessions per week
    #[serde(default)]
    pub frequency: Option<SessionFrequency>,
    /// Body areas to focus on
    #[serde(default)]
    pub focus_areas: Option<Vec<String>>,
    /// Physical limitations
    #[serde(default)]
    pub limitations: Option<Vec<String>>,
    /// Replaces all preferences at once
    #[serde(default)]
    pub preferences: Option<GoalPreferences>,

    /// Goals not covered by the fixed list
    #[serde(default, deserialize_with = "present")]
    pub other_goals: Option<Option<String>>,
    /// Has exercised regularly before
    #[serde(default, deserialize_with = "present")]
    pub has_exercised_before: Option<Option<bool>>,
    /// Has practised Pilates before
    #[serde(default, deserialize_with = "present")]
    pub has_pilates_experience: Option<Option<bool>>,
    /// Preferred session pace
    #[serde(default, deserialize_with = "present")]
    pub preferred_style: Option<Option<PreferredPace>>,
    /// What motivates the user
    #[serde(default, deserialize_with = "present")]
    pub motivation: Option<Option<String>>,
    /// Results the user expects
    #[serde(default, deserialize_with = "present")]
    pub expected_results: Option<Option<String>>,
    /// What stopped the user before
    #[serde(default, deserialize_with = "present")]
    pub past_barriers: Option<Option<String>>,
    /// Anticipated obstacles
    #[serde(default, deserialize_with = "present")]
    pub potential_obstacles: Option<Option<Vec<String>>>,
    /// Concerns about training
    #[serde(default, deserialize_with = "present")]
    pub concerns: Option<Option<Vec<String>>>,
    /// Declared medical conditions
    #[serde(default, deserialize_with = "present")]
    pub medical_conditions: Option<Option<Vec<String>>>,
    /// Conditions not covered by the fixed list
    #[serde(default, deserialize_with = "present")]
    pub other_medical_conditions: Option<Option<String>>,
    /// Whether a medical release is needed
    #[serde(default, deserialize_with = "present")]
    pub medical_release_required: Option<Option<bool>>,

    /// Height in cm
    #[serde(default, deserialize_with = "present")]
    pub height: Option<Option<f64>>,
    /// Weight in kg
    #[serde(default, deserialize_with = "present")]
    pub weight: Option<Option<f64>>,
    /// Body fat percentage
    #[serde(default, deserialize_with = "present")]
    pub body_fat_percentage: Option<Option<f64>>,
    /// Blood oxygen saturation
    #[serde(default, deserialize_with = "present")]
    pub oxygen_level: Option<Option<f64>>,
    /// Blood pressure as written
    #[serde(default, deserialize_with = "present")]
    pub blood_pressure: Option<Option<String>>,
    /// Resting heart rate in bpm
    #[serde(default, deserialize_with = "present")]
    pub resting_heart_rate: Option<Option<f64>>,
    /// Chest circumference in cm
    #[serde(default, deserialize_with = "present")]
    pub chest_measurement: Option<Option<f64>>,
    /// Waist circumference in cm
    #[serde(default, deserialize_with = "present")]
    pub waist_measurement: Option<Option<f64>>,
    /// Hip circumference in cm
    #[serde(default, deserialize_with = "present")]
    pub hip_measurement: Option<Option<f64>>,
    /// Left arm circumference in cm
    #[serde(default, deserialize_with = "present")]
    pub left_arm_measurement: Option<Option<f64>>,
    /// Right arm circumference in cm
    #[serde(default, deserialize_with = "present")]
    pub right_arm_measurement: Option<Option<f64>>,
    /// Left thigh circumference in cm
    #[serde(default, deserialize_with = "present")]
    pub left_thigh_measurement: Option<Option<f64>>,
    /// Right thigh circumference in cm
    #[serde(default, deserialize_with = "present")]
    pub right_thigh_measurement: Option<Option<f64>>,

    /// Desired transformation
    #[serde(default, deserialize_with = "present")]
    pub desired_transformation: Option<Option<String>>,
    /// Source of inspiration
    #[serde(default, deserialize_with = "present")]
    pub inspiration: Option<Option<String>>,
    /// Preferred instructor attitude
    #[serde(default, deserialize_with = "present")]
    pub preferred_instructor_type: Option<Option<InstructorType>>,
    /// Preferred coaching format
    #[serde(default, deserialize_with = "present")]
    pub preferred_training_style: Option<Option<TrainingFormat>>,
}

impl UserGoalsPatch {
    /// Merge into `target`
    pub fn apply(self, target: &mut UserGoals) {
        assign!(
            target,
            self,
            [
                primary_goal,
                experience_level,
                available_time,
                frequency,
                focus_areas,
                limitations,
                preferences,
                other_goals,
                has_exercised_before,
                has_pilates_experience,
                preferred_style,
                motivation,
                expected_results,
                past_barriers,
                potential_obstacles,
                concerns,
                medical_conditions,
                other_medical_conditions,
                medical_release_required,
                height,
                weight,
                body_fat_percentage,
                oxygen_level,
                blood_pressure,
                resting_heart_rate,
                chest_measurement,
                waist_measurement,
                hip_measurement,
                left_arm_measurement,
                right_arm_measurement,
                left_thigh_measurement,
                right_thigh_measurement,
                desired_transformation,
                inspiration,
                preferred_instructor_type,
                preferred_training_style,
            ]
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_null_are_distinct() {
        let patch: UserGoalsPatch =
            serde_json::from_value(json!({ "motivation": null })).unwrap();
        assert_eq!(patch.motivation, Some(None));
        assert_eq!(patch.inspiration, None);
    }

    #[test]
    fn test_null_clears_optional_goal_field() {
        let mut goals = UserGoals {
            motivation: Some("feel stronger".to_owned()),
            inspiration: Some("my coach".to_owned()),
            ..UserGoals::default()
        };
        let patch: UserGoalsPatch =
            serde_json::from_value(json!({ "motivation": null })).unwrap();
        patch.apply(&mut goals);
        assert_eq!(goals.motivation, None);
        assert_eq!(goals.inspiration.as_deref(), Some("my coach"));
    }

    #[test]
    fn test_focus_areas_patch_leaves_other_goals_untouched() {
        let mut goals = UserGoals {
            primary_goal: PrimaryGoal::Rehabilitation,
            experience_level: ExperienceLevel::Intermediate,
            available_time: AvailableTime::Minutes60,
            frequency: SessionFrequency::try_from(4).unwrap(),
            focus_areas: vec!["hips".to_owned()],
            limitations: vec!["no deep knee flexion".to_owned()],
            preferences: GoalPreferences {
                equipment: vec!["Reformer".to_owned()],
                ..GoalPreferences::default()
            },
            other_goals: Some("run a half marathon".to_owned()),
            has_exercised_before: Some(true),
            has_pilates_experience: Some(false),
            preferred_style: Some(PreferredPace::Slow),
            motivation: Some("feel stronger".to_owned()),
            medical_conditions: Some(vec!["asthma".to_owned()]),
            medical_release_required: Some(false),
            height: Some(168.0),
            weight: Some(61.0),
            blood_pressure: Some("118/76".to_owned()),
            waist_measurement: Some(72.5),
            preferred_instructor_type: Some(InstructorType::Calm),
            preferred_training_style: Some(TrainingFormat::Detailed),
            ..UserGoals::default()
        };
        let expected = UserGoals {
            focus_areas: vec!["core".to_owned(), "posture".to_owned()],
            ..goals.clone()
        };

        let patch: UserGoalsPatch =
            serde_json::from_value(json!({ "focusAreas": ["core", "posture"] })).unwrap();
        patch.apply(&mut goals);

        assert_eq!(goals, expected);
    }

    #[test]
    fn test_cleared_analysis_keeps_photos() {
        let mut posture = PostureSubmission {
            analysis: Some("old".to_owned()),
            recommendations: Some(vec!["old advice".to_owned()]),
            front_image: Some(UploadedImage::new(None, None, vec![1])),
            ..PostureSubmission::default()
        };
        PosturePatch::cleared_analysis().apply(&mut posture);
        assert_eq!(posture.analysis, None);
        assert_eq!(posture.recommendations, None);
        assert!(posture.front_image.is_some());
    }

    #[test]
    fn test_report_is_replaced_not_merged() {
        let mut health = HealthAssessment {
            body_composition_report: Some(BodyCompositionReport {
                height: Some(170.0),
                weight: Some(60.0),
                ..BodyCompositionReport::default()
            }),
            injuries: vec!["ankle".to_owned()],
            ..HealthAssessment::default()
        };
        let patch: HealthAssessmentPatch = serde_json::from_value(json!({
            "bodyCompositionReport": { "weight": 61.5 }
        }))
        .unwrap();
        patch.apply(&mut health);

        let report = health.body_composition_report.unwrap();
        assert_eq!(report.weight, Some(61.5));
        assert_eq!(report.height, None);
        assert_eq!(health.injuries, vec!["ankle"]);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(serde_json::from_value::<PosturePatch>(json!({ "frontImage": "x" })).is_err());
        assert!(serde_json::from_value::<UserGoalsPatch>(json!({ "favouriteColour": "red" })).is_err());
    }

    #[test]
    fn test_image_patch_touches_one_slot() {
        let mut posture = PostureSubmission {
            analysis: Some("kept".to_owned()),
            ..PostureSubmission::default()
        };
        PosturePatch::image(PostureView::Side, UploadedImage::new(None, None, vec![1, 2]))
            .apply(&mut posture);
        assert!(posture.side_image.is_some());
        assert!(posture.front_image.is_none());
        assert_eq!(posture.analysis.as_deref(), Some("kept"));
    }
}
