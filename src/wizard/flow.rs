// ABOUTME: Wizard flow coupling the state store with the three service clients
// ABOUTME: Sets and clears the loading flag around each call and records failures on the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use std::sync::Arc;
use tracing::{instrument, warn};

use super::{HealthAssessmentPatch, PosturePatch, WizardState, WizardStore};
use crate::config::GenerationConfig;
use crate::errors::{AppError, AppResult};
use crate::llm::LlmProvider;
use crate::services::{BodyCompositionExtractor, PostureAnalysis, PostureAnalyzer, ProgramGenerator};
use soulfit_core::models::{BodyCompositionReport, Exercise, GeneratedProgram, UploadedImage};

const NO_PROGRAM: &str = "Generate a program before requesting more exercises";

/// Message stored on the wizard for a failed call
fn user_message(error: &AppError) -> String {
    error
        .context
        .headline
        .clone()
        .unwrap_or_else(|| error.message.clone())
}

/// Clear the loading flag and record the outcome
fn settle<T>(store: &mut WizardStore, result: &AppResult<T>) {
    store.set_loading(false);
    if let Err(error) = result {
        warn!(code = ?error.code, error = %error.message, "Wizard step call failed");
        store.set_error(Some(user_message(error)));
    }
}

/// Clear a stale error and raise the loading flag
pub(crate) fn begin(store: &mut WizardStore) {
    store.set_error(None);
    store.set_loading(true);
}

/// Service clients used by the wizard steps
#[derive(Clone)]
pub struct WizardFlow {
    posture: PostureAnalyzer,
    extractor: BodyCompositionExtractor,
    generator: ProgramGenerator,
}

impl WizardFlow {
    /// Flow from explicit clients
    #[must_use]
    pub const fn new(
        posture: PostureAnalyzer,
        extractor: BodyCompositionExtractor,
        generator: ProgramGenerator,
    ) -> Self {
        Self {
            posture,
            extractor,
            generator,
        }
    }

    /// Flow whose clients all share one provider
    #[must_use]
    pub fn from_provider(provider: &Arc<dyn LlmProvider>, settings: GenerationConfig) -> Self {
        let language = settings.response_language.clone();
        Self::new(
            PostureAnalyzer::new(Arc::clone(provider), language.clone()),
            BodyCompositionExtractor::new(Arc::clone(provider), language),
            ProgramGenerator::new(Arc::clone(provider), settings),
        )
    }

    /// Posture client
    #[must_use]
    pub const fn posture(&self) -> &PostureAnalyzer {
        &self.posture
    }

    /// Extraction client
    #[must_use]
    pub const fn extractor(&self) -> &BodyCompositionExtractor {
        &self.extractor
    }

    /// Generation client
    #[must_use]
    pub const fn generator(&self) -> &ProgramGenerator {
        &self.generator
    }

    /// Analyze the photos held in the posture slots and store the result
    ///
    /// A previous analysis is dropped before the call so a failed re-run
    /// never leaves it next to new photos.
    ///
    /// # Errors
    ///
    /// Fails when fewer than four slots are filled or the service call fails
    #[instrument(skip_all)]
    pub async fn analyze_posture(&self, store: &mut WizardStore) -> AppResult<PostureAnalysis> {
        store.update_posture_submission(PosturePatch::cleared_analysis());
        begin(store);
        let result = self.posture_for(store.state()).await;
        Self::record_posture(store, &result);
        result
    }

    /// Posture call on a snapshot, without touching any store
    ///
    /// # Errors
    ///
    /// As [`Self::analyze_posture`]
    pub async fn posture_for(&self, state: &WizardState) -> AppResult<PostureAnalysis> {
        let images: Vec<&UploadedImage> = state
            .posture_submission
            .provided_images()
            .into_iter()
            .map(|(_, image)| image)
            .collect();
        self.posture.analyze(&images).await
    }

    /// Apply a posture outcome to the live store
    pub fn record_posture(store: &mut WizardStore, result: &AppResult<PostureAnalysis>) {
        settle(store, result);
        if let Ok(analysis) = result {
            store.update_posture_submission(PosturePatch::analyzed(
                analysis.analysis.clone(),
                analysis.recommendations.clone(),
            ));
        }
    }

    /// Extract a report from `image` and store it as the health report
    ///
    /// On failure the health data is left untouched so the caller can fall
    /// back to manual entry.
    ///
    /// # Errors
    ///
    /// Fails when the image is empty or the extraction fails in any way
    #[instrument(skip_all, fields(image_bytes = image.len()))]
    pub async fn extract_report(
        &self,
        store: &mut WizardStore,
        image: UploadedImage,
    ) -> AppResult<BodyCompositionReport> {
        begin(store);
        let result = self.report_for(&image).await;
        Self::record_report(store, &result, image);
        result
    }

    /// Extraction call, without touching any store
    ///
    /// # Errors
    ///
    /// As [`Self::extract_report`]
    pub async fn report_for(&self, image: &UploadedImage) -> AppResult<BodyCompositionReport> {
        self.extractor.extract(Some(image)).await
    }

    /// Apply an extraction outcome to the live store
    pub fn record_report(
        store: &mut WizardStore,
        result: &AppResult<BodyCompositionReport>,
        image: UploadedImage,
    ) {
        settle(store, result);
        if let Ok(report) = result {
            store.update_health_assessment(HealthAssessmentPatch::extracted(report.clone(), image));
        }
    }

    /// Generate a program from the collected data and store it
    ///
    /// # Errors
    ///
    /// Validation failures happen before any call; service and shape
    /// failures are reported with their phase
    #[instrument(skip_all)]
    pub async fn generate_program(&self, store: &mut WizardStore) -> AppResult<GeneratedProgram> {
        begin(store);
        let result = self.program_for(store.state()).await;
        Self::record_program(store, &result);
        result
    }

    /// Generation call on a snapshot, without touching any store
    ///
    /// # Errors
    ///
    /// As [`Self::generate_program`]
    pub async fn program_for(&self, state: &WizardState) -> AppResult<GeneratedProgram> {
        self.generator.generate(&state.generation_request(false)).await
    }

    /// Apply a generation outcome to the live store
    pub fn record_program(store: &mut WizardStore, result: &AppResult<GeneratedProgram>) {
        settle(store, result);
        if let Ok(program) = result {
            store.set_generated_program(program.clone());
        }
    }

    /// Generate extra main-workout exercises and append them
    ///
    /// # Errors
    ///
    /// Fails when no program has been generated yet, or as [`Self::generate_program`]
    #[instrument(skip_all)]
    pub async fn generate_more(&self, store: &mut WizardStore) -> AppResult<Vec<Exercise>> {
        begin(store);
        let result = self.more_for(store.state()).await;
        Self::record_more(store, &result);
        result
    }

    /// Extra-exercise call on a snapshot, without touching any store
    ///
    /// # Errors
    ///
    /// As [`Self::generate_more`]
    pub async fn more_for(&self, state: &WizardState) -> AppResult<Vec<Exercise>> {
        if state.generated_program.is_none() {
            return Err(AppError::invalid_input(NO_PROGRAM));
        }
        let request = state.generation_request(true);
        self.generator
            .generate_more(&request, &request.existing_exercises)
            .await
    }

    /// Apply an extra-exercise outcome to the live store
    ///
    /// Appending is a no-op when the program was reset in the meantime.
    pub fn record_more(store: &mut WizardStore, result: &AppResult<Vec<Exercise>>) {
        settle(store, result);
        if let Ok(extra) = result {
            store.append_exercises(extra.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulfit_core::errors::ErrorCode;

    #[test]
    fn test_user_message_prefers_headline() {
        let error = AppError::external_service("OpenAI", "timeout").with_headline("Failed");
        assert_eq!(user_message(&error), "Failed");
        let validation = AppError::invalid_input("Please provide all 4 posture images");
        assert_eq!(user_message(&validation), "Please provide all 4 posture images");
    }

    #[test]
    fn test_settle_records_error_and_clears_loading() {
        let mut store = WizardStore::new();
        begin(&mut store);
        assert!(store.state().is_loading);

        let result: AppResult<()> = Err(AppError::new(ErrorCode::ResponseShape, "bad json"));
        settle(&mut store, &result);
        assert!(!store.state().is_loading);
        assert_eq!(store.state().error.as_deref(), Some("bad json"));

        begin(&mut store);
        assert_eq!(store.state().error, None);
    }
}
