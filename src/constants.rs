// ABOUTME: Server-wide constants for defaults, environment keys and LLM token budgets
// ABOUTME: Shared by configuration loading, the service clients and the HTTP layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! # Constants Module
//!
//! Hardcoded defaults and the names of the environment variables that
//! override them. Domain constants (step bounds, program labels) live in
//! `soulfit_core::constants`.

pub use soulfit_core::constants::{posture, program, wizard};

/// Service identifiers used in logs
pub mod service_names {
    /// Name of the HTTP server
    pub const SOULFIT_SERVER: &str = "soulfit-server";
    /// Rust target prefix for log filtering
    pub const CRATE_TARGET: &str = "soulfit_server";
}

/// Environment variable names
pub mod env_keys {
    /// LLM credential
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// OpenAI-compatible endpoint
    pub const LLM_BASE_URL: &str = "LLM_BASE_URL";
    /// Model used for every call
    pub const LLM_MODEL: &str = "LLM_MODEL";
    /// Listener port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Listener address
    pub const HOST: &str = "HOST";
    /// Comma-separated CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// `two_phase` or `single_phase`
    pub const GENERATION_STRATEGY: &str = "SOULFIT_GENERATION_STRATEGY";
    /// Whether generation needs selected equipment
    pub const REQUIRE_EQUIPMENT: &str = "SOULFIT_REQUIRE_EQUIPMENT";
    /// `placeholder` or `reject`
    pub const UNRESOLVED_EXERCISES: &str = "SOULFIT_UNRESOLVED_EXERCISES";
    /// Pause between the two generation phases
    pub const PHASE_DELAY_MS: &str = "SOULFIT_PHASE_DELAY_MS";
    /// Reply language for every prompt
    pub const RESPONSE_LANGUAGE: &str = "SOULFIT_RESPONSE_LANGUAGE";
    /// Request body limit for uploads
    pub const MAX_UPLOAD_BYTES: &str = "SOULFIT_MAX_UPLOAD_BYTES";
    /// Seconds without access before a wizard session is dropped
    pub const SESSION_IDLE_TIMEOUT_SECS: &str = "SOULFIT_SESSION_IDLE_TIMEOUT_SECS";
    /// Seconds between idle-session sweeps
    pub const SESSION_SWEEP_INTERVAL_SECS: &str = "SOULFIT_SESSION_SWEEP_INTERVAL_SECS";
}

/// Default configuration values
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 3000;
    /// Default listener address
    pub const HOST: &str = "127.0.0.1";
    /// Default LLM endpoint
    pub const LLM_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default model
    pub const LLM_MODEL: &str = "gpt-5-mini";
    /// Default CORS policy
    pub const CORS_ALLOWED_ORIGINS: &str = "*";
    /// Default reply language
    pub const RESPONSE_LANGUAGE: &str = "Thai";
    /// Default upload limit (20 MiB)
    pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
    /// Default idle session lifetime (1 hour)
    pub const SESSION_IDLE_TIMEOUT_SECS: u64 = 3600;
    /// Default sweep period (5 minutes)
    pub const SESSION_SWEEP_INTERVAL_SECS: u64 = 300;
}

/// Completion token budgets per call
pub mod token_budgets {
    /// Posture analysis
    pub const POSTURE_ANALYSIS: u32 = 5000;
    /// Body-composition extraction
    pub const REPORT_EXTRACTION: u32 = 10000;
    /// Each program generation call
    pub const PROGRAM_GENERATION: u32 = 5000;
}

/// Logging limits
pub mod logging {
    /// Characters of raw model output kept when a reply fails to parse
    pub const RAW_OUTPUT_PREVIEW_CHARS: usize = 500;
}

/// HTTP surface
pub mod http {
    /// Request correlation header
    pub const REQUEST_ID_HEADER: &str = "x-request-id";
    /// Multipart field carrying the body-composition report
    pub const REPORT_IMAGE_FIELD: &str = "reportImage";
}

/// Fixed end-user messages
pub mod messages {
    /// Posture route or flow received the wrong number of photos
    pub const MISSING_POSTURE_IMAGES: &str = "Please provide all 4 posture images";
    /// Posture analysis failed
    pub const POSTURE_FAILED: &str = "Failed to analyze posture images";
    /// Extraction route received no report photo
    pub const MISSING_REPORT_IMAGE: &str = "Please provide a body composition report image";
    /// Extraction failed
    pub const EXTRACTION_FAILED: &str = "Failed to extract data from body composition report";
    /// Generation requested before posture analysis
    pub const MISSING_POSTURE_ANALYSIS: &str = "Posture analysis is required";
    /// Generation requested without equipment
    pub const MISSING_EQUIPMENT: &str = "Please select at least one piece of equipment";
    /// Generation failed
    pub const GENERATION_FAILED: &str = "Failed to generate Pilates program";
    /// Generate-more failed
    pub const GENERATE_MORE_FAILED: &str = "Failed to generate more exercises";
}

/// Generation phase labels attached to errors
pub mod phases {
    /// Clinical and movement analysis
    pub const ANALYSIS: &str = "Phase 1 Analysis";
    /// Program design
    pub const DESIGN: &str = "Phase 2 Design";
}
