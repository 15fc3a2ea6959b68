// ABOUTME: Unified error taxonomy for the SoulFit wizard server
// ABOUTME: Maps validation, service-call and response-shape failures onto codes and HTTP statuses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! # Unified Error Handling
//!
//! Every failure surfaced by the wizard store, the service clients and the
//! HTTP layer is an [`AppError`]. The [`ErrorCode`] decides the HTTP status
//! and which family the failure belongs to:
//!
//! - **Validation** (`InvalidInput`, `MissingRequiredField`): caller
//!   preconditions, always detected before any network call.
//! - **`NoExercisesAvailable`**: the equipment filter left nothing to program.
//! - **Service call** (`ExternalService*`): transport failure or non-2xx
//!   from the LLM provider.
//! - **Response shape** (`ResponseShape`): the provider answered but the
//!   payload does not parse or misses mandatory fields.
//!
//! End users only ever see a short fixed headline plus the `details` string
//! taken from the error message.

#[cfg(feature = "http-response")]
mod http_response;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error as StdError;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Caller-supplied input violates a precondition
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field or aggregate is absent
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Equipment filtering left an empty exercise catalog
    #[serde(rename = "NO_EXERCISES_AVAILABLE")]
    NoExercisesAvailable = 3100,

    // Resources (4000-4999)
    /// Requested resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// Resource is busy with another call
    #[serde(rename = "RESOURCE_LOCKED")]
    ResourceLocked = 4002,

    // External Services (5000-5999)
    /// The LLM provider failed or returned a non-2xx status
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// The LLM provider rejected our credential
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// The LLM provider rate limited the request
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,
    /// The provider answered but the payload is unusable
    #[serde(rename = "RESPONSE_SHAPE_ERROR")]
    ResponseShape = 5100,

    // Configuration (6000-6999)
    /// Configuration error encountered
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Serialization of an outbound payload failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField => 400,
            Self::ResourceNotFound => 404,
            Self::ResourceLocked => 409,
            Self::NoExercisesAvailable => 422,
            Self::ExternalServiceError
            | Self::ExternalAuthFailed
            | Self::ExternalRateLimited
            | Self::ResponseShape
            | Self::ConfigError
            | Self::ConfigMissing
            | Self::InternalError
            | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::NoExercisesAvailable => "No exercises are available for the selected equipment",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceLocked => "The resource is currently locked and cannot be modified",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ResponseShape => "The external service returned an unusable response",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether this code describes a caller precondition failure
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput | Self::MissingRequiredField | Self::NoExercisesAvailable
        )
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Fixed human-readable headline shown to end users
    pub headline: Option<String>,
    /// Generation phase the failure happened in, when applicable
    pub phase: Option<String>,
    /// Additional diagnostic fields (logged, not rendered)
    pub details: Value,
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Attach the fixed end-user headline
    #[must_use]
    pub fn with_headline(mut self, headline: impl Into<String>) -> Self {
        self.context.headline = Some(headline.into());
        self
    }

    /// Attach the generation phase
    #[must_use]
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.context.phase = Some(phase.into());
        self
    }

    /// Add diagnostic details to the error context
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Whether the caller could have avoided this error by fixing its input
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        self.code.is_validation()
    }

    /// Invalid input (`ValidationError`)
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field (`ValidationError`)
    #[must_use]
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
    }

    /// Equipment filter produced an empty candidate catalog
    #[must_use]
    pub fn no_exercises_available(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoExercisesAvailable, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Resource busy with an in-flight call
    #[must_use]
    pub fn locked(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceLocked, message)
    }

    /// External service error (`ServiceCallError`)
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Response received but unusable (`ResponseShapeError`)
    #[must_use]
    pub fn response_shape(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResponseShape, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

/// HTTP error body, shaped as `{ error, details, code, phase? }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Fixed human-readable message
    pub error: String,
    /// Message forwarded from the underlying failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Generation phase, when the failure came from program generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        if error.is_validation() {
            return Self {
                error: error.message.clone(),
                details: None,
                code: error.code,
                phase: None,
            };
        }
        Self {
            error: error
                .context
                .headline
                .clone()
                .unwrap_or_else(|| error.code.description().to_owned()),
            details: Some(error.message.clone()),
            code: error.code,
            phase: error.context.phase.clone(),
        }
    }
}
