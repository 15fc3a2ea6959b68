// ABOUTME: LLM provider abstraction used by the posture, extraction and generation clients
// ABOUTME: Defines the provider contract, vision-capable messages and strict JSON-schema requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! # LLM Provider Interface
//!
//! Every external analysis in `SoulFit` is a single chat completion against
//! an OpenAI-compatible endpoint. This module defines the contract the
//! service clients depend on, so tests can substitute a scripted provider.
//!
//! ## Key Concepts
//!
//! - **`LlmCapabilities`**: bitflags describing provider features (vision, JSON mode)
//! - **`LlmProvider`**: async trait for one-shot chat completion
//! - **`ChatMessage`**: role-based message, optionally carrying images
//! - **`ResponseFormat`**: strict JSON schema the reply must follow
//!
//! ## Example
//!
//! ```rust,no_run
//! use soulfit_server::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![ChatMessage::user("Describe a safe warm-up")])
//!         .with_max_tokens(500);
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod openai_compatible;
pub mod prompts;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use soulfit_core::models::UploadedImage;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// LLM provider capability flags
    ///
    /// The posture and extraction clients refuse providers without `VISION`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider accepts image input
        const VISION = 0b0000_0001;
        /// Provider honours strict JSON-schema response formats
        const JSON_MODE = 0b0000_0010;
        /// Provider supports system messages
        const SYSTEM_MESSAGES = 0b0000_0100;
    }
}

impl LlmCapabilities {
    /// Capabilities of a text-only provider
    #[must_use]
    pub const fn text_only() -> Self {
        Self::SYSTEM_MESSAGES
    }

    /// Capabilities of a vision model with structured output
    #[must_use]
    pub const fn full_featured() -> Self {
        Self::VISION
            .union(Self::JSON_MODE)
            .union(Self::SYSTEM_MESSAGES)
    }

    /// Check if vision is supported
    #[must_use]
    pub const fn supports_vision(&self) -> bool {
        self.contains(Self::VISION)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content of the message
    pub content: String,
    /// Images attached to the message as `data:` URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            images: Vec::new(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create a user message carrying images
    #[must_use]
    pub fn user_with_images<'a>(
        content: impl Into<String>,
        images: impl IntoIterator<Item = &'a UploadedImage>,
    ) -> Self {
        Self {
            images: images.into_iter().map(UploadedImage::to_data_url).collect(),
            ..Self::user(content)
        }
    }

    /// Whether the message carries images
    #[must_use]
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Strict JSON schema the reply must conform to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Schema name reported to the provider
    pub name: String,
    /// JSON schema document
    pub schema: Value,
    /// Whether the provider must follow the schema exactly
    pub strict: bool,
}

impl ResponseFormat {
    /// Strict schema with the given name
    #[must_use]
    pub fn strict(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
            strict: true,
        }
    }
}

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Maximum completion tokens to generate
    pub max_tokens: Option<u32>,
    /// Structured output contract
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            max_tokens: None,
            response_format: None,
        }
    }

    /// Set the maximum completion tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Require a strict JSON-schema reply
    #[must_use]
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Total number of images across all messages
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.messages.iter().map(|m| m.images.len()).sum()
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated message content, empty when the model returned none
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (stop, length, etc.)
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
///
/// Implementations must be cheap to share behind an `Arc`; the service
/// clients hold one and issue a single request per operation.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "openai")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;

    /// Check if the provider is reachable and the credential is accepted
    async fn health_check(&self) -> Result<bool, AppError>;
}

/// Ensure a provider can read images before a vision call
///
/// # Errors
///
/// Returns a configuration error when the provider lacks `VISION`.
pub fn require_vision(provider: &dyn LlmProvider, operation: &str) -> Result<(), AppError> {
    if provider.capabilities().supports_vision() {
        Ok(())
    } else {
        Err(AppError::config(format!(
            "{operation} needs a vision-capable model but {} does not accept images",
            provider.display_name()
        )))
    }
}
