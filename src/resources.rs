// ABOUTME: Shared resource container handed to every route
// ABOUTME: Holds configuration, the wizard flow with its service clients and the session map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! # Server Resources
//!
//! Built once at startup and shared behind an `Arc`. Tests build it with
//! [`ServerResources::with_provider`] and a scripted provider.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::{LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::wizard::{WizardFlow, WizardSessions};

/// Resources shared by all handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Configuration read at startup
    pub config: Arc<ServerConfig>,
    /// Provider behind every service client
    pub provider: Arc<dyn LlmProvider>,
    /// Service clients
    pub flow: WizardFlow,
    /// Live wizard sessions
    pub sessions: WizardSessions,
}

impl ServerResources {
    /// Resources backed by the configured `OpenAI`-compatible endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::openai(
            &config.llm.api_key,
            &config.llm.base_url,
            &config.llm.model,
        ))?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Resources backed by an explicit provider
    #[must_use]
    pub fn with_provider(config: ServerConfig, provider: Arc<dyn LlmProvider>) -> Self {
        let flow = WizardFlow::from_provider(&provider, config.generation.clone());
        let sessions = WizardSessions::new(config.sessions.idle_timeout);
        Self {
            config: Arc::new(config),
            provider,
            flow,
            sessions,
        }
    }
}
