// ABOUTME: Environment-based configuration for the wizard server
// ABOUTME: Reads the LLM credential, listener, CORS and program-generation settings once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! Environment-based configuration management for production deployment

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::constants::{defaults, env_keys};

/// How a program is produced from the collected wizard data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStrategy {
    /// Movement analysis first, then a program with inline exercises
    #[default]
    TwoPhase,
    /// One call choosing exercises from the built-in catalog by identifier
    SingleCall,
}

impl GenerationStrategy {
    /// Configuration spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TwoPhase => "two_phase",
            Self::SingleCall => "single_phase",
        }
    }
}

impl FromStr for GenerationStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "two_phase" | "twophase" => Ok(Self::TwoPhase),
            "single_phase" | "single_call" | "single" => Ok(Self::SingleCall),
            other => bail!("unknown generation strategy '{other}'"),
        }
    }
}

impl fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when the model names an exercise missing from the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedExercisePolicy {
    /// Keep the entry with the raw identifier as name and unknown equipment
    #[default]
    Placeholder,
    /// Fail the whole generation
    Reject,
}

impl UnresolvedExercisePolicy {
    /// Configuration spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for UnresolvedExercisePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "reject" => Ok(Self::Reject),
            other => bail!("unknown unresolved-exercise policy '{other}'"),
        }
    }
}

impl fmt::Display for UnresolvedExercisePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for the OpenAI-compatible LLM endpoint
#[derive(Clone)]
pub struct LlmConfig {
    /// API key, never logged
    pub api_key: String,
    /// Base URL including the version prefix
    pub base_url: String,
    /// Model used for every call
    pub model: String,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins, `*` for any
    pub allowed_origins: Vec<String>,
}

/// Program generation behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Selected strategy
    pub strategy: GenerationStrategy,
    /// Whether generation refuses an empty equipment selection
    pub require_equipment: bool,
    /// Handling of catalog identifiers that do not resolve
    pub unresolved_exercises: UnresolvedExercisePolicy,
    /// Pause between the two phases
    pub phase_delay: Duration,
    /// Language every reply must be written in
    pub response_language: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            strategy: GenerationStrategy::default(),
            require_equipment: true,
            unresolved_exercises: UnresolvedExercisePolicy::default(),
            phase_delay: Duration::ZERO,
            response_language: defaults::RESPONSE_LANGUAGE.to_owned(),
        }
    }
}

/// Wizard session lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Time without access after which a session is dropped
    pub idle_timeout: Duration,
    /// Period of the background sweep
    pub sweep_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(defaults::SESSION_IDLE_TIMEOUT_SECS),
            sweep_interval: Duration::from_secs(defaults::SESSION_SWEEP_INTERVAL_SECS),
        }
    }
}

/// Main server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listener port
    pub http_port: u16,
    /// HTTP listener address
    pub host: String,
    /// LLM endpoint and credential
    pub llm: LlmConfig,
    /// CORS policy
    pub cors: CorsConfig,
    /// Program generation settings
    pub generation: GenerationConfig,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
    /// Wizard session lifetime
    pub sessions: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is missing or a value fails to parse
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let api_key = env::var(env_keys::OPENAI_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| format!("{} must be set", env_keys::OPENAI_API_KEY))?;

        let config = Self {
            http_port: env_var_or(env_keys::HTTP_PORT, &defaults::HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            host: env_var_or(env_keys::HOST, defaults::HOST),
            llm: LlmConfig {
                api_key,
                base_url: env_var_or(env_keys::LLM_BASE_URL, defaults::LLM_BASE_URL)
                    .trim_end_matches('/')
                    .to_owned(),
                model: env_var_or(env_keys::LLM_MODEL, defaults::LLM_MODEL),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or(
                    env_keys::CORS_ALLOWED_ORIGINS,
                    defaults::CORS_ALLOWED_ORIGINS,
                )),
            },
            generation: GenerationConfig {
                strategy: env_var_or(env_keys::GENERATION_STRATEGY, "two_phase")
                    .parse()
                    .context("Invalid SOULFIT_GENERATION_STRATEGY value")?,
                require_equipment: env_var_or(env_keys::REQUIRE_EQUIPMENT, "true")
                    .parse()
                    .context("Invalid SOULFIT_REQUIRE_EQUIPMENT value")?,
                unresolved_exercises: env_var_or(env_keys::UNRESOLVED_EXERCISES, "placeholder")
                    .parse()
                    .context("Invalid SOULFIT_UNRESOLVED_EXERCISES value")?,
                phase_delay: Duration::from_millis(
                    env_var_or(env_keys::PHASE_DELAY_MS, "0")
                        .parse()
                        .context("Invalid SOULFIT_PHASE_DELAY_MS value")?,
                ),
                response_language: env_var_or(
                    env_keys::RESPONSE_LANGUAGE,
                    defaults::RESPONSE_LANGUAGE,
                ),
            },
            max_upload_bytes: env_var_or(
                env_keys::MAX_UPLOAD_BYTES,
                &defaults::MAX_UPLOAD_BYTES.to_string(),
            )
            .parse()
            .context("Invalid SOULFIT_MAX_UPLOAD_BYTES value")?,
            sessions: SessionConfig {
                idle_timeout: Duration::from_secs(
                    env_var_or(
                        env_keys::SESSION_IDLE_TIMEOUT_SECS,
                        &defaults::SESSION_IDLE_TIMEOUT_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid SOULFIT_SESSION_IDLE_TIMEOUT_SECS value")?,
                ),
                sweep_interval: Duration::from_secs(
                    env_var_or(
                        env_keys::SESSION_SWEEP_INTERVAL_SECS,
                        &defaults::SESSION_SWEEP_INTERVAL_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid SOULFIT_SESSION_SWEEP_INTERVAL_SECS value")?,
                ),
            },
        };

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "SoulFit Server Configuration:\n\
             - Listener: {}:{}\n\
             - LLM Endpoint: {}\n\
             - LLM Model: {}\n\
             - Generation Strategy: {}\n\
             - Require Equipment: {}\n\
             - Unresolved Exercises: {}\n\
             - Phase Delay: {}ms\n\
             - Response Language: {}\n\
             - CORS Origins: {}\n\
             - Max Upload: {} bytes\n\
             - Session Idle Timeout: {}s",
            self.host,
            self.http_port,
            self.llm.base_url,
            self.llm.model,
            self.generation.strategy,
            self.generation.require_equipment,
            self.generation.unresolved_exercises,
            self.generation.phase_delay.as_millis(),
            self.generation.response_language,
            self.cors.allowed_origins.join(","),
            self.max_upload_bytes,
            self.sessions.idle_timeout.as_secs(),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://a.test, http://b.test ,"),
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_strategy_spellings() {
        assert_eq!(
            "two_phase".parse::<GenerationStrategy>().unwrap(),
            GenerationStrategy::TwoPhase
        );
        assert_eq!(
            "single-phase".parse::<GenerationStrategy>().unwrap(),
            GenerationStrategy::SingleCall
        );
        assert!("three_phase".parse::<GenerationStrategy>().is_err());
    }

    #[test]
    fn test_policy_spellings() {
        assert_eq!(
            "Reject".parse::<UnresolvedExercisePolicy>().unwrap(),
            UnresolvedExercisePolicy::Reject
        );
        assert!("drop".parse::<UnresolvedExercisePolicy>().is_err());
    }

    #[test]
    fn test_llm_config_debug_redacts_key() {
        let config = LlmConfig {
            api_key: "sk-secret".to_owned(),
            base_url: defaults::LLM_BASE_URL.to_owned(),
            model: defaults::LLM_MODEL.to_owned(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
