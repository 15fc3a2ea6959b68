// ABOUTME: Configuration module for the wizard server
// ABOUTME: Exposes the environment loader and the program-generation settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! Configuration module for the `SoulFit` server
//!
//! All settings come from environment variables read once at process
//! start. Nothing is persisted.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    CorsConfig, GenerationConfig, GenerationStrategy, LlmConfig, ServerConfig,
    SessionConfig, UnresolvedExercisePolicy,
};
