// ABOUTME: Main library entry point for the SoulFit posture and Pilates program wizard
// ABOUTME: Wires configuration, logging, the LLM provider layer, service clients, wizard store and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

#![deny(unsafe_code)]

//! # SoulFit Server
//!
//! A six-step wizard that collects posture photos, a body-composition
//! report and a goals questionnaire, sends them to a vision-capable
//! language model, and turns the replies into a reasoned Pilates program.
//!
//! ## Architecture
//!
//! - **LLM**: provider trait and the `OpenAI`-compatible client
//! - **Services**: posture analysis, report extraction and program
//!   generation, each validating its inputs before any call
//! - **Wizard**: state store with a pure reducer, the flow that drives the
//!   services, and the in-memory session map
//! - **Routes**: the axum HTTP surface
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use soulfit_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("SoulFit configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// Service names, environment keys, defaults and fixed messages
pub mod constants;

/// Error taxonomy re-exported from the core crate
pub mod errors;

/// LLM provider abstraction and prompts
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Shared resources for route handlers
pub mod resources;

/// HTTP routes
pub mod routes;

/// Service clients for each wizard step
pub mod services;

/// Wizard state store, flow and sessions
pub mod wizard;

/// Domain model
pub use soulfit_core::models;
