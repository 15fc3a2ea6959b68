// ABOUTME: Core types for the SoulFit posture and Pilates program wizard
// ABOUTME: Foundation crate with error taxonomy, domain model, and shared constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

#![deny(unsafe_code)]

//! # `SoulFit` Core
//!
//! Foundation crate shared by the wizard server and its tests. It is kept
//! free of I/O so the domain model and the error taxonomy change rarely.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the HTTP error body
//! - **models**: posture submission, health assessment, goals, equipment, programs
//! - **constants**: wizard step bounds and program identifiers

/// Unified error handling with validation, service-call and response-shape codes
pub mod errors;

/// Domain model for the wizard aggregates
pub mod models;

/// Shared constants for wizard steps and generated programs
pub mod constants;
