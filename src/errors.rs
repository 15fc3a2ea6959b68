// ABOUTME: Error types re-exported from soulfit-core
// ABOUTME: Keeps `crate::errors::AppError` paths stable across the server modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! # Unified Error Handling
//!
//! The taxonomy lives in `soulfit-core` so the domain model and the server
//! agree on codes. The `http-response` feature of that crate supplies the
//! axum `IntoResponse` implementation used by the routes.

pub use soulfit_core::errors::*;
