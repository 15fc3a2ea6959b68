// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the scripted LLM provider, test configuration and Axum request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod axum_test;
pub mod scripted_llm;
pub mod test_utils;
