// ABOUTME: HTTP middleware for request correlation and cross-origin access
// ABOUTME: Provides request ID generation with span creation and the CORS layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

/// CORS configuration
pub mod cors;
/// Request ID propagation
pub mod request_id;

pub use cors::setup_cors;
pub use request_id::{request_id_middleware, RequestId};
