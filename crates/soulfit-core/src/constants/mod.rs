// ABOUTME: Shared constants for wizard step bounds and generated program metadata
// ABOUTME: Kept in the core crate so the store, clients and routes agree on them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

/// Wizard step numbering
pub mod wizard {
    /// First step (posture capture)
    pub const MIN_STEP: u8 = 1;
    /// Terminal step (program view)
    pub const MAX_STEP: u8 = 6;
    /// Total number of steps
    pub const TOTAL_STEPS: u8 = MAX_STEP;
}

/// Generated program metadata
pub mod program {
    /// Prefix for program identifiers minted when the model omits one
    pub const ID_PREFIX: &str = "program_";
    /// Equipment label used when an exercise lists none
    pub const DEFAULT_EQUIPMENT_LABEL: &str = "Mat";
    /// Equipment label for exercises whose identifier could not be resolved
    pub const UNKNOWN_EQUIPMENT_LABEL: &str = "Unknown";
    /// Equipment tag that marks an exercise as loaded
    pub const WEIGHTS_TAG: &str = "weights";
}

/// Posture capture
pub mod posture {
    /// Number of posture views required before analysis
    pub const REQUIRED_VIEWS: usize = 4;
    /// Multipart field suffix identifying an image part
    pub const IMAGE_FIELD_SUFFIX: &str = "Image";
}
