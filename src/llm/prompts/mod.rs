// ABOUTME: System prompts for the posture, extraction and program generation calls
// ABOUTME: Loaded at compile time from markdown files next to this module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! # System Prompts
//!
//! Prompts are kept in markdown so they can be edited without touching the
//! request plumbing. User prompts that embed wizard data are assembled by
//! the service clients.

/// Posture assessment from the four photos
pub const POSTURE_ASSESSOR_PROMPT: &str = include_str!("posture_assessor.md");

/// Body-composition report reading
pub const REPORT_EXTRACTOR_PROMPT: &str = include_str!("report_extractor.md");

/// Phase one of two-phase generation
pub const MOVEMENT_ANALYST_PROMPT: &str = include_str!("movement_analyst.md");

/// Phase two of two-phase generation, and the generate-more request
pub const PROGRAM_DESIGNER_PROMPT: &str = include_str!("program_designer.md");

/// Single-call generation from the exercise catalog
pub const CATALOG_DESIGNER_PROMPT: &str = include_str!("catalog_designer.md");

/// Sentence appended to every user prompt to pin the reply language
#[must_use]
pub fn language_instruction(language: &str) -> String {
    format!(
        "Answer in {language} only, use English words only when transliterated or for specific names."
    )
}
