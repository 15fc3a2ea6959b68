// ABOUTME: Fixed Pilates equipment catalog used for selection and exercise filtering
// ABOUTME: Identifiers match the labels shown to users and sent to the generation service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pilates apparatus a user can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Equipment {
    /// Floor mat
    Mat,
    /// Reformer
    Reformer,
    /// Ladder barrel and spine corrector
    #[serde(rename = "Ladder barrel, corrector spine")]
    LadderBarrel,
    /// Cadillac / trapeze table
    Cadillac,
    /// Wunda chair
    Chair,
    /// Arm chair
    #[serde(rename = "Arm Chair")]
    ArmChair,
}

impl Equipment {
    /// Catalog order
    pub const ALL: [Self; 6] = [
        Self::Mat,
        Self::Reformer,
        Self::LadderBarrel,
        Self::Cadillac,
        Self::Chair,
        Self::ArmChair,
    ];

    /// Identifier string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mat => "Mat",
            Self::Reformer => "Reformer",
            Self::LadderBarrel => "Ladder barrel, corrector spine",
            Self::Cadillac => "Cadillac",
            Self::Chair => "Chair",
            Self::ArmChair => "Arm Chair",
        }
    }

    /// Short description for selection screens
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Mat => "Suitable for beginners, no special apparatus needed",
            Self::Reformer => "Core Pilates machine providing resistance and assistance",
            Self::LadderBarrel => "Builds spinal flexibility and strength",
            Self::Cadillac => "Versatile apparatus for rehabilitation and advanced work",
            Self::Chair => "Emphasises strength and balance",
            Self::ArmChair => "Targets arms and upper body",
        }
    }

    /// Resolve an identifier, ignoring case and surrounding whitespace
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|equipment| equipment.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drop repeated entries, keeping the first occurrence of each
#[must_use]
pub fn dedup_preserving_order(items: Vec<Equipment>) -> Vec<Equipment> {
    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
