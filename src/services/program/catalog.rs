// ABOUTME: Built-in Pilates exercise catalog used by single-call generation
// ABOUTME: Filters exercises by selected apparatus and resolves model-chosen identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use serde::Serialize;
use soulfit_core::models::{Difficulty, Equipment};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExercise {
    /// Stable identifier the model must echo back
    pub id: String,
    /// Display name
    pub name: String,
    /// Apparatus the exercise needs
    pub equipment: Equipment,
    /// Typical difficulty
    pub difficulty: Difficulty,
    /// Body areas the exercise works
    pub focus: Vec<String>,
}

type Row = (
    &'static str,
    &'static str,
    Equipment,
    Difficulty,
    &'static [&'static str],
);

const BUILTIN: &[Row] = &[
    // Mat
    ("mat-breathing", "Pilates Breathing", Equipment::Mat, Difficulty::Easy, &["core", "ribcage"]),
    ("mat-pelvic-curl", "Pelvic Curl", Equipment::Mat, Difficulty::Easy, &["spine", "glutes", "pelvis"]),
    ("mat-chest-lift", "Chest Lift", Equipment::Mat, Difficulty::Easy, &["core", "neck"]),
    ("mat-hundred", "The Hundred", Equipment::Mat, Difficulty::Medium, &["core", "endurance"]),
    ("mat-roll-up", "Roll Up", Equipment::Mat, Difficulty::Medium, &["spine", "core", "hamstrings"]),
    ("mat-single-leg-circle", "Single Leg Circle", Equipment::Mat, Difficulty::Easy, &["hips", "core"]),
    ("mat-single-leg-stretch", "Single Leg Stretch", Equipment::Mat, Difficulty::Medium, &["core", "coordination"]),
    ("mat-spine-stretch-forward", "Spine Stretch Forward", Equipment::Mat, Difficulty::Easy, &["spine", "hamstrings"]),
    ("mat-swan-prep", "Swan Prep", Equipment::Mat, Difficulty::Easy, &["upper back", "posture"]),
    ("mat-side-kick", "Side Kick Series", Equipment::Mat, Difficulty::Medium, &["hips", "glutes"]),
    ("mat-swimming", "Swimming", Equipment::Mat, Difficulty::Medium, &["back extensors", "glutes"]),
    ("mat-cat-cow", "Cat Cow", Equipment::Mat, Difficulty::Easy, &["spine", "mobility"]),
    ("mat-childs-pose", "Child's Pose", Equipment::Mat, Difficulty::Easy, &["lower back", "relaxation"]),
    ("mat-saw", "Saw", Equipment::Mat, Difficulty::Medium, &["spine rotation", "hamstrings"]),
    ("mat-teaser", "Teaser", Equipment::Mat, Difficulty::Hard, &["core", "balance"]),
    // Reformer
    ("reformer-footwork", "Footwork", Equipment::Reformer, Difficulty::Easy, &["legs", "alignment"]),
    ("reformer-bridging", "Bridging", Equipment::Reformer, Difficulty::Easy, &["glutes", "hamstrings", "spine"]),
    ("reformer-leg-circles", "Leg Circles in Straps", Equipment::Reformer, Difficulty::Easy, &["hips", "core"]),
    ("reformer-rowing-back", "Rowing Back", Equipment::Reformer, Difficulty::Medium, &["upper back", "shoulders"]),
    ("reformer-chest-expansion", "Chest Expansion", Equipment::Reformer, Difficulty::Medium, &["upper back", "posture"]),
    ("reformer-elephant", "Elephant", Equipment::Reformer, Difficulty::Medium, &["hamstrings", "core"]),
    ("reformer-knee-stretches", "Knee Stretches", Equipment::Reformer, Difficulty::Medium, &["core", "hips"]),
    ("reformer-long-stretch", "Long Stretch", Equipment::Reformer, Difficulty::Hard, &["shoulders", "core"]),
    ("reformer-mermaid", "Mermaid", Equipment::Reformer, Difficulty::Easy, &["lateral flexion", "ribcage"]),
    ("reformer-swan", "Swan on the Box", Equipment::Reformer, Difficulty::Medium, &["back extensors", "posture"]),
    // Ladder barrel / spine corrector
    ("barrel-swan", "Swan on the Barrel", Equipment::LadderBarrel, Difficulty::Medium, &["back extensors", "chest"]),
    ("barrel-side-stretch", "Side Stretch", Equipment::LadderBarrel, Difficulty::Easy, &["lateral flexion", "obliques"]),
    ("barrel-spine-corrector-chest-opener", "Chest Opener on Spine Corrector", Equipment::LadderBarrel, Difficulty::Easy, &["chest", "thoracic spine"]),
    ("barrel-short-box-round-back", "Round Back", Equipment::LadderBarrel, Difficulty::Medium, &["core", "spine"]),
    ("barrel-leg-series", "Leg Series on Spine Corrector", Equipment::LadderBarrel, Difficulty::Medium, &["hips", "hamstrings"]),
    // Cadillac
    ("cadillac-roll-down-bar", "Roll Down with Push-Through Bar", Equipment::Cadillac, Difficulty::Easy, &["spine", "core"]),
    ("cadillac-leg-springs", "Leg Springs", Equipment::Cadillac, Difficulty::Easy, &["hips", "hamstrings"]),
    ("cadillac-arm-springs", "Arm Springs", Equipment::Cadillac, Difficulty::Easy, &["shoulders", "arms"]),
    ("cadillac-cat-stretch", "Cat Stretch", Equipment::Cadillac, Difficulty::Medium, &["spine", "shoulders"]),
    ("cadillac-tower", "Tower", Equipment::Cadillac, Difficulty::Hard, &["spine", "hamstrings"]),
    // Chair
    ("chair-footwork", "Footwork on the Chair", Equipment::Chair, Difficulty::Medium, &["legs", "alignment"]),
    ("chair-pike", "Pike", Equipment::Chair, Difficulty::Hard, &["core", "shoulders"]),
    ("chair-standing-leg-press", "Standing Leg Press", Equipment::Chair, Difficulty::Medium, &["glutes", "balance"]),
    ("chair-seated-mermaid", "Seated Mermaid", Equipment::Chair, Difficulty::Easy, &["lateral flexion", "ribcage"]),
    ("chair-triceps-press", "Triceps Press", Equipment::Chair, Difficulty::Medium, &["arms", "shoulders"]),
    // Arm chair
    ("armchair-boxing", "Boxing", Equipment::ArmChair, Difficulty::Easy, &["arms", "upper back"]),
    ("armchair-hug", "Hug a Tree", Equipment::ArmChair, Difficulty::Easy, &["chest", "shoulders"]),
    ("armchair-biceps-curl", "Biceps Curl", Equipment::ArmChair, Difficulty::Easy, &["arms"]),
    ("armchair-rowing", "Rowing", Equipment::ArmChair, Difficulty::Medium, &["upper back", "posture"]),
];

/// Lowercase alphanumerics only
fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Set of exercises the model may choose from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExerciseCatalog {
    entries: Vec<CatalogExercise>,
}

impl ExerciseCatalog {
    /// Catalog from explicit entries
    #[must_use]
    pub const fn new(entries: Vec<CatalogExercise>) -> Self {
        Self { entries }
    }

    /// Catalog shipped with the server
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(id, name, equipment, difficulty, focus)| CatalogExercise {
                    id: (*id).to_owned(),
                    name: (*name).to_owned(),
                    equipment: *equipment,
                    difficulty: *difficulty,
                    focus: focus.iter().map(|f| (*f).to_owned()).collect(),
                })
                .collect(),
        )
    }

    /// Entries in catalog order
    #[must_use]
    pub fn entries(&self) -> &[CatalogExercise] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries usable with the selected apparatus; an empty selection keeps everything
    #[must_use]
    pub fn filter_by_equipment(&self, selected: &[Equipment]) -> Self {
        if selected.is_empty() {
            return self.clone();
        }
        Self::new(
            self.entries
                .iter()
                .filter(|entry| selected.contains(&entry.equipment))
                .cloned()
                .collect(),
        )
    }

    /// Find the entry a model-supplied identifier refers to
    ///
    /// Tries an exact match on the normalized identifier, then on the
    /// normalized name, then prefix containment either way.
    #[must_use]
    pub fn resolve(&self, raw_id: &str) -> Option<&CatalogExercise> {
        let wanted = normalize(raw_id);
        if wanted.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|entry| normalize(&entry.id) == wanted)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|entry| normalize(&entry.name) == wanted)
            })
            .or_else(|| {
                self.entries.iter().find(|entry| {
                    let id = normalize(&entry.id);
                    id.starts_with(&wanted) || wanted.starts_with(&id)
                })
            })
    }

    /// Compact listing for the prompt, one entry per line
    #[must_use]
    pub fn prompt_listing(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "- {} | {} | {} | {} | {}",
                    entry.id,
                    entry.name,
                    entry.equipment,
                    entry.difficulty.as_str(),
                    entry.focus.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Identifiers in catalog order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }
}
