// ABOUTME: Posture submission aggregate with the four captured views
// ABOUTME: Holds the uploaded images plus the analysis text and recommendations once processed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UploadedImage;
use crate::constants::posture::IMAGE_FIELD_SUFFIX;

/// Logical role of a posture photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostureView {
    /// Standing, facing the camera
    Front,
    /// Standing, back to the camera
    Back,
    /// Standing, side-on
    Side,
    /// Forward bend
    BendDown,
}

impl PostureView {
    /// Every view, in capture order
    pub const ALL: [Self; 4] = [Self::Front, Self::Back, Self::Side, Self::BendDown];

    /// Wire name of the view
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Side => "side",
            Self::BendDown => "bendDown",
        }
    }

    /// Multipart field name carrying this view (`frontImage`, ...)
    #[must_use]
    pub fn form_field(&self) -> String {
        format!("{}{IMAGE_FIELD_SUFFIX}", self.as_str())
    }

    /// Resolve a multipart field name such as `bendDownImage`
    #[must_use]
    pub fn from_form_field(field: &str) -> Option<Self> {
        let role = field.strip_suffix(IMAGE_FIELD_SUFFIX)?;
        Self::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(role))
    }
}

impl fmt::Display for PostureView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Photos and analysis collected in the posture capture step
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureSubmission {
    /// Submission identifier (empty until first update)
    pub id: String,
    /// Front view photo
    pub front_image: Option<UploadedImage>,
    /// Back view photo
    pub back_image: Option<UploadedImage>,
    /// Side view photo
    pub side_image: Option<UploadedImage>,
    /// Forward-bend photo
    pub bend_down_image: Option<UploadedImage>,
    /// Rendered analysis text, set once analysis succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    /// Ordered recommendations derived from the analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

impl PostureSubmission {
    /// Image slot for a view
    #[must_use]
    pub fn image(&self, view: PostureView) -> Option<&UploadedImage> {
        match view {
            PostureView::Front => self.front_image.as_ref(),
            PostureView::Back => self.back_image.as_ref(),
            PostureView::Side => self.side_image.as_ref(),
            PostureView::BendDown => self.bend_down_image.as_ref(),
        }
    }

    /// Mutable image slot for a view
    pub fn image_slot_mut(&mut self, view: PostureView) -> &mut Option<UploadedImage> {
        match view {
            PostureView::Front => &mut self.front_image,
            PostureView::Back => &mut self.back_image,
            PostureView::Side => &mut self.side_image,
            PostureView::BendDown => &mut self.bend_down_image,
        }
    }

    /// Views that currently hold a photo, in capture order
    #[must_use]
    pub fn provided_images(&self) -> Vec<(PostureView, &UploadedImage)> {
        PostureView::ALL
            .into_iter()
            .filter_map(|view| self.image(view).map(|image| (view, image)))
            .collect()
    }

    /// Whether an analysis has been stored
    #[must_use]
    pub fn is_analyzed(&self) -> bool {
        self.analysis
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }
}
