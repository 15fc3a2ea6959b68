// ABOUTME: Multipart upload parsing for posture photos and report images
// ABOUTME: Collects image parts by form field name and ignores non-image text parts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use axum::extract::multipart::{Multipart, MultipartError};
use tracing::debug;

use crate::constants::{http::REPORT_IMAGE_FIELD, posture::IMAGE_FIELD_SUFFIX};
use crate::errors::{AppError, AppResult};
use soulfit_core::models::{PostureView, UploadedImage};

/// One uploaded file part
#[derive(Debug)]
pub struct ImagePart {
    /// Form field name
    pub field: String,
    /// Decoded file
    pub image: UploadedImage,
}

fn multipart_error(error: &MultipartError) -> AppError {
    AppError::invalid_input(format!("Invalid multipart body: {error}"))
}

/// Read every part whose field name ends in `Image`
///
/// # Errors
///
/// Returns a validation error when the body is not valid multipart
pub async fn read_image_parts(mut multipart: Multipart) -> AppResult<Vec<ImagePart>> {
    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if !name.ends_with(IMAGE_FIELD_SUFFIX) {
            debug!(field = %name, "Ignoring non-image form field");
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;
        if bytes.is_empty() {
            continue;
        }
        parts.push(ImagePart {
            field: name,
            image: UploadedImage::new(content_type.as_deref(), file_name.as_deref(), bytes.to_vec()),
        });
    }
    Ok(parts)
}

/// Posture photos keyed by view
///
/// # Errors
///
/// Returns a validation error for an image field that names no known view
pub fn posture_views(parts: Vec<ImagePart>) -> AppResult<Vec<(PostureView, UploadedImage)>> {
    parts
        .into_iter()
        .map(|part| {
            PostureView::from_form_field(&part.field)
                .map(|view| (view, part.image))
                .ok_or_else(|| {
                    AppError::invalid_input(format!("Unknown posture image field '{}'", part.field))
                })
        })
        .collect()
}

/// The report photo, if one was uploaded
#[must_use]
pub fn report_image(parts: Vec<ImagePart>) -> Option<UploadedImage> {
    parts
        .into_iter()
        .find(|part| part.field == REPORT_IMAGE_FIELD)
        .map(|part| part.image)
}
