// ABOUTME: Uploaded image payloads carried by the wizard aggregates
// ABOUTME: Encodes images as data URLs for vision requests and serializes metadata only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Fallback MIME type when the upload did not declare one
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// An image received from the client, held in memory only
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// MIME type declared by the uploader
    pub content_type: String,
    /// Original file name, if the client sent one
    pub file_name: Option<String>,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Create an image from raw bytes
    #[must_use]
    pub fn new(content_type: Option<&str>, file_name: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type
                .filter(|ct| !ct.is_empty())
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_owned(),
            file_name: file_name.map(ToOwned::to_owned),
            bytes,
        }
    }

    /// Size of the payload in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode as `data:<mime>;base64,<payload>` for vision input
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("content_type", &self.content_type)
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl Serialize for UploadedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("UploadedImage", 3)?;
        state.serialize_field("contentType", &self.content_type)?;
        state.serialize_field("fileName", &self.file_name)?;
        state.serialize_field("size", &self.bytes.len())?;
        state.end()
    }
}
