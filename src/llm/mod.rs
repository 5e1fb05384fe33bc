// ABOUTME: Remote inference abstraction used by the food analysis and coaching services
// ABOUTME: Defines the request shape, the image payload, and the async client contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Remote Inference
//!
//! Every model interaction in Meal Lens is a single prompt, optionally with
//! one image, answered by a single block of text. [`InferenceClient`] is the
//! seam between the services and the HTTP client so tests can script model
//! output without a network.
//!
//! ## Example
//!
//! ```rust,no_run
//! use meal_lens::llm::{InferenceClient, InferenceRequest};
//! use meal_lens::errors::AppError;
//!
//! async fn example(client: &dyn InferenceClient) -> Result<String, AppError> {
//!     let request = InferenceRequest::text("Say hello", "my-key", "gemini-2.5-pro");
//!     client.generate_content(&request).await
//! }
//! ```

mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;

use crate::constants::inference::DEFAULT_IMAGE_MIME;
use crate::errors::AppResult;

/// An image attached to a prompt
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// MIME type sent alongside the base64 data
    pub mime_type: &'static str,
}

impl ImagePayload {
    /// Wrap image bytes, detecting the MIME type from magic bytes.
    ///
    /// Unknown formats are sent as JPEG, which is what camera captures are.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime_type = sniff_mime_type(&bytes);
        Self { bytes, mime_type }
    }
}

impl Debug for ImagePayload {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ImagePayload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else {
        DEFAULT_IMAGE_MIME
    }
}

/// One prompt sent to the remote model
#[derive(Clone)]
pub struct InferenceRequest {
    /// Prompt text
    pub prompt: String,
    /// Optional image, sent before the prompt text
    pub image: Option<ImagePayload>,
    /// API key for this call
    pub api_key: String,
    /// Model identifier
    pub model: String,
}

impl InferenceRequest {
    /// Text-only request
    #[must_use]
    pub fn text(
        prompt: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Attach an image
    #[must_use]
    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    /// Whether an image is attached
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

impl Debug for InferenceRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InferenceRequest")
            .field("model", &self.model)
            .field("prompt_len", &self.prompt.len())
            .field("image", &self.image)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Remote model client contract
///
/// Implementations make exactly one attempt per call and return the model's
/// text with transport envelopes and code fences already removed.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send one prompt and return the model's text
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_MISSING` for a blank API key, an external-service
    /// error code for non-2xx responses, and `EXTERNAL_SERVICE_UNAVAILABLE`
    /// for transport failures and timeouts.
    async fn generate_content(&self, request: &InferenceRequest) -> AppResult<String>;
}
