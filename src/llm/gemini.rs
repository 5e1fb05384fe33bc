// ABOUTME: Google Gemini client for single-shot multimodal generateContent calls
// ABOUTME: Sends prompt plus optional inline image and extracts the model's text reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Gemini Client
//!
//! Implementation of [`InferenceClient`] for the Generative Language API.
//! One POST per call, no retries; the HTTP status decides success. The API
//! key travels as the percent-encoded `key` query parameter.
//!
//! The reply text is taken from the first text part of the first candidate.
//! When the envelope does not decode, the first `"text": "..."` field in the
//! raw body is used instead, with common escapes undone. Markdown code
//! fences are stripped in both cases.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::LazyLock;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use meal_lens_intelligence::text::strip_code_fences;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{InferenceClient, InferenceRequest};
use crate::config::GeminiConfig;
use crate::errors::{AppError, AppResult, ErrorCode};

const SERVICE: &str = "Gemini";

/// First `"text": "..."` value in a raw body, escapes included
static RAW_TEXT_FIELD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""text"\s*:\s*"((?:[^"\\]|\\.)*)""#).ok());

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        inline_data: InlineData,
    },
    /// Anything else the model returns (thoughts, function calls)
    Other(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<GeminiError>,
}

// ============================================================================
// Client Implementation
// ============================================================================

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    api_base: String,
}

impl GeminiClient {
    /// Build a client with the configured endpoint and timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &GeminiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_owned(),
        })
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.api_base)
    }

    fn build_request(request: &InferenceRequest) -> GeminiRequest {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = &request.image {
            parts.push(ContentPart::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.to_owned(),
                    data: STANDARD.encode(&image.bytes),
                },
            });
        }
        parts.push(ContentPart::Text {
            text: request.prompt.clone(),
        });

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts,
            }],
        }
    }

    /// Pull the reply text out of a 2xx body
    fn extract_text(body: &str) -> AppResult<String> {
        if let Ok(response) = serde_json::from_str::<GeminiResponse>(body) {
            if let Some(err) = response.error {
                return Err(AppError::external_service(SERVICE, err.message));
            }
            let text = response
                .candidates
                .as_ref()
                .and_then(|candidates| candidates.first())
                .and_then(|candidate| candidate.content.as_ref())
                .and_then(|content| {
                    content.parts.iter().find_map(|part| match part {
                        ContentPart::Text { text } => Some(text.as_str()),
                        ContentPart::InlineData { .. } | ContentPart::Other(_) => None,
                    })
                });
            if let Some(text) = text {
                return Ok(strip_code_fences(text).to_owned());
            }
        }

        warn!("Gemini envelope had no text part, scanning raw body");
        let raw = RAW_TEXT_FIELD
            .as_ref()
            .and_then(|re| re.captures(body))
            .and_then(|caps| caps.get(1))
            .map(|m| unescape(m.as_str()))
            .ok_or_else(|| AppError::external_service(SERVICE, "No text in Gemini response"))?;
        Ok(strip_code_fences(&raw).to_owned())
    }

    /// Map API error status to an error code
    ///
    /// 429 carries a user-facing quota message; 401/403 are auth failures.
    fn map_api_error(status: StatusCode, response_text: &str) -> AppError {
        let message = serde_json::from_str::<ErrorEnvelope>(response_text)
            .ok()
            .and_then(|envelope| envelope.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        match status {
            StatusCode::TOO_MANY_REQUESTS => AppError::new(
                ErrorCode::ExternalRateLimited,
                Self::extract_quota_message(&message),
            ),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("Gemini rejected the API key ({status}): {message}"),
            ),
            _ => AppError::external_service(
                SERVICE,
                format!("API error ({}): {message}", status.as_u16()),
            ),
        }
    }

    /// Extract a user-friendly quota message from a Gemini error
    fn extract_quota_message(message: &str) -> String {
        // "Please retry in 6.406453963s."
        let seconds = message
            .split_once("Please retry in ")
            .and_then(|(_, rest)| rest.split_once('s'))
            .and_then(|(value, _)| value.trim().parse::<f64>().ok());

        match seconds {
            Some(seconds) => {
                let seconds = seconds.ceil() as u64;
                format!("AI service quota exceeded. Please try again in {seconds} seconds.")
            }
            None => "AI service quota exceeded. Please wait a moment and try again.".to_owned(),
        }
    }
}

/// Undo the escapes the model's JSON text commonly carries
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => {}
            Some(other @ ('"' | '\\' | '/')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[async_trait]
impl InferenceClient for GeminiClient {
    #[instrument(skip(self, request), fields(model = %request.model, image = request.has_image()))]
    async fn generate_content(&self, request: &InferenceRequest) -> AppResult<String> {
        if request.api_key.trim().is_empty() {
            return Err(AppError::config_missing("API key is not configured"));
        }

        let url = self.build_url(&request.model);
        let body = Self::build_request(request);

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .query(&[("key", request.api_key.trim())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::external_unavailable(
                    SERVICE,
                    format!("HTTP request failed: {}", e.without_url()),
                )
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            AppError::external_unavailable(
                SERVICE,
                format!("Failed to read response: {}", e.without_url()),
            )
        })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status, &response_text));
        }

        let text = Self::extract_text(&response_text)?;
        debug!(chars = text.len(), "Received Gemini response");
        Ok(text)
    }
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            // Omit `client` field as HTTP clients are not useful to debug
            .finish_non_exhaustive()
    }
}
