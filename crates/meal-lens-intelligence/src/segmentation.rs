// ABOUTME: Parses the phase-1 segmentation response into a list of segmentation masks
// ABOUTME: Tolerates code fences and prose around the JSON array; any malformed entry fails the parse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! Phase-1 response parsing
//!
//! The model is asked for a bare JSON array of `{box_2d, mask, label}`
//! objects. It frequently wraps the array in a markdown fence or a sentence
//! of prose, so the parser first strips fences, then falls back to the
//! outermost `[...]` slice. Decoding is all-or-nothing: phase 2 needs the
//! complete label list, so a single bad entry fails the whole parse.

use meal_lens_core::errors::AnalysisError;
use meal_lens_core::models::SegmentationMask;
use tracing::{debug, warn};

use crate::text::{extract_delimited, strip_code_fences};

/// Characters of raw response echoed into parse-failure logs
const LOG_PREVIEW_CHARS: usize = 200;

/// Phase-1 response parser
pub struct SegmentationParser;

impl SegmentationParser {
    /// Decode the raw model text into segmentation masks.
    ///
    /// An empty array is a successful parse; callers decide whether an
    /// image with no detected food is an error.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SegmentationParseFailed`] when no strict
    /// list of masks can be decoded from the text.
    pub fn parse(response_text: &str) -> Result<Vec<SegmentationMask>, AnalysisError> {
        let cleaned = strip_code_fences(response_text);

        let first_error = match serde_json::from_str::<Vec<SegmentationMask>>(cleaned) {
            Ok(masks) => {
                debug!(count = masks.len(), "Parsed segmentation masks");
                return Ok(masks);
            }
            Err(e) => e,
        };

        // Only prose-wrapped text gets the slice fallback; a JSON object is a wrong shape
        if !cleaned.starts_with(['[', '{']) {
            if let Some(slice) = extract_delimited(cleaned, '[', ']') {
                if let Ok(masks) = serde_json::from_str::<Vec<SegmentationMask>>(slice) {
                    debug!(
                        count = masks.len(),
                        "Parsed segmentation masks from embedded JSON array"
                    );
                    return Ok(masks);
                }
            }
        }

        let preview: String = cleaned.chars().take(LOG_PREVIEW_CHARS).collect();
        warn!(error = %first_error, preview = %preview, "Segmentation parsing failed");
        Err(AnalysisError::SegmentationParseFailed {
            reason: first_error.to_string(),
        })
    }
}
