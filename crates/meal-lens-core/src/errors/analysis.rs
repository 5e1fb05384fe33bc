// ABOUTME: Error taxonomy for the two-phase food image analysis pipeline
// ABOUTME: Distinguishes fatal segmentation/config failures from degradable metrics gaps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use thiserror::Error;

use super::{AppError, ErrorCode};

/// Failures that abort a food image analysis.
///
/// Metrics-phase problems never appear here: an unreadable nutrition
/// response degrades to empty metrics slots instead of failing the capture.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API key configured; raised before any network call
    #[error("API key is not configured")]
    ConfigurationMissing,

    /// The segmentation request failed in transport or with a non-2xx status
    #[error("Segmentation request failed: {0}")]
    NetworkFailure(#[source] AppError),

    /// The segmentation response was not a list of masks
    #[error("Segmentation parsing failed: {reason}")]
    SegmentationParseFailed {
        /// Decoder message
        reason: String,
    },

    /// The segmentation response parsed but contained no food regions
    #[error("No food items detected in the image")]
    NoFoodDetected,

    /// The captured image could not be read
    #[error("Failed to read image: {reason}")]
    ImageRead {
        /// Underlying I/O description
        reason: String,
    },

    /// The analysis succeeded but the meal could not be stored
    #[error("Failed to save meal: {0}")]
    Persistence(#[source] AppError),
}

impl AnalysisError {
    /// Whether the failure should be shown to the user as a blocking error
    #[must_use]
    pub const fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMissing
                | Self::SegmentationParseFailed { .. }
                | Self::NoFoodDetected
                | Self::ImageRead { .. }
        )
    }

    /// Error code used when this failure crosses into `AppError`
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ConfigurationMissing => ErrorCode::ConfigMissing,
            Self::NetworkFailure(inner) | Self::Persistence(inner) => inner.code,
            Self::SegmentationParseFailed { .. } => ErrorCode::InvalidFormat,
            Self::NoFoodDetected => ErrorCode::ResourceNotFound,
            Self::ImageRead { .. } => ErrorCode::InvalidInput,
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(error: AnalysisError) -> Self {
        Self::new(error.code(), error.to_string()).with_source(error)
    }
}
