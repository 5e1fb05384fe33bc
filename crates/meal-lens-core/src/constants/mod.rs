// ABOUTME: Shared constants for food analysis thresholds, model defaults, and timeouts
// ABOUTME: Centralizes magic numbers used by the reconciler, aggregator, and inference client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! Application-wide constants organized by domain.

/// Meal healthiness thresholds
pub mod health {
    /// Minimum share of healthy items for a meal (or a day) to count as healthy
    pub const HEALTHY_RATIO_THRESHOLD: f64 = 0.67;

    /// Number of captured meals that makes a day complete
    pub const MEALS_PER_COMPLETE_DAY: usize = 3;

    /// Water intake (L) below which a high-calorie day raises a warning
    pub const LOW_WATER_LITERS: f64 = 0.5;

    /// Calories above which low water intake raises a warning
    pub const LOW_WATER_CALORIE_FLOOR: i32 = 1000;

    /// Total fat (g) above which a warning is raised
    pub const HIGH_FAT_GRAMS: f64 = 100.0;
}

/// Segmentation geometry
pub mod segmentation {
    /// Bounding boxes returned by the model are normalized to this scale
    pub const BOX_NORMALIZATION_SCALE: i64 = 1000;
}

/// Remote model defaults
pub mod inference {
    /// Default generative model for both analysis phases and coaching
    pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

    /// Default base URL of the Generative Language API
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Overall request timeout in seconds
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Connection establishment timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 60;

    /// Mime type assumed when image bytes carry no recognizable signature
    pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";
}

/// Service names for structured logging
pub mod service_names {
    /// Name reported by the logging layer
    pub const MEAL_LENS: &str = "meal-lens";
}
