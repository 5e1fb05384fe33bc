// ABOUTME: Food segmentation masks, per-food nutrition metrics, and meal-level analysis
// ABOUTME: Wire shapes match the JSON emitted by the vision model for both analysis phases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::constants::segmentation::BOX_NORMALIZATION_SCALE;
use crate::errors::{AppError, AppResult};

/// One detected food region from the segmentation phase.
///
/// `label` is the join key for the metrics phase and is not unique: two
/// servings of the same food may share a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationMask {
    /// `[y0, x0, y1, x1]` normalized to 0-1000
    #[serde(rename = "box_2d")]
    pub bounding_box: [i32; 4],
    /// Base64 PNG mask, raw or as a `data:` URI
    #[serde(default)]
    pub mask: Option<String>,
    /// Descriptive food label
    pub label: String,
}

impl SegmentationMask {
    /// Base64 payload of the mask with any `data:` URI prefix removed
    #[must_use]
    pub fn base64_data(&self) -> Option<&str> {
        let mask = self.mask.as_deref()?;
        if mask.starts_with("data:") {
            Some(mask.split_once(',').map_or(mask, |(_, data)| data))
        } else {
            Some(mask)
        }
    }

    /// Decode the mask image bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the region has no mask or the payload is not base64.
    pub fn decode_mask(&self) -> AppResult<Vec<u8>> {
        let data = self
            .base64_data()
            .ok_or_else(|| AppError::not_found(format!("Mask for '{}'", self.label)))?;
        BASE64.decode(data.trim()).map_err(|e| {
            AppError::invalid_format(format!("Mask for '{}' is not base64", self.label))
                .with_source(e)
        })
    }

    /// Pixel coordinates `[y0, x0, y1, x1]` for an image of the given size
    #[must_use]
    pub fn denormalized_box(&self, image_width: u32, image_height: u32) -> [i64; 4] {
        let [y0, x0, y1, x1] = self.bounding_box.map(i64::from);
        let width = i64::from(image_width);
        let height = i64::from(image_height);
        [
            y0 * height / BOX_NORMALIZATION_SCALE,
            x0 * width / BOX_NORMALIZATION_SCALE,
            y1 * height / BOX_NORMALIZATION_SCALE,
            x1 * width / BOX_NORMALIZATION_SCALE,
        ]
    }

    /// Box `(width, height)` in pixels
    #[must_use]
    pub fn box_dimensions(&self, image_width: u32, image_height: u32) -> (i64, i64) {
        let [y0, x0, y1, x1] = self.denormalized_box(image_width, image_height);
        ((x1 - x0).abs(), (y1 - y0).abs())
    }
}

/// Nutrition estimate for one food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodMetrics {
    /// Energy in kcal
    pub calories: i32,
    /// Protein in grams
    pub protein: f64,
    /// Fiber in grams
    pub fiber: f64,
    /// Added sugar in grams
    pub added_sugar: f64,
    /// Saturated fat in grams
    pub saturated_fat: f64,
    /// Sodium in milligrams
    pub sodium: f64,
    /// Vegetable content in grams
    pub vegetable_content: f64,
    /// Water in milliliters
    pub water: f64,
    /// 1 = unprocessed, 5 = ultra-processed
    pub processing_level: i32,
    /// Model verdict for the single item
    pub is_healthy: bool,
}

/// A segmented food region joined with its (optional) metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Segmentation output for the region
    #[serde(flatten)]
    pub segmentation: SegmentationMask,
    /// `None` when the metrics phase produced no match for this label
    pub metrics: Option<FoodMetrics>,
}

impl FoodItem {
    /// Join a region with its metrics slot
    #[must_use]
    pub const fn new(segmentation: SegmentationMask, metrics: Option<FoodMetrics>) -> Self {
        Self {
            segmentation,
            metrics,
        }
    }

    /// The region label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.segmentation.label
    }

    /// Healthy only when metrics exist and say so
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.metrics.as_ref().is_some_and(|m| m.is_healthy)
    }
}

/// Meal-level aggregate derived from a list of food items.
///
/// Always rebuilt from scratch; never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAnalysis {
    /// Items the totals were computed from
    pub food_items: Vec<FoodItem>,
    /// Summed kcal
    pub total_calories: i32,
    /// Summed protein (g)
    pub total_protein: f64,
    /// Summed fiber (g)
    pub total_fiber: f64,
    /// Summed added sugar (g)
    pub total_added_sugar: f64,
    /// Summed saturated fat (g)
    pub total_saturated_fat: f64,
    /// Summed sodium (mg)
    pub total_sodium: f64,
    /// Summed vegetable content (g)
    pub total_vegetable_content: f64,
    /// Summed water (ml)
    pub total_water: f64,
    /// Truncated mean processing level, 0 for an empty meal
    pub average_processing_level: i32,
    /// At least 67% of items healthy
    pub is_healthy: bool,
    /// Rule-based comment
    pub ai_comment: String,
}

impl MealAnalysis {
    /// Number of items that carry metrics
    #[must_use]
    pub fn resolved_item_count(&self) -> usize {
        self.food_items
            .iter()
            .filter(|item| item.metrics.is_some())
            .count()
    }
}
