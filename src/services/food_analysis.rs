// ABOUTME: Two-phase food image analysis: segmentation, then batched nutrition metrics
// ABOUTME: Aborts on segmentation failures and degrades metrics failures to empty slots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Food Analysis Service
//!
//! Phase 1 asks the model for labelled segmentation masks. Phase 2 sends
//! every label in a single nutrition request and reconciles the reply back
//! onto the labels by position. Only phase-1 problems fail the analysis; a
//! failed or unreadable phase-2 reply leaves the affected items without
//! metrics so the captured photo and detected items are never lost.

use std::path::Path;
use std::sync::Arc;

use meal_lens_intelligence::{MealAnalysisAggregator, MetricsReconciler, SegmentationParser};
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::errors::AnalysisError;
use crate::llm::prompts::{batch_metrics_prompt, SEGMENTATION_PROMPT};
use crate::llm::{ImagePayload, InferenceClient, InferenceRequest};
use crate::models::{FoodItem, FoodMetrics, MealAnalysis, MealId, NewMeal, SegmentationMask};
use crate::persistence::MealStore;

/// Runs the food image pipeline against a remote model
#[derive(Clone)]
pub struct FoodAnalysisService {
    client: Arc<dyn InferenceClient>,
    model: String,
}

impl FoodAnalysisService {
    /// Service using `client` and `model` for both phases
    #[must_use]
    pub fn new(client: Arc<dyn InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Model used for both phases
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Analyze one food photo.
    ///
    /// # Errors
    ///
    /// - `ConfigurationMissing` for a blank key, before any network call
    /// - `ImageRead` for an empty image
    /// - `NetworkFailure` when the segmentation request fails
    /// - `SegmentationParseFailed` when the segmentation reply is not a mask list
    /// - `NoFoodDetected` when the mask list is empty
    #[instrument(skip(self, image_bytes, api_key), fields(image_bytes = image_bytes.len()))]
    pub async fn analyze_food_image(
        &self,
        image_bytes: &[u8],
        api_key: &str,
    ) -> Result<MealAnalysis, AnalysisError> {
        if api_key.trim().is_empty() {
            return Err(AnalysisError::ConfigurationMissing);
        }
        if image_bytes.is_empty() {
            return Err(AnalysisError::ImageRead {
                reason: "image is empty".to_owned(),
            });
        }
        let image = ImagePayload::from_bytes(image_bytes.to_vec());

        let masks = self.segment(&image, api_key).await?;
        if masks.is_empty() {
            warn!("Segmentation returned no food regions");
            return Err(AnalysisError::NoFoodDetected);
        }

        let labels: Vec<&str> = masks.iter().map(|mask| mask.label.as_str()).collect();
        let metrics = self.fetch_metrics(&labels, &image, api_key).await;

        let food_items: Vec<FoodItem> = masks
            .into_iter()
            .zip(metrics)
            .map(|(mask, metrics)| FoodItem::new(mask, metrics))
            .collect();

        let analysis = MealAnalysisAggregator::aggregate(food_items);
        info!(
            items = analysis.food_items.len(),
            resolved = analysis.resolved_item_count(),
            total_calories = analysis.total_calories,
            is_healthy = analysis.is_healthy,
            "Food analysis complete"
        );
        Ok(analysis)
    }

    /// Read a photo from disk and analyze it
    ///
    /// # Errors
    ///
    /// Returns `ImageRead` if the file cannot be read, otherwise the errors
    /// of [`Self::analyze_food_image`].
    pub async fn analyze_image_file(
        &self,
        path: &Path,
        api_key: &str,
    ) -> Result<MealAnalysis, AnalysisError> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| AnalysisError::ImageRead {
                reason: format!("{}: {e}", path.display()),
            })?;
        self.analyze_food_image(&bytes, api_key).await
    }

    /// Analyze a photo, then store the meal with its food items
    ///
    /// # Errors
    ///
    /// Returns the analysis errors of [`Self::analyze_food_image`], or
    /// `Persistence` when the store rejects the write.
    pub async fn capture_meal<S>(
        &self,
        store: &S,
        meal: &NewMeal,
        image_bytes: &[u8],
        api_key: &str,
    ) -> Result<(MealId, MealAnalysis), AnalysisError>
    where
        S: MealStore + ?Sized,
    {
        let analysis = self.analyze_food_image(image_bytes, api_key).await?;
        let id = store
            .save_meal_with_food_items(meal, &analysis)
            .await
            .map_err(AnalysisError::Persistence)?;
        info!(meal_id = %id, meal_type = %meal.meal_type, "Meal captured");
        Ok((id, analysis))
    }

    async fn segment(
        &self,
        image: &ImagePayload,
        api_key: &str,
    ) -> Result<Vec<SegmentationMask>, AnalysisError> {
        let request = InferenceRequest::text(SEGMENTATION_PROMPT, api_key, &self.model)
            .with_image(image.clone());
        let text = self
            .client
            .generate_content(&request)
            .await
            .map_err(AnalysisError::NetworkFailure)?;
        SegmentationParser::parse(&text)
    }

    /// One slot per label; a failed request leaves every slot empty
    async fn fetch_metrics(
        &self,
        labels: &[&str],
        image: &ImagePayload,
        api_key: &str,
    ) -> Vec<Option<FoodMetrics>> {
        let request = InferenceRequest::text(batch_metrics_prompt(labels), api_key, &self.model)
            .with_image(image.clone());
        match self.client.generate_content(&request).await {
            Ok(text) => MetricsReconciler::reconcile(labels, &text).into_metrics(),
            Err(e) => {
                warn!(
                    error = %e,
                    labels = labels.len(),
                    "Nutrition request failed, continuing without metrics"
                );
                vec![None; labels.len()]
            }
        }
    }
}
