// ABOUTME: Generates the personalized daily goal plan from the user profile
// ABOUTME: Picks target metrics for the primary goal, asks the model, and decodes the reply strictly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::sync::Arc;

use meal_lens_intelligence::{parse_goal_plan, target_metrics_for_goal};
use tracing::{info, instrument};

use crate::errors::{AppError, AppResult};
use crate::llm::prompts::daily_target_prompt;
use crate::llm::{InferenceClient, InferenceRequest};
use crate::models::{DailyGoalPlan, UserProfile};

/// Daily goal plan requests against a remote model
#[derive(Clone)]
pub struct GoalPlanService {
    client: Arc<dyn InferenceClient>,
    model: String,
}

impl GoalPlanService {
    /// Service using `client` and `model`
    #[must_use]
    pub fn new(client: Arc<dyn InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Generate a plan for `profile`.
    ///
    /// Store the result with [`DailyGoalPlan::to_detail_goal`] so snapshots
    /// pick it up as their key metrics.
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_MISSING` for a blank key without calling the model,
    /// the client error when the request fails, or `INVALID_FORMAT` when the
    /// reply is not a plan.
    #[instrument(skip(self, profile, api_key), fields(goal = %profile.primary_goal))]
    pub async fn generate_plan(
        &self,
        profile: &UserProfile,
        api_key: &str,
    ) -> AppResult<DailyGoalPlan> {
        if api_key.trim().is_empty() {
            return Err(AppError::config_missing("API key is not configured"));
        }

        let metrics = target_metrics_for_goal(&profile.primary_goal);
        let request =
            InferenceRequest::text(daily_target_prompt(profile, metrics), api_key, &self.model);
        let text = self.client.generate_content(&request).await?;

        let plan = parse_goal_plan(&text)?;
        info!(title = %plan.title, metrics = plan.metrics.len(), "Daily goal plan generated");
        Ok(plan)
    }
}
