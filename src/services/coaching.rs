// ABOUTME: Builds the coaching context and requests overall advice and next-meal suggestions
// ABOUTME: Cleans model replies of wrapping quotes, escapes, and stray markdown or HTML
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, instrument};

use crate::errors::AppResult;
use crate::llm::prompts::{advice_prompt, meal_suggestion_prompt};
use crate::llm::{InferenceClient, InferenceRequest};
use crate::models::{KeyMetric, NutritionSnapshot};

/// Literal replacements applied after quote stripping, in order
const CLEANUP_REPLACEMENTS: &[(&str, &str)] = &[
    ("\\n", "\n"),
    ("\\\"", "\""),
    ("\\u003c", "<"),
    ("\\u003e", ">"),
    ("\\u0026", "&"),
    ("<b>", ""),
    ("</b>", ""),
    ("<br>", "\n"),
    ("* **", "• "),
    ("**", ""),
];

/// Coaching requests against a remote model
#[derive(Clone)]
pub struct CoachingPromptService {
    client: Arc<dyn InferenceClient>,
    model: String,
}

impl CoachingPromptService {
    /// Service using `client` and `model`
    #[must_use]
    pub fn new(client: Arc<dyn InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Deterministic text context shared by both coaching prompts.
    ///
    /// Meal times and the current time are rendered in `now`'s offset.
    #[must_use]
    pub fn build_context(
        snapshot: &NutritionSnapshot,
        key_metrics: &[KeyMetric],
        now: &DateTime<FixedOffset>,
    ) -> String {
        let mut context = String::new();

        context.push_str("--- Key Metrics Status ---\n");
        if key_metrics.is_empty() {
            let _ = writeln!(
                context,
                "Calories: {} / {} (Target)",
                snapshot.current_calories, snapshot.target_calories
            );
            let _ = writeln!(
                context,
                "Water: {}L / {}L (Target)",
                format_decimal(snapshot.water_intake_liters),
                format_decimal(snapshot.water_target_liters)
            );
        } else {
            for metric in key_metrics {
                let _ = writeln!(
                    context,
                    "{}: {} / {}{} (Status: {})",
                    metric.title,
                    metric.current as i64,
                    metric.target as i64,
                    metric.unit,
                    metric.status.as_str()
                );
            }
        }

        context.push_str("\n--- Meals Captured ---\n");
        if snapshot.daily_meals.is_empty() {
            context.push_str("No meals captured yet today.\n");
        } else {
            let mut meals: Vec<_> = snapshot.daily_meals.iter().collect();
            meals.sort_by_key(|meal| meal.captured_at);
            for meal in meals {
                let local = meal.captured_at.with_timezone(now.offset());
                let _ = writeln!(
                    context,
                    "- {} at {} : {} kcal",
                    meal.meal_type.as_str(),
                    local.format("%H:%M"),
                    meal.calories.unwrap_or(0)
                );
            }
        }

        context.push_str("\n--- User Context ---\n");
        let _ = writeln!(context, "Goal: {}", snapshot.primary_goal);

        let _ = writeln!(context, "\nCurrent Time: {}", now.format("%H:%M"));
        context
    }

    /// Short advice for the rest of the day
    ///
    /// # Errors
    ///
    /// Returns the client error when the request fails.
    #[instrument(skip(self, context, api_key))]
    pub async fn get_advice(&self, context: &str, api_key: &str) -> AppResult<String> {
        let request = InferenceRequest::text(advice_prompt(context), api_key, &self.model);
        let text = self.client.generate_content(&request).await?;
        debug!(chars = text.len(), "Advice generated");
        Ok(clean_response(&text))
    }

    /// Suggestion for the next meal
    ///
    /// # Errors
    ///
    /// Returns the client error when the request fails.
    #[instrument(skip(self, context, api_key))]
    pub async fn get_meal_suggestion(&self, context: &str, api_key: &str) -> AppResult<String> {
        let request =
            InferenceRequest::text(meal_suggestion_prompt(context), api_key, &self.model);
        let text = self.client.generate_content(&request).await?;
        debug!(chars = text.len(), "Meal suggestion generated");
        Ok(clean_response(&text))
    }
}

/// Best-effort cleanup of a coaching reply.
///
/// Strips one pair of wrapping double quotes, undoes common escapes, and
/// drops the bold/break markup the model emits inconsistently.
#[must_use]
pub fn clean_response(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);

    CLEANUP_REPLACEMENTS
        .iter()
        .fold(unquoted.to_owned(), |text, (from, to)| text.replace(from, to))
}

/// Decimal rendering that always shows a fractional part ("2.0", "1.25")
fn format_decimal(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_response() {
        assert_eq!(clean_response("  \"Drink water.\"  "), "Drink water.");
        assert_eq!(
            clean_response(r"For dinner:\n* **Salmon**\n- rice"),
            "For dinner:\n• Salmon\n- rice"
        );
        assert_eq!(
            clean_response(r"<b>Great</b> day<br><yes> & more"),
            "Great day\n<yes> & more"
        );
        assert_eq!(clean_response(r#"He said \"hi\""#), "He said \"hi\"");
    }

    #[test]
    fn test_single_quote_is_kept() {
        assert_eq!(clean_response("\""), "\"");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(2.0), "2.0");
        assert_eq!(format_decimal(1.25), "1.25");
    }
}
