// ABOUTME: Goal-plan support: which metrics each primary goal tracks and reply decoding
// ABOUTME: The model's daily target reply is fence-stripped and decoded strictly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use meal_lens_core::errors::{AppError, AppResult};
use meal_lens_core::models::{DailyGoalPlan, GoalMetric};
use serde::Deserialize;
use tracing::warn;

use crate::text::strip_code_fences;

/// Metrics the plan must target for a primary goal, most important first.
///
/// Goals are matched case-insensitively by keyword; anything
/// unrecognized tracks calories, protein and fiber.
#[must_use]
pub fn target_metrics_for_goal(primary_goal: &str) -> &'static [&'static str] {
    let goal = primary_goal.trim().to_lowercase();
    if goal.contains("muscle") {
        &["Protein", "Calories", "Meal Timing"]
    } else if goal.contains("energy") {
        &["Carb Quality", "Hydration", "Water"]
    } else if goal.contains("blood sugar") {
        &["Added Sugar", "Fiber", "Meal Timing"]
    } else if goal.contains("heart") {
        &["Sodium", "Saturated Fat", "Fiber"]
    } else if goal.contains("gut") {
        &["Calories", "Water", "Protein"]
    } else {
        &["Calories", "Protein", "Fiber"]
    }
}

/// Reply shape; unknown or missing keys are rejected
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanReply {
    title: String,
    description: String,
    metrics: Vec<MetricReply>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MetricReply {
    label: String,
    value: String,
    #[serde(default)]
    rationale: String,
}

/// Decode the model's daily target reply into a [`DailyGoalPlan`]
///
/// # Errors
///
/// Returns an invalid-format error if the reply is not the expected JSON
/// object or carries no metrics
pub fn parse_goal_plan(raw: &str) -> AppResult<DailyGoalPlan> {
    let body = strip_code_fences(raw);
    let reply: PlanReply = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Goal plan reply did not decode");
        AppError::invalid_format(format!("Failed to parse goal format: {e}"))
    })?;

    if reply.metrics.is_empty() {
        return Err(AppError::invalid_format("Goal plan has no metrics"));
    }

    Ok(DailyGoalPlan {
        title: reply.title.trim().to_owned(),
        description: reply.description.trim().to_owned(),
        metrics: reply
            .metrics
            .into_iter()
            .map(|m| GoalMetric {
                label: m.label.trim().to_owned(),
                value: m.value.trim().to_owned(),
                rationale: m.rationale.trim().to_owned(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meal_lens_core::errors::ErrorCode;

    const REPLY: &str = r#"{
        "title": "Steady Cut",
        "description": "A moderate deficit with high protein.",
        "metrics": [
            {"label": "Calories", "value": "1800 kcal", "rationale": "500 kcal below maintenance"},
            {"label": "Protein", "value": "130g", "rationale": "Preserve lean mass"},
            {"label": "Fiber", "value": "30g"}
        ]
    }"#;

    #[test]
    fn test_goal_metric_table() {
        assert_eq!(
            target_metrics_for_goal("Weight loss"),
            &["Calories", "Protein", "Fiber"]
        );
        assert_eq!(
            target_metrics_for_goal("Muscle gain"),
            &["Protein", "Calories", "Meal Timing"]
        );
        assert_eq!(
            target_metrics_for_goal("Improve energy"),
            &["Carb Quality", "Hydration", "Water"]
        );
        assert_eq!(
            target_metrics_for_goal("blood sugar control"),
            &["Added Sugar", "Fiber", "Meal Timing"]
        );
        assert_eq!(
            target_metrics_for_goal("Heart health"),
            &["Sodium", "Saturated Fat", "Fiber"]
        );
        assert_eq!(
            target_metrics_for_goal("Gut health"),
            &["Calories", "Water", "Protein"]
        );
        assert_eq!(
            target_metrics_for_goal(""),
            &["Calories", "Protein", "Fiber"]
        );
    }

    #[test]
    fn test_parse_fenced_reply() {
        let plan = parse_goal_plan(&format!("```json\n{REPLY}\n```")).unwrap();
        assert_eq!(plan.title, "Steady Cut");
        assert_eq!(plan.metrics.len(), 3);
        assert_eq!(plan.metrics[1].value, "130g");
        assert_eq!(plan.metrics[2].rationale, "");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let reply = r#"{"title": "T", "description": "D", "notes": "x",
            "metrics": [{"label": "Calories", "value": "1800 kcal"}]}"#;
        let err = parse_goal_plan(reply).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert!(err.message.contains("Failed to parse goal format"));
    }

    #[test]
    fn test_missing_value_and_empty_metrics_are_rejected() {
        let missing = r#"{"title": "T", "description": "D", "metrics": [{"label": "Calories"}]}"#;
        assert!(parse_goal_plan(missing).is_err());

        let empty = r#"{"title": "T", "description": "D", "metrics": []}"#;
        let err = parse_goal_plan(empty).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        assert!(parse_goal_plan("Here is your plan!").is_err());
    }
}
