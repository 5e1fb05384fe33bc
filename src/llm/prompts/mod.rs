// ABOUTME: Prompt templates for segmentation, nutrition, coaching, and goal-plan requests
// ABOUTME: Templates are markdown files embedded at compile time with simple placeholders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Prompt Templates
//!
//! Prompts are loaded at compile time from markdown files for easy
//! maintenance. Placeholders use `{{NAME}}` and are filled by the builder
//! functions below; the text itself is configuration, not protocol.

use std::fmt::Write as _;

use crate::models::UserProfile;

/// Phase-1 prompt: segmentation masks with descriptive labels
pub const SEGMENTATION_PROMPT: &str = include_str!("segmentation.md");

/// Phase-2 prompt: one nutrition record per requested label, keyed by name
pub const BATCH_FOOD_METRICS_PROMPT: &str = include_str!("batch_food_metrics.md");

/// Overall advice prompt for the rest of the day
pub const ADVICE_PROMPT: &str = include_str!("advice.md");

/// Next-meal suggestion prompt
pub const MEAL_SUGGESTION_PROMPT: &str = include_str!("meal_suggestion.md");

/// Personalized daily goal plan prompt
pub const DAILY_TARGET_PROMPT: &str = include_str!("daily_target.md");

const FOOD_LIST_PLACEHOLDER: &str = "{{FOOD_LIST}}";
const CONTEXT_PLACEHOLDER: &str = "{{CONTEXT}}";

/// Phase-2 prompt for the given labels, joined with ", " in input order
#[must_use]
pub fn batch_metrics_prompt<S: AsRef<str>>(labels: &[S]) -> String {
    let food_list = labels
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    BATCH_FOOD_METRICS_PROMPT.replace(FOOD_LIST_PLACEHOLDER, &food_list)
}

/// Advice prompt around a coaching context
#[must_use]
pub fn advice_prompt(context: &str) -> String {
    ADVICE_PROMPT.replace(CONTEXT_PLACEHOLDER, context)
}

/// Meal suggestion prompt around a coaching context
#[must_use]
pub fn meal_suggestion_prompt(context: &str) -> String {
    MEAL_SUGGESTION_PROMPT.replace(CONTEXT_PLACEHOLDER, context)
}

/// Daily goal plan prompt for `profile`, asking for `metrics` in order.
///
/// Empty list fields render as "None".
#[must_use]
pub fn daily_target_prompt(profile: &UserProfile, metrics: &[&str]) -> String {
    let mut metric_lines = String::new();
    for (index, label) in metrics.iter().enumerate() {
        if index > 0 {
            metric_lines.push_str(",\n");
        }
        let _ = write!(
            metric_lines,
            r#"    {{ "label": "{label}", "value": "Target Value", "rationale": "Brief reason" }}"#
        );
    }

    let replacements = [
        ("{{SEX}}", or_none(&profile.sex)),
        ("{{AGE}}", profile.age.to_string()),
        ("{{HEIGHT}}", profile.height_cm.to_string()),
        ("{{WEIGHT}}", profile.weight_kg.to_string()),
        ("{{ACTIVITY_LEVEL}}", profile.activity_level.label().to_owned()),
        ("{{PRIMARY_GOAL}}", or_none(&profile.primary_goal)),
        ("{{INTENSITY}}", or_none(&profile.intensity)),
        ("{{SECONDARY_FOCUS}}", or_none(&profile.secondary_goals.join(", "))),
        (
            "{{HEALTH_CONDITIONS}}",
            or_none(&profile.health_conditions.join(", ")),
        ),
        ("{{DIETARY_PATTERN}}", or_none(&profile.dietary_pattern)),
        ("{{MEDICATIONS}}", or_none(&profile.medications)),
        ("{{METRICS}}", metric_lines),
    ];

    replacements
        .into_iter()
        .fold(DAILY_TARGET_PROMPT.to_owned(), |prompt, (placeholder, value)| {
            prompt.replace(placeholder, &value)
        })
}

fn or_none(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "None".to_owned()
    } else {
        trimmed.to_owned()
    }
}
