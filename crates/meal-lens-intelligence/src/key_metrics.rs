// ABOUTME: Derives the goal-driven key-metrics view from a nutrition snapshot
// ABOUTME: Uses the personalized daily goal plan when present, otherwise a goal-keyed default set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! Key metrics
//!
//! The key-metrics view is what the coaching prompts describe and what the
//! advice staleness check compares between snapshots. With a parseable
//! [`DailyGoalPlan`] the first three plan metrics are mapped onto today's
//! values by label keyword; without one a fixed set keyed on the primary
//! goal is used.

use std::sync::LazyLock;

use meal_lens_core::models::{DailyGoalPlan, GoalMetric, KeyMetric, MetricStatus, NutritionSnapshot};
use regex::Regex;

/// Plan metrics shown at most
const MAX_PLAN_METRICS: usize = 3;

/// Target used when a plan value carries no number
const DEFAULT_PLAN_TARGET: f64 = 100.0;

/// Water targets above this are taken to be milliliters
const WATER_MILLILITER_THRESHOLD: f64 = 10.0;

/// First number in a plan value ("150g" -> 150, "2.5 L" -> 2.5)
static TARGET_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)(\.\d+)?").ok());

/// Build the key-metrics view for a snapshot
#[must_use]
pub fn generate_key_metrics(snapshot: &NutritionSnapshot) -> Vec<KeyMetric> {
    match snapshot.goal_plan() {
        Some(plan) if !plan.metrics.is_empty() => from_plan(snapshot, &plan),
        _ => fallback_metrics(snapshot),
    }
}

fn from_plan(snapshot: &NutritionSnapshot, plan: &DailyGoalPlan) -> Vec<KeyMetric> {
    plan.metrics
        .iter()
        .take(MAX_PLAN_METRICS)
        .map(|goal| plan_metric(snapshot, goal))
        .collect()
}

fn plan_metric(snapshot: &NutritionSnapshot, goal: &GoalMetric) -> KeyMetric {
    let target = parse_target(&goal.value);
    let value_unit = parse_unit(&goal.value);
    let label = goal.label.to_lowercase();
    let has = |needle: &str| label.contains(needle);

    let (current, status, unit) = if has("calor") {
        let current = f64::from(snapshot.current_calories);
        let status = if current > target * 1.1 {
            MetricStatus::Warning
        } else {
            MetricStatus::Good
        };
        (current, status, "")
    } else if has("protein") {
        (snapshot.protein, MetricStatus::Good, "g")
    } else if has("fiber") {
        let status = if snapshot.fiber >= target * 0.8 {
            MetricStatus::Good
        } else {
            MetricStatus::Warning
        };
        (snapshot.fiber, status, "g")
    } else if has("sugar") {
        (snapshot.added_sugar, warn_above(snapshot.added_sugar, target), "g")
    } else if has("fat") && has("sat") {
        let status = if snapshot.saturated_fat < target {
            MetricStatus::Good
        } else {
            MetricStatus::Warning
        };
        (snapshot.saturated_fat, status, "g")
    } else if has("sodium") {
        (snapshot.sodium, warn_above(snapshot.sodium, target), "mg")
    } else if is_water_label(&label) {
        (snapshot.water_intake_liters, MetricStatus::Good, "L")
    } else if has("carb") {
        (snapshot.carbs, MetricStatus::Good, "g")
    } else {
        (0.0, MetricStatus::Neutral, "")
    };

    let target = if is_water_label(&label) && target > WATER_MILLILITER_THRESHOLD {
        target / 1000.0
    } else {
        target
    };

    KeyMetric {
        title: goal.label.clone(),
        current,
        target,
        unit: if unit.is_empty() {
            value_unit
        } else {
            unit.to_owned()
        },
        status,
    }
}

fn fallback_metrics(snapshot: &NutritionSnapshot) -> Vec<KeyMetric> {
    let calories = f64::from(snapshot.current_calories);
    let calorie_target = f64::from(snapshot.target_calories);

    if snapshot.primary_goal.to_lowercase().contains("weight") {
        let calorie_status = if snapshot.current_calories > snapshot.target_calories {
            MetricStatus::Warning
        } else {
            MetricStatus::Good
        };
        let fiber_status = if snapshot.fiber > 20.0 {
            MetricStatus::Good
        } else {
            MetricStatus::Warning
        };
        vec![
            metric("Calories", calories, calorie_target, "", calorie_status),
            metric("Protein", snapshot.protein, 140.0, "g", MetricStatus::Good),
            metric("Fiber", snapshot.fiber, 25.0, "g", fiber_status),
        ]
    } else {
        vec![
            metric("Calories", calories, calorie_target, "", MetricStatus::Neutral),
            metric(
                "Water",
                snapshot.water_intake_liters,
                snapshot.water_target_liters,
                "L",
                MetricStatus::Good,
            ),
            metric("Protein", snapshot.protein, 100.0, "g", MetricStatus::Good),
        ]
    }
}

fn metric(title: &str, current: f64, target: f64, unit: &str, status: MetricStatus) -> KeyMetric {
    KeyMetric {
        title: title.to_owned(),
        current,
        target,
        unit: unit.to_owned(),
        status,
    }
}

fn warn_above(current: f64, target: f64) -> MetricStatus {
    if current > target {
        MetricStatus::Warning
    } else {
        MetricStatus::Good
    }
}

fn is_water_label(label_lower: &str) -> bool {
    label_lower.contains("water") || label_lower.contains("hydra")
}

fn parse_target(value: &str) -> f64 {
    TARGET_NUMBER
        .as_ref()
        .and_then(|re| re.find(value))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_PLAN_TARGET)
}

fn parse_unit(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_ascii_digit() && *c != '.' && !c.is_whitespace())
        .collect()
}
