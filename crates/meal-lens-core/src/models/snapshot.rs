// ABOUTME: Nutrition-state snapshot consumed by the advice staleness controller
// ABOUTME: Includes the daily goal plan shape and the derived key-metric view types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use super::meal::LoggedMeal;
use crate::errors::{AppError, AppResult};

/// Point-in-time view of the user's nutrition state for today.
///
/// A new snapshot is emitted on every underlying data change (meal captured,
/// weight updated, water logged), possibly many times per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionSnapshot {
    /// Calories eaten today
    pub current_calories: i32,
    /// Daily calorie target
    pub target_calories: i32,
    /// Latest body weight (kg)
    pub current_weight: f64,
    /// Water drunk today (L)
    pub water_intake_liters: f64,
    /// Daily water target (L)
    pub water_target_liters: f64,
    /// Carbohydrates (g)
    pub carbs: f64,
    /// Protein (g)
    pub protein: f64,
    /// Total fat (g)
    pub fat: f64,
    /// Fiber (g)
    pub fiber: f64,
    /// Added sugar (g)
    pub added_sugar: f64,
    /// Sodium (mg)
    pub sodium: f64,
    /// Saturated fat (g)
    pub saturated_fat: f64,
    /// Vegetable content (g)
    pub vegetable_content: f64,
    /// Free-text primary goal ("Weight loss", "Build muscle", ...)
    pub primary_goal: String,
    /// JSON-encoded [`DailyGoalPlan`], empty when none was generated
    pub detail_goal: String,
    /// Meals captured today
    pub daily_meals: Vec<LoggedMeal>,
    /// Intake warning derived from the totals, if any
    pub warning: Option<NutritionWarning>,
}

impl Default for NutritionSnapshot {
    fn default() -> Self {
        Self {
            current_calories: 0,
            target_calories: 2000,
            current_weight: 60.0,
            water_intake_liters: 0.0,
            water_target_liters: 2.5,
            carbs: 0.0,
            protein: 0.0,
            fat: 0.0,
            fiber: 0.0,
            added_sugar: 0.0,
            sodium: 0.0,
            saturated_fat: 0.0,
            vegetable_content: 0.0,
            primary_goal: String::new(),
            detail_goal: String::new(),
            daily_meals: Vec::new(),
            warning: None,
        }
    }
}

impl NutritionSnapshot {
    /// Number of meals logged today
    #[must_use]
    pub fn meal_count(&self) -> usize {
        self.daily_meals.len()
    }

    /// Decode the embedded goal plan, if any
    #[must_use]
    pub fn goal_plan(&self) -> Option<DailyGoalPlan> {
        if self.detail_goal.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&self.detail_goal).ok()
    }
}

/// Intake warning shown next to the daily totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NutritionWarning {
    /// Little water drunk on a day with substantial calories
    LowWaterForIntake,
    /// Total fat is high
    HighFat,
}

impl NutritionWarning {
    /// User-facing text
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::LowWaterForIntake => "Water intake too low for current consumption.",
            Self::HighFat => "High fat intake detected.",
        }
    }
}

impl Display for NutritionWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.message())
    }
}

/// Personalized daily target plan generated for the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyGoalPlan {
    /// Short title
    pub title: String,
    /// Strategy summary
    pub description: String,
    /// Tracked targets, most important first
    pub metrics: Vec<GoalMetric>,
}

impl DailyGoalPlan {
    /// Encode for [`NutritionSnapshot::detail_goal`]
    ///
    /// # Errors
    ///
    /// Returns an internal error if serialization fails
    pub fn to_detail_goal(&self) -> AppResult<String> {
        serde_json::to_string(self)
            .map_err(|e| AppError::internal(format!("Failed to encode goal plan: {e}")))
    }
}

/// One target of a [`DailyGoalPlan`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalMetric {
    /// Metric name ("Protein", "Sodium", ...)
    pub label: String,
    /// Target text ("150g", "2300 mg", ...)
    pub value: String,
    /// Why the target was chosen
    #[serde(default)]
    pub rationale: String,
}

/// Traffic-light status of a key metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricStatus {
    /// On target
    Good,
    /// Drifting from target
    Warning,
    /// Far from target
    Alert,
    /// No judgement
    Neutral,
}

impl MetricStatus {
    /// Upper-case name used in prompt context
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Warning => "WARNING",
            Self::Alert => "ALERT",
            Self::Neutral => "NEUTRAL",
        }
    }
}

/// A goal-driven metric compared against its target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetric {
    /// Display title
    pub title: String,
    /// Value so far today
    pub current: f64,
    /// Daily target
    pub target: f64,
    /// Unit suffix ("g", "mg", "L", or empty for kcal)
    pub unit: String,
    /// Status against target
    pub status: MetricStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults_fill_missing_fields() {
        let snapshot: NutritionSnapshot =
            serde_json::from_str(r#"{"current_calories": 900, "primary_goal": "Weight loss"}"#)
                .unwrap();
        assert_eq!(snapshot.current_calories, 900);
        assert_eq!(snapshot.target_calories, 2000);
        assert!(snapshot.daily_meals.is_empty());
    }

    #[test]
    fn test_goal_plan_decoding() {
        let mut snapshot = NutritionSnapshot::default();
        assert!(snapshot.goal_plan().is_none());

        snapshot.detail_goal = "not json".to_owned();
        assert!(snapshot.goal_plan().is_none());

        snapshot.detail_goal =
            r#"{"title":"Lean","metrics":[{"label":"Protein","value":"150g"}]}"#.to_owned();
        let plan = snapshot.goal_plan().unwrap();
        assert_eq!(plan.metrics.len(), 1);
        assert_eq!(plan.metrics[0].value, "150g");
    }
}
