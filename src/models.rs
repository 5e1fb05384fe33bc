// ABOUTME: Re-exports the Meal Lens data model from the core crate
// ABOUTME: Segmentation masks, food metrics, meals, snapshots, and the user profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

pub use meal_lens_core::models::{
    ActivityLevel, DailyGoalPlan, DayStatus, FoodItem, FoodMetrics, GoalMetric, KeyMetric,
    LoggedMeal, MealAnalysis, MealId, MealRecord, MealType, MetricStatus, NewMeal,
    NutritionSnapshot, NutritionWarning, SegmentationMask, UserProfile,
};
