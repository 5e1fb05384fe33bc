// ABOUTME: Core data models for food segmentation, nutrition metrics, meals, and snapshots
// ABOUTME: Re-exports the types shared by the intelligence and service layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Data Models
//!
//! - **food**: per-region segmentation output, per-food metrics, and the
//!   meal-level aggregate
//! - **meal**: meal records, identifiers, and per-day status
//! - **snapshot**: the nutrition-state snapshot consumed by the advice
//!   controller, plus its derived key-metrics view
//! - **profile**: the user profile behind daily goal generation

mod food;
mod meal;
mod profile;
mod snapshot;

pub use food::{FoodItem, FoodMetrics, MealAnalysis, SegmentationMask};
pub use meal::{DayStatus, LoggedMeal, MealId, MealRecord, MealType, NewMeal};
pub use profile::{ActivityLevel, UserProfile};
pub use snapshot::{
    DailyGoalPlan, GoalMetric, KeyMetric, MetricStatus, NutritionSnapshot, NutritionWarning,
};
