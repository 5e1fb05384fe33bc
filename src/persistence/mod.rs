// ABOUTME: Storage contracts for captured meals and user preferences
// ABOUTME: Async traits consumed by the analysis service and the advice controller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Persistence
//!
//! The core only needs a narrow slice of storage: saving a meal together
//! with its food items, reading the items back, summarizing a day, and
//! rolling a day up into a snapshot, and reading or writing the API key. Durable backends implement these traits;
//! [`memory`] holds the in-process implementations used by the CLI and tests.

/// In-memory store implementations
pub mod memory;

pub use memory::{InMemoryMealStore, InMemoryPreferences};

use async_trait::async_trait;
use chrono::NaiveDate;
use meal_lens_intelligence::roll_up_day;

use crate::errors::AppResult;
use crate::models::{
    DayStatus, FoodItem, MealAnalysis, MealId, MealRecord, NewMeal, NutritionSnapshot,
};

/// Meal and food item storage
#[async_trait]
pub trait MealStore: Send + Sync {
    /// Persist a meal and every food item of its analysis in one step
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    async fn save_meal_with_food_items(
        &self,
        meal: &NewMeal,
        analysis: &MealAnalysis,
    ) -> AppResult<MealId>;

    /// Food items saved with a meal, in detection order
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown meal id.
    async fn get_food_items_for_meal(&self, id: MealId) -> AppResult<Vec<FoodItem>>;

    /// Meals captured on `day` (UTC), ordered by capture time
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    async fn get_meals_for_day(&self, day: NaiveDate) -> AppResult<Vec<MealRecord>>;

    /// Captured and healthy meal counts for `day`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    async fn day_status(&self, day: NaiveDate) -> AppResult<DayStatus> {
        let meals = self.get_meals_for_day(day).await?;
        let healthy = meals.iter().filter(|meal| meal.is_healthy).count();
        Ok(DayStatus::new(meals.len(), healthy))
    }

    /// Today's snapshot: `base` with the totals and timeline of `day`'s meals
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    async fn day_snapshot(
        &self,
        day: NaiveDate,
        base: &NutritionSnapshot,
    ) -> AppResult<NutritionSnapshot> {
        let meals = self.get_meals_for_day(day).await?;
        Ok(roll_up_day(base, &meals))
    }
}

/// User preference storage
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// The configured API key, if any
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    async fn get_api_key(&self) -> AppResult<Option<String>>;

    /// Replace the API key
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    async fn set_api_key(&self, api_key: &str) -> AppResult<()>;
}
