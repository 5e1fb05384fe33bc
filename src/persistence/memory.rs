// ABOUTME: In-memory meal and preference stores backed by concurrent maps
// ABOUTME: Used by the CLI and tests; contents are lost when the process exits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{MealStore, PreferencesStore};
use crate::errors::{AppError, AppResult};
use crate::models::{FoodItem, MealAnalysis, MealId, MealRecord, NewMeal};

#[derive(Debug, Clone)]
struct StoredMeal {
    record: MealRecord,
    food_items: Vec<FoodItem>,
}

/// Meal store keyed by meal id
///
/// `DashMap` gives sharded locking so concurrent captures do not serialize
/// on a single lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMealStore {
    meals: Arc<DashMap<MealId, StoredMeal>>,
}

impl InMemoryMealStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored meals
    #[must_use]
    pub fn len(&self) -> usize {
        self.meals.len()
    }

    /// Whether nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

#[async_trait]
impl MealStore for InMemoryMealStore {
    async fn save_meal_with_food_items(
        &self,
        meal: &NewMeal,
        analysis: &MealAnalysis,
    ) -> AppResult<MealId> {
        let id = MealId::new();
        let record = MealRecord::from_analysis(id, meal, analysis);
        self.meals.insert(
            id,
            StoredMeal {
                record,
                food_items: analysis.food_items.clone(),
            },
        );
        debug!(meal_id = %id, items = analysis.food_items.len(), "Stored meal");
        Ok(id)
    }

    async fn get_food_items_for_meal(&self, id: MealId) -> AppResult<Vec<FoodItem>> {
        self.meals
            .get(&id)
            .map(|entry| entry.food_items.clone())
            .ok_or_else(|| AppError::not_found(format!("Meal {id}")))
    }

    async fn get_meals_for_day(&self, day: NaiveDate) -> AppResult<Vec<MealRecord>> {
        let mut meals: Vec<MealRecord> = self
            .meals
            .iter()
            .filter(|entry| entry.record.day() == day)
            .map(|entry| entry.record.clone())
            .collect();
        meals.sort_by_key(|meal| meal.captured_at);
        Ok(meals)
    }
}

/// Preferences held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferences {
    api_key: Arc<RwLock<Option<String>>>,
}

impl InMemoryPreferences {
    /// Preferences seeded with an optional API key
    #[must_use]
    pub fn with_api_key(api_key: Option<String>) -> Self {
        Self {
            api_key: Arc::new(RwLock::new(api_key)),
        }
    }
}

#[async_trait]
impl PreferencesStore for InMemoryPreferences {
    async fn get_api_key(&self) -> AppResult<Option<String>> {
        Ok(self.api_key.read().await.clone())
    }

    async fn set_api_key(&self, api_key: &str) -> AppResult<()> {
        *self.api_key.write().await = Some(api_key.to_owned());
        Ok(())
    }
}
