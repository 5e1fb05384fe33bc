// ABOUTME: Meal records, identifiers, meal types, and per-day completion status
// ABOUTME: Shapes exchanged with the persistence store and carried in nutrition snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::food::MealAnalysis;
use crate::constants::health::{HEALTHY_RATIO_THRESHOLD, MEALS_PER_COMPLETE_DAY};

/// Meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Anything in between
    Snack,
}

impl MealType {
    /// Upper-case name used in prompts and storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "BREAKFAST",
            Self::Lunch => "LUNCH",
            Self::Dinner => "DINNER",
            Self::Snack => "SNACK",
        }
    }

    /// Title-case name shown next to a meal suggestion
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }
}

impl Display for MealType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Identifier assigned by the meal store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealId(pub Uuid);

impl MealId {
    /// Fresh random identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MealId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MealId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// A meal about to be captured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMeal {
    /// Slot the meal belongs to
    pub meal_type: MealType,
    /// Capture time
    pub captured_at: DateTime<Utc>,
    /// Where the photo lives, if kept
    pub image_uri: Option<String>,
}

/// A stored meal with its summarized analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    /// Store-assigned identifier
    pub id: MealId,
    /// Slot the meal belongs to
    pub meal_type: MealType,
    /// Capture time
    pub captured_at: DateTime<Utc>,
    /// Where the photo lives, if kept
    pub image_uri: Option<String>,
    /// Meal kcal
    pub calories: i32,
    /// Meal protein (g)
    pub protein: f64,
    /// Meal fiber (g)
    pub fiber: f64,
    /// Meal added sugar (g)
    pub added_sugar: f64,
    /// Meal saturated fat (g)
    pub saturated_fat: f64,
    /// Meal sodium (mg)
    pub sodium: f64,
    /// Meal vegetable content (g)
    pub vegetable_content: f64,
    /// Meal water (ml)
    pub water: f64,
    /// Rule-based comment
    pub ai_comment: String,
    /// Meal verdict
    pub is_healthy: bool,
}

impl MealRecord {
    /// Summarize an analysis into a storable record
    #[must_use]
    pub fn from_analysis(id: MealId, meal: &NewMeal, analysis: &MealAnalysis) -> Self {
        Self {
            id,
            meal_type: meal.meal_type,
            captured_at: meal.captured_at,
            image_uri: meal.image_uri.clone(),
            calories: analysis.total_calories,
            protein: analysis.total_protein,
            fiber: analysis.total_fiber,
            added_sugar: analysis.total_added_sugar,
            saturated_fat: analysis.total_saturated_fat,
            sodium: analysis.total_sodium,
            vegetable_content: analysis.total_vegetable_content,
            water: analysis.total_water,
            ai_comment: analysis.ai_comment.clone(),
            is_healthy: analysis.is_healthy,
        }
    }

    /// Calendar day (UTC) the meal belongs to
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.captured_at.date_naive()
    }

    /// Timeline entry for snapshots
    #[must_use]
    pub fn to_logged_meal(&self) -> LoggedMeal {
        LoggedMeal {
            meal_type: self.meal_type,
            captured_at: self.captured_at,
            calories: Some(self.calories),
        }
    }
}

/// A meal as it appears in a nutrition snapshot timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedMeal {
    /// Slot the meal belongs to
    pub meal_type: MealType,
    /// Capture time
    pub captured_at: DateTime<Utc>,
    /// Meal kcal, absent when not analyzed
    pub calories: Option<i32>,
}

/// Captured/healthy meal counts for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    /// Captured meals
    pub total_meals: usize,
    /// Captured meals judged healthy
    pub healthy_meals: usize,
    /// Enough meals captured to call the day complete
    pub is_complete: bool,
}

impl DayStatus {
    /// Build from counts
    #[must_use]
    pub const fn new(total_meals: usize, healthy_meals: usize) -> Self {
        Self {
            total_meals,
            healthy_meals,
            is_complete: total_meals >= MEALS_PER_COMPLETE_DAY,
        }
    }

    /// Same 67% rule as a single meal
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.total_meals > 0
            && self.healthy_meals as f64 >= self.total_meals as f64 * HEALTHY_RATIO_THRESHOLD
    }
}
