// ABOUTME: Rolls a day's stored meal records up into the nutrition snapshot totals
// ABOUTME: Also derives the single intake warning shown next to those totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use meal_lens_core::constants::health::{
    HIGH_FAT_GRAMS, LOW_WATER_CALORIE_FLOOR, LOW_WATER_LITERS,
};
use meal_lens_core::models::{MealRecord, NutritionSnapshot, NutritionWarning};
use tracing::debug;

/// Warning for the snapshot's current totals.
///
/// Low water on a day past the calorie floor wins over high fat.
#[must_use]
pub fn check_warnings(snapshot: &NutritionSnapshot) -> Option<NutritionWarning> {
    if snapshot.water_intake_liters < LOW_WATER_LITERS
        && snapshot.current_calories > LOW_WATER_CALORIE_FLOOR
    {
        Some(NutritionWarning::LowWaterForIntake)
    } else if snapshot.fat > HIGH_FAT_GRAMS {
        Some(NutritionWarning::HighFat)
    } else {
        None
    }
}

/// Build today's snapshot from `base` and the day's meal records.
///
/// Meal-derived totals and the timeline are replaced by sums over `meals`,
/// so rolling up the same records twice gives the same snapshot. Weight,
/// water, carbs, fat, targets and goals are carried over from `base`.
#[must_use]
pub fn roll_up_day(base: &NutritionSnapshot, meals: &[MealRecord]) -> NutritionSnapshot {
    let mut snapshot = base.clone();

    snapshot.current_calories = meals.iter().map(|m| m.calories).sum();
    snapshot.protein = meals.iter().map(|m| m.protein).sum();
    snapshot.fiber = meals.iter().map(|m| m.fiber).sum();
    snapshot.added_sugar = meals.iter().map(|m| m.added_sugar).sum();
    snapshot.sodium = meals.iter().map(|m| m.sodium).sum();
    snapshot.saturated_fat = meals.iter().map(|m| m.saturated_fat).sum();
    snapshot.vegetable_content = meals.iter().map(|m| m.vegetable_content).sum();

    let mut timeline: Vec<_> = meals.iter().map(MealRecord::to_logged_meal).collect();
    timeline.sort_by_key(|meal| meal.captured_at);
    snapshot.daily_meals = timeline;

    snapshot.warning = check_warnings(&snapshot);
    debug!(
        meals = meals.len(),
        calories = snapshot.current_calories,
        warning = ?snapshot.warning,
        "Rolled up day totals"
    );
    snapshot
}
