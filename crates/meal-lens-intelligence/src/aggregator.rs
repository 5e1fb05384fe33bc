// ABOUTME: Reduces a list of food items into meal-level totals and a healthiness verdict
// ABOUTME: Also produces the deterministic rule-based meal comment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use meal_lens_core::constants::health::HEALTHY_RATIO_THRESHOLD;
use meal_lens_core::models::{FoodItem, FoodMetrics, MealAnalysis};

/// Meal-level aggregator
pub struct MealAnalysisAggregator;

impl MealAnalysisAggregator {
    /// Build a fresh [`MealAnalysis`] from food items.
    ///
    /// Items without metrics contribute zero to every total but still count
    /// toward the item total, so unmatched items pull the healthy ratio down.
    #[must_use]
    pub fn aggregate(food_items: Vec<FoodItem>) -> MealAnalysis {
        let total_f64 = |field: fn(&FoodMetrics) -> f64| -> f64 {
            food_items
                .iter()
                .filter_map(|item| item.metrics.as_ref())
                .map(field)
                .sum()
        };

        let total_calories = total_calories(&food_items);
        let total_protein = total_f64(|m| m.protein);
        let total_fiber = total_f64(|m| m.fiber);
        let total_added_sugar = total_f64(|m| m.added_sugar);
        let total_saturated_fat = total_f64(|m| m.saturated_fat);
        let total_sodium = total_f64(|m| m.sodium);
        let total_vegetable_content = total_f64(|m| m.vegetable_content);
        let total_water = total_f64(|m| m.water);

        let average_processing_level = if food_items.is_empty() {
            0
        } else {
            let sum: i64 = food_items
                .iter()
                .map(|item| item.metrics.as_ref().map_or(0, |m| i64::from(m.processing_level)))
                .sum();
            let count = i64::try_from(food_items.len()).unwrap_or(i64::MAX);
            (sum / count) as i32
        };

        let ai_comment = meal_comment(&food_items);
        let is_healthy = is_healthy_ratio(healthy_count(&food_items), food_items.len());

        MealAnalysis {
            food_items,
            total_calories,
            total_protein,
            total_fiber,
            total_added_sugar,
            total_saturated_fat,
            total_sodium,
            total_vegetable_content,
            total_water,
            average_processing_level,
            is_healthy,
            ai_comment,
        }
    }
}

/// Rule-based comment shown with a meal.
///
/// Wording is chosen by the healthy ratio: every item healthy, at least 67%
/// healthy, or anything less. An empty item list gets the "could be
/// improved" wording.
#[must_use]
pub fn meal_comment(food_items: &[FoodItem]) -> String {
    let healthy = healthy_count(food_items);
    let total = food_items.len();
    let calories = total_calories(food_items);

    if total > 0 && healthy == total {
        "Excellent meal choice! All items are nutritious and well-balanced.".to_owned()
    } else if is_healthy_ratio(healthy, total) {
        let protein: f64 = food_items
            .iter()
            .filter_map(|item| item.metrics.as_ref())
            .map(|m| m.protein)
            .sum();
        format!(
            "Good meal overall with {healthy} out of {total} healthy items. Total: {calories}cal, {}g protein.",
            format_decimal(protein)
        )
    } else {
        format!(
            "This meal could be improved. Consider adding more vegetables and reducing processed foods. Total: {calories}cal."
        )
    }
}

fn healthy_count(food_items: &[FoodItem]) -> usize {
    food_items.iter().filter(|item| item.is_healthy()).count()
}

fn total_calories(food_items: &[FoodItem]) -> i32 {
    food_items
        .iter()
        .filter_map(|item| item.metrics.as_ref())
        .fold(0_i32, |acc, m| acc.saturating_add(m.calories))
}

fn is_healthy_ratio(healthy: usize, total: usize) -> bool {
    total > 0 && healthy as f64 >= total as f64 * HEALTHY_RATIO_THRESHOLD
}

/// Decimal rendering that always shows a fractional part ("40.0", "12.5")
fn format_decimal(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meal_lens_core::models::SegmentationMask;

    fn item(label: &str, calories: i32, protein: f64, level: i32, healthy: bool) -> FoodItem {
        FoodItem::new(
            SegmentationMask {
                bounding_box: [0, 0, 100, 100],
                mask: None,
                label: label.to_owned(),
            },
            Some(FoodMetrics {
                calories,
                protein,
                fiber: 1.0,
                added_sugar: 0.5,
                saturated_fat: 0.25,
                sodium: 100.0,
                vegetable_content: 10.0,
                water: 20.0,
                processing_level: level,
                is_healthy: healthy,
            }),
        )
    }

    fn unmatched(label: &str) -> FoodItem {
        FoodItem::new(
            SegmentationMask {
                bounding_box: [0, 0, 100, 100],
                mask: None,
                label: label.to_owned(),
            },
            None,
        )
    }

    #[test]
    fn test_totals_and_truncated_average() {
        let analysis = MealAnalysisAggregator::aggregate(vec![
            item("rice", 200, 4.0, 1, true),
            item("chicken", 300, 30.5, 2, true),
            unmatched("sauce"),
        ]);

        assert_eq!(analysis.total_calories, 500);
        assert!((analysis.total_protein - 34.5).abs() < f64::EPSILON);
        assert!((analysis.total_sodium - 200.0).abs() < f64::EPSILON);
        // (1 + 2 + 0) / 3 truncates to 1
        assert_eq!(analysis.average_processing_level, 1);
        // 2 of 3 healthy is just under 67%
        assert!(!analysis.is_healthy);
        assert_eq!(analysis.resolved_item_count(), 2);
    }

    #[test]
    fn test_all_unmatched_degrades_to_zero() {
        let analysis = MealAnalysisAggregator::aggregate(vec![unmatched("a"), unmatched("b")]);
        assert_eq!(analysis.total_calories, 0);
        assert_eq!(analysis.average_processing_level, 0);
        assert!(!analysis.is_healthy);
        assert!(analysis.ai_comment.starts_with("This meal could be improved."));
    }

    #[test]
    fn test_empty_meal() {
        let analysis = MealAnalysisAggregator::aggregate(Vec::new());
        assert_eq!(analysis.average_processing_level, 0);
        assert!(!analysis.is_healthy);
        assert_eq!(
            analysis.ai_comment,
            "This meal could be improved. Consider adding more vegetables and reducing processed foods. Total: 0cal."
        );
    }

    #[test]
    fn test_comment_wording() {
        let all = vec![item("a", 100, 5.0, 1, true), item("b", 100, 5.0, 1, true)];
        assert_eq!(
            meal_comment(&all),
            "Excellent meal choice! All items are nutritious and well-balanced."
        );

        let mostly = vec![
            item("a", 100, 10.0, 1, true),
            item("b", 150, 20.0, 1, true),
            item("c", 200, 10.5, 1, true),
            item("d", 50, 0.0, 4, false),
        ];
        assert_eq!(
            meal_comment(&mostly),
            "Good meal overall with 3 out of 4 healthy items. Total: 500cal, 40.5g protein."
        );

        let round = vec![
            item("a", 100, 20.0, 1, true),
            item("b", 100, 20.0, 1, true),
            item("c", 100, 0.0, 1, true),
            item("d", 100, 0.0, 1, false),
        ];
        assert!(meal_comment(&round).ends_with("Total: 400cal, 40.0g protein."));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let items = vec![item("rice", 200, 4.0, 1, true), unmatched("sauce")];
        let first = MealAnalysisAggregator::aggregate(items.clone());
        let second = MealAnalysisAggregator::aggregate(items);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
