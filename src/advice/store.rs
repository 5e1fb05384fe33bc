// ABOUTME: Latest overall advice and next-meal suggestion, updated independently
// ABOUTME: A slot is only replaced when its own generation succeeds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::models::MealType;

/// A next-meal suggestion and the meal it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSuggestion {
    /// Meal the suggestion was generated for
    pub meal_type: MealType,
    /// Cleaned suggestion text
    pub text: String,
}

/// Latest coaching output shown to the user
#[derive(Debug, Default)]
pub struct AdviceStore {
    overall_advice: RwLock<Option<String>>,
    next_meal: RwLock<Option<MealSuggestion>>,
}

impl AdviceStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest overall advice
    #[must_use]
    pub fn overall_advice(&self) -> Option<String> {
        self.overall_advice
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Latest next-meal suggestion
    #[must_use]
    pub fn next_meal_suggestion(&self) -> Option<MealSuggestion> {
        self.next_meal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Meal targeted by the latest suggestion
    #[must_use]
    pub fn suggested_meal_type(&self) -> Option<MealType> {
        self.next_meal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|suggestion| suggestion.meal_type)
    }

    /// Replace the overall advice
    pub fn set_overall_advice(&self, advice: String) {
        *self
            .overall_advice
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(advice);
    }

    /// Replace the next-meal suggestion
    pub fn set_next_meal_suggestion(&self, suggestion: MealSuggestion) {
        *self.next_meal.write().unwrap_or_else(PoisonError::into_inner) = Some(suggestion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_independent() {
        let store = AdviceStore::new();
        store.set_overall_advice("Keep going".to_owned());
        assert_eq!(store.overall_advice().as_deref(), Some("Keep going"));
        assert!(store.next_meal_suggestion().is_none());
        assert!(store.suggested_meal_type().is_none());

        store.set_next_meal_suggestion(MealSuggestion {
            meal_type: MealType::Dinner,
            text: "Salmon and greens".to_owned(),
        });
        assert_eq!(store.suggested_meal_type(), Some(MealType::Dinner));
        assert_eq!(store.overall_advice().as_deref(), Some("Keep going"));
    }
}
