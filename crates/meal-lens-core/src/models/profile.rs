// ABOUTME: User profile fields that drive personalized daily goal generation
// ABOUTME: Body metrics, activity level, goals, and dietary context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Self-reported daily activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityLevel {
    /// Mostly sitting
    #[default]
    Sedentary,
    /// Light exercise one to three days a week
    LightlyActive,
    /// Moderate exercise most days
    Active,
    /// Hard exercise or physical job
    VeryActive,
}

impl ActivityLevel {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary",
            Self::LightlyActive => "Lightly Active",
            Self::Active => "Active",
            Self::VeryActive => "Very Active",
        }
    }
}

impl Display for ActivityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Everything the goal planner knows about the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Free-text sex
    pub sex: String,
    /// Age in years
    pub age: u32,
    /// Height (cm)
    pub height_cm: f64,
    /// Weight (kg)
    pub weight_kg: f64,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Primary goal ("Weight loss", "Heart health", ...)
    pub primary_goal: String,
    /// Goal intensity ("Gentle", "Moderate", ...)
    pub intensity: String,
    /// Secondary focus areas
    pub secondary_goals: Vec<String>,
    /// Known health conditions
    pub health_conditions: Vec<String>,
    /// Dietary pattern ("Vegetarian", "No restrictions", ...)
    pub dietary_pattern: String,
    /// Current medications, free text
    pub medications: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            sex: String::new(),
            age: 30,
            height_cm: 170.0,
            weight_kg: 60.0,
            activity_level: ActivityLevel::default(),
            primary_goal: String::new(),
            intensity: String::new(),
            secondary_goals: Vec::new(),
            health_conditions: Vec::new(),
            dietary_pattern: String::new(),
            medications: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_decodes_with_missing_fields() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"age": 41, "activity_level": "VERY_ACTIVE", "primary_goal": "Heart health"}"#,
        )
        .unwrap();
        assert_eq!(profile.age, 41);
        assert_eq!(profile.activity_level.label(), "Very Active");
        assert!((profile.height_cm - 170.0).abs() < f64::EPSILON);
        assert!(profile.health_conditions.is_empty());
    }
}
