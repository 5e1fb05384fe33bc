// ABOUTME: Domain service layer for food image analysis, coaching prompts, and goal plans
// ABOUTME: Orchestrates remote inference calls around the pure algorithms crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! Domain service layer
//!
//! Services own an [`InferenceClient`](crate::llm::InferenceClient) and turn
//! model text into domain values with the algorithms in
//! `meal_lens_intelligence`. They hold no mutable state of their own.

/// Two-phase food image analysis and meal capture
pub mod food_analysis;

/// Coaching context building, advice, and next-meal suggestions
pub mod coaching;

/// Personalized daily goal plan generation
pub mod goal_plan;

pub use coaching::CoachingPromptService;
pub use food_analysis::FoodAnalysisService;
pub use goal_plan::GoalPlanService;
