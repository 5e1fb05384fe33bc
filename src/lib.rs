// ABOUTME: Main library entry point for the Meal Lens food analysis and coaching engine
// ABOUTME: Wires the remote inference client, analysis services, advice controller, and stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

#![deny(unsafe_code)]

//! # Meal Lens
//!
//! Two-phase AI analysis of food photos plus staleness-gated nutrition
//! coaching.
//!
//! ## Features
//!
//! - **Food analysis**: segmentation masks first, then one batched nutrition
//!   request reconciled back onto the detected labels
//! - **Graceful degradation**: nutrition failures leave items without
//!   metrics instead of losing the capture
//! - **Advice refresh**: a snapshot stream triggers at most one coaching
//!   generation per stale window
//! - **Daily goals**: a profile-driven plan whose metrics become the
//!   snapshot's key metrics, and day totals rolled up from stored meals
//!
//! ## Architecture
//!
//! - **`meal_lens_core`**: errors, data model, constants
//! - **`meal_lens_intelligence`**: pure parsing, reconciliation, aggregation,
//!   key metrics, and staleness rules
//! - **this crate**: the Gemini client, prompts, services, advice controller,
//!   persistence traits, configuration, and logging
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use meal_lens::config::MealLensConfig;
//! use meal_lens::errors::AppError;
//! use meal_lens::llm::GeminiClient;
//! use meal_lens::services::FoodAnalysisService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = MealLensConfig::from_env()?;
//!     let client = Arc::new(GeminiClient::new(&config.gemini)?);
//!     let service = FoodAnalysisService::new(client, config.gemini.model.clone());
//!
//!     let image = std::fs::read("lunch.jpg").map_err(|e| AppError::invalid_input(e.to_string()))?;
//!     let analysis = service
//!         .analyze_food_image(&image, config.initial_api_key.as_deref().unwrap_or_default())
//!         .await?;
//!     println!("{} kcal", analysis.total_calories);
//!     Ok(())
//! }
//! ```

/// Staleness-gated coaching advice refresh
pub mod advice;

/// Environment-based configuration
pub mod config;

/// Application constants and environment variable names
pub mod constants;

/// Unified error handling
pub mod errors;

/// Remote inference client and prompt templates
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Data model re-exports
pub mod models;

/// Meal and preference storage contracts
pub mod persistence;

/// Food analysis and coaching services
pub mod services;
