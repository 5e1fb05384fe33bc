// ABOUTME: Meal Lens CLI - analyze a food photo or refresh coaching advice from a snapshot
// ABOUTME: Thin wrapper over the library services; configuration comes from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors
//!
//! Usage:
//! ```bash
//! # Analyze a photo and print the meal analysis as JSON
//! GEMINI_API_KEY=... meal-lens analyze lunch.jpg
//!
//! # Generate advice and a next-meal suggestion for a nutrition snapshot
//! GEMINI_API_KEY=... meal-lens advise snapshot.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use meal_lens::advice::{
    AdviceRefreshController, AdviceSession, AdviceStore, GenerationReport, RefreshDecision,
    SlotOutcome, SystemClock,
};
use meal_lens::config::MealLensConfig;
use meal_lens::llm::{GeminiClient, InferenceClient};
use meal_lens::logging;
use meal_lens::models::NutritionSnapshot;
use meal_lens::persistence::{InMemoryPreferences, PreferencesStore};
use meal_lens::services::{CoachingPromptService, FoodAnalysisService};
use serde_json::json;
use tokio::fs;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "meal-lens",
    about = "Meal Lens food photo analysis and nutrition coaching",
    long_about = "Analyzes food photos with a two-phase Gemini pipeline and generates coaching advice from nutrition snapshots."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API key override (defaults to GEMINI_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a food photo and print the meal analysis as JSON
    Analyze {
        /// Path to a JPEG, PNG, WEBP, or GIF image
        image: PathBuf,
    },

    /// Run one advice refresh for a nutrition snapshot JSON file
    Advise {
        /// Path to a snapshot JSON document
        snapshot: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_from_env()?;

    let config = MealLensConfig::from_env()?;
    let api_key = cli.api_key.clone().or_else(|| config.initial_api_key.clone());
    let client: Arc<dyn InferenceClient> = Arc::new(GeminiClient::new(&config.gemini)?);

    match cli.command {
        Command::Analyze { image } => {
            let service = FoodAnalysisService::new(client, config.gemini.model.clone());
            let api_key = api_key.unwrap_or_default();
            let analysis = service.analyze_image_file(&image, &api_key).await?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Command::Advise { snapshot } => {
            let raw = fs::read_to_string(&snapshot)
                .await
                .map_err(|e| anyhow!("Failed to read {}: {e}", snapshot.display()))?;
            let snapshot: NutritionSnapshot = serde_json::from_str(&raw)?;

            let preferences = InMemoryPreferences::default();
            if let Some(key) = api_key {
                preferences.set_api_key(&key).await?;
            }
            let controller = AdviceRefreshController::new(
                CoachingPromptService::new(client, config.gemini.model.clone()),
                Arc::new(preferences),
                Arc::new(AdviceSession::new()),
                Arc::new(AdviceStore::new()),
                Arc::new(SystemClock),
            )?;

            let report = match controller.maybe_refresh_advice(&snapshot) {
                RefreshDecision::Triggered { reasons, handle } => {
                    info!(count = reasons.len(), "Advice refresh triggered");
                    handle.await?
                }
                RefreshDecision::Skipped => GenerationReport {
                    advice: SlotOutcome::Skipped,
                    meal_suggestion: SlotOutcome::Skipped,
                },
            };

            let store = controller.store();
            let output = json!({
                "overallAdvice": store.overall_advice(),
                "nextMealSuggestion": store.next_meal_suggestion(),
                "advice": format!("{:?}", report.advice),
                "mealSuggestion": format!("{:?}", report.meal_suggestion),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
