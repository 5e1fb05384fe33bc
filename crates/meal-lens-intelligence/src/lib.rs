// ABOUTME: Pure analysis algorithms for the Meal Lens food pipeline and advice controller
// ABOUTME: Parses model output, reconciles metrics to labels, aggregates meals, gates advice refresh
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

#![deny(unsafe_code)]

//! # Meal Lens Intelligence
//!
//! Everything in this crate is synchronous and side-effect free apart from
//! `tracing` events, so it can be exercised without a network or a runtime.
//!
//! ## Modules
//!
//! - **text**: cleanup of raw model text (code fences, surrounding prose)
//! - **segmentation**: phase-1 response parsing into segmentation masks
//! - **reconciler**: phase-2 response reconciliation against expected labels
//! - **aggregator**: meal-level totals, healthiness verdict, and comment
//! - **`key_metrics`**: goal-driven key-metrics view of a nutrition snapshot
//! - **`day_phase`**: clock-hour buckets and the meal type they suggest
//! - **staleness**: decision rule for regenerating cached coaching advice
//! - **`day_totals`**: roll-up of a day's meals into snapshot totals and warnings
//! - **`goal_plan`**: per-goal target metrics and daily target reply decoding

/// Raw model text cleanup
pub mod text;

/// Phase-1 segmentation response parsing
pub mod segmentation;

/// Phase-2 metrics reconciliation
pub mod reconciler;

/// Meal-level aggregation
pub mod aggregator;

/// Key-metrics derived view
pub mod key_metrics;

/// Day phase buckets
pub mod day_phase;

/// Advice staleness evaluation
pub mod staleness;

/// Daily totals and intake warnings
pub mod day_totals;

/// Daily goal plan support
pub mod goal_plan;

pub use aggregator::{meal_comment, MealAnalysisAggregator};
pub use day_phase::DayPhase;
pub use day_totals::{check_warnings, roll_up_day};
pub use goal_plan::{parse_goal_plan, target_metrics_for_goal};
pub use key_metrics::generate_key_metrics;
pub use reconciler::{MatchOutcome, MetricsReconciler, ReconcileStrategy, Reconciliation};
pub use segmentation::SegmentationParser;
pub use staleness::{evaluate_staleness, AdviceContext, StalenessReason, StalenessVerdict};
