// ABOUTME: Reconciles the phase-2 nutrition response against the ordered phase-1 label list
// ABOUTME: Exact map-shape match first, bidirectional-substring list-shape fallback second
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Metrics Reconciliation
//!
//! The batch nutrition query comes back in one of two shapes, chosen by the
//! model at random:
//!
//! 1. **Map shape**: `{"Rice": {...metrics}, "Chicken": {...metrics}}`.
//!    Every value must be a complete metrics record; a single bad value fails
//!    the whole decode. Labels match keys by case-insensitive equality.
//! 2. **List shape**: `{"items": [{"name": "...", ...metrics}]}` under one of
//!    three alias keys. Entry fields are all optional and default to zero.
//!    A label matches the first entry whose name contains it, or is
//!    contained by it, ignoring case.
//!
//! The list shape is tried only when the map decode fails outright. When
//! both fail every slot is [`MatchOutcome::Unmatched`]. Whatever happens,
//! the result has exactly one slot per input label, in input order.

use indexmap::IndexMap;
use meal_lens_core::models::FoodMetrics;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::text::strip_code_fences;

/// Which response shape produced the slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStrategy {
    /// Object keyed by food name
    MapShape,
    /// Object holding a named list of entries
    ListShape,
    /// Neither shape decoded
    Failed,
}

impl ReconcileStrategy {
    /// Name used in log fields
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MapShape => "map",
            Self::ListShape => "list",
            Self::Failed => "failed",
        }
    }
}

/// Outcome for one input label
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// A response entry was adopted for the label
    Matched {
        /// Map key or list entry name that matched
        matched_name: String,
        /// Metrics taken from that entry
        metrics: FoodMetrics,
    },
    /// No entry matched; the item keeps empty metrics
    Unmatched,
}

impl MatchOutcome {
    /// Metrics carried by the outcome
    #[must_use]
    pub const fn metrics(&self) -> Option<&FoodMetrics> {
        match self {
            Self::Matched { metrics, .. } => Some(metrics),
            Self::Unmatched => None,
        }
    }

    /// Consume into the optional metrics slot
    #[must_use]
    pub fn into_metrics(self) -> Option<FoodMetrics> {
        match self {
            Self::Matched { metrics, .. } => Some(metrics),
            Self::Unmatched => None,
        }
    }
}

/// Result of reconciling one response against a label list
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Shape that was decoded
    pub strategy: ReconcileStrategy,
    /// One outcome per input label, same order
    pub slots: Vec<MatchOutcome>,
}

impl Reconciliation {
    fn unmatched(strategy: ReconcileStrategy, label_count: usize) -> Self {
        Self {
            strategy,
            slots: vec![MatchOutcome::Unmatched; label_count],
        }
    }

    /// Number of labels that received metrics
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, MatchOutcome::Matched { .. }))
            .count()
    }

    /// Positional metrics slots
    #[must_use]
    pub fn into_metrics(self) -> Vec<Option<FoodMetrics>> {
        self.slots
            .into_iter()
            .map(MatchOutcome::into_metrics)
            .collect()
    }
}

/// One entry of the list-shape response; every field may be missing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ListEntry {
    name: Option<String>,
    calories: Option<i32>,
    protein: Option<f64>,
    fiber: Option<f64>,
    added_sugar: Option<f64>,
    saturated_fat: Option<f64>,
    sodium: Option<f64>,
    vegetable_content: Option<f64>,
    water: Option<f64>,
    processing_level: Option<i32>,
    is_healthy: Option<bool>,
}

impl ListEntry {
    fn to_metrics(&self) -> FoodMetrics {
        FoodMetrics {
            calories: self.calories.unwrap_or(0),
            protein: self.protein.unwrap_or(0.0),
            fiber: self.fiber.unwrap_or(0.0),
            added_sugar: self.added_sugar.unwrap_or(0.0),
            saturated_fat: self.saturated_fat.unwrap_or(0.0),
            sodium: self.sodium.unwrap_or(0.0),
            vegetable_content: self.vegetable_content.unwrap_or(0.0),
            water: self.water.unwrap_or(0.0),
            processing_level: self.processing_level.unwrap_or(0),
            is_healthy: self.is_healthy.unwrap_or(false),
        }
    }
}

/// List-shape envelope; the model picks one of these keys per response
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListResponse {
    #[serde(rename = "the food items")]
    the_food_items: Option<Vec<ListEntry>>,
    items: Option<Vec<ListEntry>>,
    food_items: Option<Vec<ListEntry>>,
}

impl ListResponse {
    /// First present alias in priority order
    fn into_entries(self) -> Vec<ListEntry> {
        self.the_food_items
            .or(self.items)
            .or(self.food_items)
            .unwrap_or_default()
    }
}

/// Phase-2 response reconciler
pub struct MetricsReconciler;

impl MetricsReconciler {
    /// Map each label, by position, to the metrics found for it in
    /// `response_text`. Never fails: undecodable text yields all-unmatched
    /// slots.
    #[must_use]
    pub fn reconcile<S: AsRef<str>>(labels: &[S], response_text: &str) -> Reconciliation {
        let cleaned = strip_code_fences(response_text);

        let map_error = match serde_json::from_str::<IndexMap<String, FoodMetrics>>(cleaned) {
            Ok(metrics_by_name) => return Self::match_map(labels, &metrics_by_name),
            Err(e) => e,
        };
        debug!(error = %map_error, "Map-shape decode failed, trying list shape");

        match serde_json::from_str::<ListResponse>(cleaned) {
            Ok(response) => Self::match_list(labels, &response.into_entries()),
            Err(list_error) => {
                warn!(
                    map_error = %map_error,
                    list_error = %list_error,
                    labels = labels.len(),
                    "Metrics response matched neither shape"
                );
                Reconciliation::unmatched(ReconcileStrategy::Failed, labels.len())
            }
        }
    }

    fn match_map<S: AsRef<str>>(
        labels: &[S],
        metrics_by_name: &IndexMap<String, FoodMetrics>,
    ) -> Reconciliation {
        let slots: Vec<MatchOutcome> = labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                metrics_by_name
                    .iter()
                    .find(|(name, _)| name.to_lowercase() == label.to_lowercase())
                    .map_or(MatchOutcome::Unmatched, |(name, metrics)| {
                        MatchOutcome::Matched {
                            matched_name: name.clone(),
                            metrics: metrics.clone(),
                        }
                    })
            })
            .collect();

        let reconciliation = Reconciliation {
            strategy: ReconcileStrategy::MapShape,
            slots,
        };
        Self::log_summary(&reconciliation, metrics_by_name.len());
        reconciliation
    }

    fn match_list<S: AsRef<str>>(labels: &[S], entries: &[ListEntry]) -> Reconciliation {
        let slots: Vec<MatchOutcome> = labels
            .iter()
            .map(|label| {
                let label_lower = label.as_ref().to_lowercase();
                entries
                    .iter()
                    .find_map(|entry| {
                        let name = entry.name.as_deref()?.trim();
                        // A blank name is a substring of every label; never let it match
                        if name.is_empty() {
                            return None;
                        }
                        let name_lower = name.to_lowercase();
                        (name_lower.contains(&label_lower) || label_lower.contains(&name_lower))
                            .then(|| MatchOutcome::Matched {
                                matched_name: name.to_owned(),
                                metrics: entry.to_metrics(),
                            })
                    })
                    .unwrap_or(MatchOutcome::Unmatched)
            })
            .collect();

        let reconciliation = Reconciliation {
            strategy: ReconcileStrategy::ListShape,
            slots,
        };
        Self::log_summary(&reconciliation, entries.len());
        reconciliation
    }

    fn log_summary(reconciliation: &Reconciliation, candidates: usize) {
        info!(
            strategy = reconciliation.strategy.as_str(),
            matched = reconciliation.matched_count(),
            labels = reconciliation.slots.len(),
            candidates,
            "Reconciled food metrics"
        );
    }
}
