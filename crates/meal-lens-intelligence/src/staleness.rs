// ABOUTME: Decides whether cached coaching advice is stale for a new nutrition snapshot
// ABOUTME: Compares key metrics, weight, meal count, and day phase against the last generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, FixedOffset};
use meal_lens_core::models::NutritionSnapshot;

use crate::day_phase::DayPhase;
use crate::key_metrics::generate_key_metrics;

/// The snapshot and time of the last advice generation
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceContext {
    /// Snapshot the advice was generated from
    pub snapshot: NutritionSnapshot,
    /// When generation was triggered
    pub generated_at: DateTime<FixedOffset>,
}

/// Why a snapshot makes the cached advice stale
#[derive(Debug, Clone, PartialEq)]
pub enum StalenessReason {
    /// Nothing has been generated yet in this process
    FirstRun,
    /// The key-metrics view differs by value
    KeyMetricsChanged,
    /// Body weight differs
    WeightChanged {
        /// Cached weight
        from: f64,
        /// New weight
        to: f64,
    },
    /// Number of meals logged today differs
    MealCountChanged {
        /// Cached count
        from: usize,
        /// New count
        to: usize,
    },
    /// The clock moved into another day phase since the last generation
    DayPhaseChanged {
        /// Phase at the last generation
        from: DayPhase,
        /// Phase now
        to: DayPhase,
    },
}

impl Display for StalenessReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::FirstRun => f.write_str("first_run"),
            Self::KeyMetricsChanged => f.write_str("key_metrics_changed"),
            Self::WeightChanged { from, to } => write!(f, "weight_changed({from} -> {to})"),
            Self::MealCountChanged { from, to } => write!(f, "meal_count_changed({from} -> {to})"),
            Self::DayPhaseChanged { from, to } => write!(f, "day_phase_changed({from} -> {to})"),
        }
    }
}

/// Result of a staleness check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StalenessVerdict {
    /// Every condition that fired; empty when the cache is fresh
    pub reasons: Vec<StalenessReason>,
}

impl StalenessVerdict {
    /// Whether a new generation should be triggered
    #[must_use]
    pub fn is_stale(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Comma-separated reasons for log fields
    #[must_use]
    pub fn summary(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Evaluate `snapshot` against the cached context at time `now`.
///
/// The day phase of the last generation is computed in `now`'s offset so a
/// cache written under another offset is still compared in local hours.
#[must_use]
pub fn evaluate_staleness(
    previous: Option<&AdviceContext>,
    snapshot: &NutritionSnapshot,
    now: &DateTime<FixedOffset>,
) -> StalenessVerdict {
    let Some(previous) = previous else {
        return StalenessVerdict {
            reasons: vec![StalenessReason::FirstRun],
        };
    };
    let cached = &previous.snapshot;
    let mut reasons = Vec::new();

    if generate_key_metrics(snapshot) != generate_key_metrics(cached) {
        reasons.push(StalenessReason::KeyMetricsChanged);
    }

    if (snapshot.current_weight - cached.current_weight).abs() > f64::EPSILON {
        reasons.push(StalenessReason::WeightChanged {
            from: cached.current_weight,
            to: snapshot.current_weight,
        });
    }

    if snapshot.meal_count() != cached.meal_count() {
        reasons.push(StalenessReason::MealCountChanged {
            from: cached.meal_count(),
            to: snapshot.meal_count(),
        });
    }

    let last_phase = DayPhase::of(&previous.generated_at.with_timezone(now.offset()));
    let current_phase = DayPhase::of(now);
    if last_phase != current_phase {
        reasons.push(StalenessReason::DayPhaseChanged {
            from: last_phase,
            to: current_phase,
        });
    }

    StalenessVerdict { reasons }
}
