// ABOUTME: Generation gate holding the snapshot and time of the last advice generation
// ABOUTME: Evaluates staleness and claims the gate in one critical section
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, FixedOffset};
use meal_lens_intelligence::{evaluate_staleness, AdviceContext, StalenessVerdict};

use crate::models::NutritionSnapshot;

/// Last advice generation context, shared by every controller that gates on it.
///
/// The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct AdviceSession {
    last: Mutex<Option<AdviceContext>>,
}

impl AdviceSession {
    /// Session with nothing generated yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `snapshot` and, when stale, record it as the new generation
    /// context before returning.
    ///
    /// Two callers racing on the same stale condition cannot both see it:
    /// the second evaluates against the context the first just wrote.
    pub fn claim_if_stale(
        &self,
        snapshot: &NutritionSnapshot,
        now: DateTime<FixedOffset>,
    ) -> StalenessVerdict {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let verdict = evaluate_staleness(last.as_ref(), snapshot, &now);
        if verdict.is_stale() {
            *last = Some(AdviceContext {
                snapshot: snapshot.clone(),
                generated_at: now,
            });
        }
        verdict
    }

    /// Copy of the last generation context
    #[must_use]
    pub fn last_context(&self) -> Option<AdviceContext> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the last generation so the next snapshot triggers
    pub fn reset(&self) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
