// ABOUTME: Staleness-gated advice controller reacting to nutrition snapshots
// ABOUTME: Claims the session synchronously, then runs both coaching requests in the background
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use meal_lens_intelligence::{generate_key_metrics, DayPhase, StalenessReason};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::session::AdviceSession;
use super::store::{AdviceStore, MealSuggestion};
use crate::errors::{AppError, AppResult};
use crate::models::NutritionSnapshot;
use crate::persistence::PreferencesStore;
use crate::services::CoachingPromptService;

/// What happened to one advice slot during a generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The slot now holds fresh text
    Updated,
    /// The request failed; the previous value was kept
    Failed(String),
    /// No request was made
    Skipped,
}

/// Per-slot outcomes of one background generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Overall advice slot
    pub advice: SlotOutcome,
    /// Next-meal suggestion slot
    pub meal_suggestion: SlotOutcome,
}

impl GenerationReport {
    const fn skipped() -> Self {
        Self {
            advice: SlotOutcome::Skipped,
            meal_suggestion: SlotOutcome::Skipped,
        }
    }
}

/// Result of offering one snapshot to the controller
#[derive(Debug)]
pub enum RefreshDecision {
    /// Cached advice is still current
    Skipped,
    /// A generation was claimed and spawned
    Triggered {
        /// Conditions that made the cache stale
        reasons: Vec<StalenessReason>,
        /// Background generation; awaiting it is optional
        handle: JoinHandle<GenerationReport>,
    },
}

impl RefreshDecision {
    /// Whether a generation was started
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }
}

/// Decrements the in-flight counter when a generation ends, however it ends
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Turns snapshots into background advice generations
pub struct AdviceRefreshController {
    coaching: CoachingPromptService,
    preferences: Arc<dyn PreferencesStore>,
    session: Arc<AdviceSession>,
    store: Arc<AdviceStore>,
    clock: Arc<dyn Clock>,
    runtime: Handle,
    in_flight: Arc<AtomicUsize>,
}

impl AdviceRefreshController {
    /// Controller spawning onto the current Tokio runtime
    ///
    /// # Errors
    ///
    /// Returns an internal error when called outside a Tokio runtime.
    pub fn new(
        coaching: CoachingPromptService,
        preferences: Arc<dyn PreferencesStore>,
        session: Arc<AdviceSession>,
        store: Arc<AdviceStore>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            AppError::internal(format!("Advice controller needs a Tokio runtime: {e}"))
        })?;
        Ok(Self {
            coaching,
            preferences,
            session,
            store,
            clock,
            runtime,
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Advice slots this controller writes to
    #[must_use]
    pub fn store(&self) -> &Arc<AdviceStore> {
        &self.store
    }

    /// Generation gate this controller claims
    #[must_use]
    pub fn session(&self) -> &Arc<AdviceSession> {
        &self.session
    }

    /// Whether any background generation is still running
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Offer a snapshot; never blocks on the network.
    ///
    /// When the snapshot is stale the session is overwritten before this
    /// returns, so an identical snapshot offered immediately afterwards is
    /// skipped even though the requests have not finished.
    pub fn maybe_refresh_advice(&self, snapshot: &NutritionSnapshot) -> RefreshDecision {
        let now = self.clock.now();
        let verdict = self.session.claim_if_stale(snapshot, now);
        if !verdict.is_stale() {
            debug!("Advice is current, not regenerating");
            return RefreshDecision::Skipped;
        }
        info!(reasons = %verdict.summary(), "Advice is stale, generating");

        let guard = InFlightGuard::enter(&self.in_flight);
        let task = GenerationTask {
            coaching: self.coaching.clone(),
            preferences: Arc::clone(&self.preferences),
            store: Arc::clone(&self.store),
            snapshot: snapshot.clone(),
            now,
        };
        let handle = self.runtime.spawn(async move {
            let _guard = guard;
            task.run().await
        });

        RefreshDecision::Triggered {
            reasons: verdict.reasons,
            handle,
        }
    }

    /// Feed every snapshot from `snapshots` through [`Self::maybe_refresh_advice`]
    /// until the sender side closes. Returns the number of generations started.
    pub async fn consume_snapshots(
        &self,
        mut snapshots: mpsc::Receiver<NutritionSnapshot>,
    ) -> usize {
        let mut triggered = 0;
        while let Some(snapshot) = snapshots.recv().await {
            if self.maybe_refresh_advice(&snapshot).is_triggered() {
                triggered += 1;
            }
        }
        debug!(triggered, "Snapshot stream closed");
        triggered
    }
}

/// Everything one background generation needs, owned
struct GenerationTask {
    coaching: CoachingPromptService,
    preferences: Arc<dyn PreferencesStore>,
    store: Arc<AdviceStore>,
    snapshot: NutritionSnapshot,
    now: DateTime<FixedOffset>,
}

impl GenerationTask {
    async fn run(self) -> GenerationReport {
        let api_key = match self.preferences.get_api_key().await {
            Ok(Some(key)) if !key.trim().is_empty() => key,
            Ok(_) => {
                info!("No API key configured, skipping advice generation");
                return GenerationReport::skipped();
            }
            Err(e) => {
                warn!(error = %e, "Could not read API key, skipping advice generation");
                return GenerationReport::skipped();
            }
        };

        let key_metrics = generate_key_metrics(&self.snapshot);
        let context =
            CoachingPromptService::build_context(&self.snapshot, &key_metrics, &self.now);
        let meal_type = DayPhase::of(&self.now).suggested_meal_type();

        let (advice, suggestion) = tokio::join!(
            self.coaching.get_advice(&context, &api_key),
            self.coaching.get_meal_suggestion(&context, &api_key),
        );

        let advice = match advice {
            Ok(text) => {
                self.store.set_overall_advice(text);
                SlotOutcome::Updated
            }
            Err(e) => {
                warn!(error = %e, "Advice generation failed, keeping previous advice");
                SlotOutcome::Failed(e.to_string())
            }
        };

        let meal_suggestion = match suggestion {
            Ok(text) => {
                self.store
                    .set_next_meal_suggestion(MealSuggestion { meal_type, text });
                SlotOutcome::Updated
            }
            Err(e) => {
                warn!(error = %e, "Meal suggestion failed, keeping previous suggestion");
                SlotOutcome::Failed(e.to_string())
            }
        };

        info!(
            advice = ?advice,
            meal_suggestion = ?meal_suggestion,
            meal_type = %meal_type,
            "Advice generation finished"
        );
        GenerationReport {
            advice,
            meal_suggestion,
        }
    }
}
