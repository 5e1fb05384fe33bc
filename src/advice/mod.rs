// ABOUTME: Staleness-gated coaching advice: clock, generation gate, advice slots, controller
// ABOUTME: Turns a stream of nutrition snapshots into at most one generation per stale window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Advice Refresh
//!
//! Snapshots arrive whenever the underlying nutrition data changes, often
//! several in a burst. [`AdviceRefreshController`] evaluates each one against
//! the last generation context held by an [`AdviceSession`] and, when stale,
//! claims the session and spawns both coaching requests in the background.
//!
//! The claim (evaluate and overwrite) happens inside one critical section
//! before anything is spawned, so a burst of identical snapshots yields a
//! single generation.

/// Injected wall clock
pub mod clock;

/// Generation gate holding the last advice context
pub mod session;

/// Latest advice and suggestion slots
pub mod store;

/// Snapshot-driven refresh controller
pub mod controller;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{AdviceRefreshController, GenerationReport, RefreshDecision, SlotOutcome};
pub use session::AdviceSession;
pub use store::{AdviceStore, MealSuggestion};
