// ABOUTME: Core types and constants for the Meal Lens food analysis engine
// ABOUTME: Foundation crate with error handling, the meal data model, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

#![deny(unsafe_code)]

//! # Meal Lens Core
//!
//! Foundation crate providing shared types for the Meal Lens food analysis
//! engine. This crate is designed to change infrequently so the algorithm and
//! service crates above it can compile incrementally.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the
//!   analysis pipeline taxonomy `AnalysisError`
//! - **models**: Segmentation masks, food metrics, meal analyses, and
//!   nutrition-state snapshots
//! - **constants**: Thresholds and defaults shared across crates

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (segmentation, food metrics, meals, snapshots)
pub mod models;
