// ABOUTME: Re-exports the unified error types from the core crate
// ABOUTME: Keeps `crate::errors` paths stable for the service and client modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Error Handling
//!
//! `AppError`/`ErrorCode` cover infrastructure failures (HTTP, configuration,
//! storage). `AnalysisError` is the food pipeline taxonomy; it converts into
//! `AppError` at outer boundaries.

pub use meal_lens_core::errors::{AnalysisError, AppError, AppResult, ErrorCode};
