// ABOUTME: Configuration module for the inference client and process startup
// ABOUTME: All settings come from environment variables with documented defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! Configuration module for Meal Lens
//!
//! - **Environment**: typed configuration read from environment variables
//!   (`MealLensConfig`, `GeminiConfig`)

/// Environment-based configuration
pub mod environment;

pub use environment::{GeminiConfig, MealLensConfig};
