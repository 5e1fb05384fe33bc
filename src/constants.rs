// ABOUTME: Application constants plus the environment variable names read at startup
// ABOUTME: Shared thresholds and defaults come from the core crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! # Constants Module
//!
//! Domain thresholds and inference defaults live in `meal_lens_core` and are
//! re-exported here; this module adds the environment variable names used by
//! the configuration and logging layers.

pub use meal_lens_core::constants::{health, inference, segmentation, service_names};

/// Environment variable names
pub mod env_config {
    /// Base URL of the generative language API
    pub const GEMINI_API_BASE: &str = "MEAL_LENS_GEMINI_API_BASE";

    /// Model identifier used for every request
    pub const GEMINI_MODEL: &str = "MEAL_LENS_GEMINI_MODEL";

    /// Overall request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "MEAL_LENS_REQUEST_TIMEOUT_SECS";

    /// Connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: &str = "MEAL_LENS_CONNECT_TIMEOUT_SECS";

    /// API key seeded into the preferences store
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

    /// Log filter directive
    pub const RUST_LOG: &str = "RUST_LOG";

    /// `json`, `compact`, or anything else for pretty output
    pub const LOG_FORMAT: &str = "LOG_FORMAT";

    /// Include file and line in log lines
    pub const LOG_INCLUDE_LOCATION: &str = "LOG_INCLUDE_LOCATION";

    /// Service name attached to startup logs
    pub const SERVICE_NAME: &str = "SERVICE_NAME";
}
