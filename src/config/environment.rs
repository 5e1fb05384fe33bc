// ABOUTME: Environment configuration for the Gemini client and the initial API key
// ABOUTME: Parses and validates timeouts, endpoint, and model from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

//! Environment-based configuration

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use tracing::info;

use crate::constants::env_config;
use crate::constants::inference::{
    DEFAULT_API_BASE, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::errors::{AppError, AppResult};

/// Settings for the generative language endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API base URL, without a trailing slash
    pub api_base: String,
    /// Model used for segmentation, nutrition, and coaching requests
    pub model: String,
    /// Overall bound on one request
    pub request_timeout: Duration,
    /// Bound on establishing the connection
    pub connect_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    /// Read from `MEAL_LENS_GEMINI_*` and timeout variables
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` when a timeout is not a positive integer or
    /// the base URL is not http(s).
    pub fn from_env() -> AppResult<Self> {
        let api_base = env_var_or(env_config::GEMINI_API_BASE, DEFAULT_API_BASE);
        let api_base = api_base.trim().trim_end_matches('/').to_owned();
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(AppError::config_invalid(format!(
                "{} must be an http(s) URL, got '{api_base}'",
                env_config::GEMINI_API_BASE
            )));
        }

        let model = env_var_or(env_config::GEMINI_MODEL, DEFAULT_MODEL)
            .trim()
            .to_owned();
        if model.is_empty() {
            return Err(AppError::config_invalid(format!(
                "{} must not be empty",
                env_config::GEMINI_MODEL
            )));
        }

        Ok(Self {
            api_base,
            model,
            request_timeout: timeout_secs(
                env_config::REQUEST_TIMEOUT_SECS,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            connect_timeout: timeout_secs(
                env_config::CONNECT_TIMEOUT_SECS,
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
        })
    }
}

/// Process configuration
#[derive(Clone, Default)]
pub struct MealLensConfig {
    /// Inference endpoint settings
    pub gemini: GeminiConfig,
    /// Key used to seed the preferences store, if provided
    pub initial_api_key: Option<String>,
}

impl MealLensConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but invalid.
    pub fn from_env() -> AppResult<Self> {
        let gemini = GeminiConfig::from_env()?;
        let initial_api_key = env::var(env_config::GEMINI_API_KEY)
            .ok()
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty());

        info!(
            api_base = %gemini.api_base,
            model = %gemini.model,
            request_timeout_secs = gemini.request_timeout.as_secs(),
            connect_timeout_secs = gemini.connect_timeout.as_secs(),
            api_key_present = initial_api_key.is_some(),
            "Loaded configuration from environment"
        );

        Ok(Self {
            gemini,
            initial_api_key,
        })
    }
}

impl Debug for MealLensConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MealLensConfig")
            .field("gemini", &self.gemini)
            .field(
                "initial_api_key",
                &self.initial_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn timeout_secs(key: &str, default: u64) -> AppResult<Duration> {
    let Ok(raw) = env::var(key) else {
        return Ok(Duration::from_secs(default));
    };
    let secs: u64 = raw.trim().parse().map_err(|e| {
        AppError::config_invalid(format!("{key} must be a whole number of seconds: {e}"))
    })?;
    if secs == 0 {
        return Err(AppError::config_invalid(format!(
            "{key} must be greater than zero"
        )));
    }
    Ok(Duration::from_secs(secs))
}
