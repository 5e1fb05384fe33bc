// ABOUTME: Shared test utilities for Meal Lens integration tests
// ABOUTME: Provides quiet logging, a scripted inference client, and snapshot builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `meal_lens`

use std::env;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use meal_lens::errors::{AppError, AppResult};
use meal_lens::llm::prompts::{
    ADVICE_PROMPT, DAILY_TARGET_PROMPT, MEAL_SUGGESTION_PROMPT, SEGMENTATION_PROMPT,
};
use meal_lens::llm::{InferenceClient, InferenceRequest};
use meal_lens::models::{LoggedMeal, MealType, NutritionSnapshot};
use tokio::sync::Semaphore;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Which prompt a request carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Segmentation,
    BatchMetrics,
    Advice,
    MealSuggestion,
    GoalPlan,
    Other,
}

fn template_head(template: &str) -> &str {
    template.split("{{").next().unwrap_or(template)
}

impl PromptKind {
    pub fn of(request: &InferenceRequest) -> Self {
        let prompt = request.prompt.as_str();
        if prompt == SEGMENTATION_PROMPT {
            Self::Segmentation
        } else if prompt.starts_with("Analyze the nutritional content") {
            Self::BatchMetrics
        } else if prompt.starts_with(template_head(ADVICE_PROMPT)) {
            Self::Advice
        } else if prompt.starts_with(template_head(MEAL_SUGGESTION_PROMPT)) {
            Self::MealSuggestion
        } else if prompt.starts_with(template_head(DAILY_TARGET_PROMPT)) {
            Self::GoalPlan
        } else {
            Self::Other
        }
    }
}

/// A request as the scripted client saw it
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: PromptKind,
    pub prompt: String,
    pub api_key: String,
    pub model: String,
    pub has_image: bool,
}

type Handler = dyn Fn(PromptKind, &InferenceRequest) -> AppResult<String> + Send + Sync;

/// Inference client answering from a handler instead of the network.
///
/// With a gate installed every call waits for a permit, which lets tests
/// observe state while requests are still in flight.
pub struct ScriptedInferenceClient {
    handler: Box<Handler>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedInferenceClient {
    pub fn new(
        handler: impl Fn(PromptKind, &InferenceRequest) -> AppResult<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Calls block until `gate` hands out a permit
    #[must_use]
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, kind: PromptKind) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.kind == kind)
            .collect()
    }
}

#[async_trait]
impl InferenceClient for ScriptedInferenceClient {
    async fn generate_content(&self, request: &InferenceRequest) -> AppResult<String> {
        let kind = PromptKind::of(request);
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            prompt: request.prompt.clone(),
            api_key: request.api_key.clone(),
            model: request.model.clone(),
            has_image: request.has_image(),
        });

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;
            permit.forget();
        }

        (self.handler)(kind, request)
    }
}

/// Nutrition record JSON in the model's camelCase shape
pub fn metrics_json(calories: i32, protein: f64, processing_level: i32, healthy: bool) -> String {
    format!(
        r#"{{"calories": {calories}, "protein": {protein}, "fiber": 2, "addedSugar": 0, "saturatedFat": 1, "sodium": 50, "vegetableContent": 0, "water": 60, "processingLevel": {processing_level}, "isHealthy": {healthy}}}"#
    )
}

/// Segmentation reply for `labels`, wrapped in a code fence like the model does
pub fn segmentation_reply(labels: &[&str]) -> String {
    let entries: Vec<String> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let top = i * 100;
            format!(
                r#"{{"box_2d": [{top}, 100, {}, 400], "mask": "data:image/png;base64,iVBORw0KGgo=", "label": "{label}"}}"#,
                top + 90
            )
        })
        .collect();
    format!("```json\n[{}]\n```", entries.join(", "))
}

/// Timestamp helper
pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

/// Snapshot with one logged meal
pub fn snapshot_with_meal(meal_type: MealType, captured_at: &str, calories: i32) -> NutritionSnapshot {
    NutritionSnapshot {
        current_calories: calories,
        primary_goal: "Lose weight".to_owned(),
        daily_meals: vec![LoggedMeal {
            meal_type,
            captured_at: at(captured_at).to_utc(),
            calories: Some(calories),
        }],
        ..NutritionSnapshot::default()
    }
}

/// A tiny JPEG-looking payload
pub fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']
}
