// ABOUTME: Integration tests for the two-phase food image analysis pipeline
// ABOUTME: Drives FoodAnalysisService with scripted model replies and an in-memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::fs;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use common::{
    init_test_logging, jpeg_bytes, metrics_json, segmentation_reply, PromptKind,
    ScriptedInferenceClient,
};
use meal_lens::errors::{AnalysisError, AppError, ErrorCode};
use meal_lens::models::{MealType, NewMeal};
use meal_lens::persistence::{InMemoryMealStore, MealStore};
use meal_lens::services::FoodAnalysisService;

const MODEL: &str = "gemini-test";
const KEY: &str = "test-key";

fn service(client: &Arc<ScriptedInferenceClient>) -> FoodAnalysisService {
    FoodAnalysisService::new(client.clone(), MODEL)
}

fn two_item_client(metrics_reply: String) -> Arc<ScriptedInferenceClient> {
    Arc::new(ScriptedInferenceClient::new(move |kind, _| match kind {
        PromptKind::Segmentation => Ok(segmentation_reply(&["grilled chicken", "white rice"])),
        PromptKind::BatchMetrics => Ok(metrics_reply.clone()),
        other => panic!("unexpected prompt {other:?}"),
    }))
}

#[tokio::test]
async fn test_map_reply_resolves_every_item() {
    init_test_logging();
    let reply = format!(
        "```json\n{{\"grilled chicken\": {}, \"white rice\": {}}}\n```",
        metrics_json(250, 31.0, 1, true),
        metrics_json(200, 4.0, 2, true)
    );
    let client = two_item_client(reply);

    let analysis = service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap();

    assert_eq!(analysis.food_items.len(), 2);
    assert_eq!(analysis.food_items[0].label(), "grilled chicken");
    assert_eq!(analysis.food_items[1].label(), "white rice");
    assert_eq!(analysis.resolved_item_count(), 2);
    assert_eq!(analysis.total_calories, 450);
    assert!((analysis.total_protein - 35.0).abs() < f64::EPSILON);
    assert_eq!(analysis.average_processing_level, 1);
    assert!(analysis.is_healthy);
    assert!(analysis.ai_comment.starts_with("Excellent meal choice!"));
}

#[tokio::test]
async fn test_list_reply_matches_by_substring() {
    init_test_logging();
    let reply = r#"{"the food items": [
        {"name": "Rice", "calories": 200, "isHealthy": true},
        {"name": "Grilled chicken breast", "calories": 280, "protein": 30, "isHealthy": true}
    ]}"#
    .to_owned();
    let client = two_item_client(reply);

    let analysis = service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap();

    let chicken = analysis.food_items[0].metrics.as_ref().unwrap();
    assert_eq!(chicken.calories, 280);
    let rice = analysis.food_items[1].metrics.as_ref().unwrap();
    assert_eq!(rice.calories, 200);
    assert_eq!(analysis.total_calories, 480);
}

#[tokio::test]
async fn test_unmatched_item_keeps_empty_metrics() {
    init_test_logging();
    let reply = format!(
        "{{\"grilled chicken\": {}}}",
        metrics_json(250, 31.0, 1, true)
    );
    let client = two_item_client(reply);

    let analysis = service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap();

    assert!(analysis.food_items[0].metrics.is_some());
    assert!(analysis.food_items[1].metrics.is_none());
    assert_eq!(analysis.total_calories, 250);
    // unmatched items count toward the total, so 1 of 2 is below the ratio
    assert!(!analysis.is_healthy);
}

#[tokio::test]
async fn test_metrics_failure_keeps_detected_items() {
    init_test_logging();
    let client = Arc::new(ScriptedInferenceClient::new(|kind, _| match kind {
        PromptKind::Segmentation => Ok(segmentation_reply(&["salad", "bread"])),
        _ => Err(AppError::external_unavailable("Gemini", "connection reset")),
    }));

    let analysis = service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap();

    assert_eq!(analysis.food_items.len(), 2);
    assert_eq!(analysis.resolved_item_count(), 0);
    assert_eq!(analysis.total_calories, 0);
    assert!(!analysis.is_healthy);
    assert!(analysis.ai_comment.starts_with("This meal could be improved."));
}

#[tokio::test]
async fn test_unreadable_metrics_reply_keeps_detected_items() {
    init_test_logging();
    let client = two_item_client("I could not estimate these portions.".to_owned());

    let analysis = service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap();

    assert_eq!(analysis.food_items.len(), 2);
    assert_eq!(analysis.resolved_item_count(), 0);
}

#[tokio::test]
async fn test_blank_key_fails_before_any_request() {
    init_test_logging();
    let client = two_item_client(String::new());

    let err = service(&client)
        .analyze_food_image(&jpeg_bytes(), "   ")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::ConfigurationMissing));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_empty_image_is_rejected() {
    init_test_logging();
    let client = two_item_client(String::new());

    let err = service(&client)
        .analyze_food_image(&[], KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::ImageRead { .. }));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_segmentation_request_failure_is_network_failure() {
    init_test_logging();
    let client = Arc::new(ScriptedInferenceClient::new(|_, _| {
        Err(AppError::external_unavailable("Gemini", "timed out"))
    }));

    let err = service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::NetworkFailure(_)));
    assert_eq!(err.code(), ErrorCode::ExternalServiceUnavailable);
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn test_unparseable_segmentation_fails() {
    init_test_logging();
    let client = Arc::new(ScriptedInferenceClient::new(|_, _| {
        Ok("Sorry, I can't see any food here.".to_owned())
    }));

    let err = service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::SegmentationParseFailed { .. }));
    assert!(client.calls_of(PromptKind::BatchMetrics).is_empty());
}

#[tokio::test]
async fn test_empty_segmentation_is_no_food() {
    init_test_logging();
    let client = Arc::new(ScriptedInferenceClient::new(|_, _| Ok("[]".to_owned())));

    let err = service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::NoFoodDetected));
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn test_duplicate_labels_keep_one_slot_each() {
    init_test_logging();
    let client = Arc::new(ScriptedInferenceClient::new(|kind, _| match kind {
        PromptKind::Segmentation => Ok(segmentation_reply(&["dumpling", "dumpling"])),
        _ => Ok(format!("{{\"dumpling\": {}}}", metrics_json(60, 3.0, 3, false))),
    }));

    let analysis = service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap();

    assert_eq!(analysis.food_items.len(), 2);
    assert_eq!(analysis.resolved_item_count(), 2);
    assert_eq!(analysis.total_calories, 120);
    assert!(!analysis.is_healthy);
}

#[tokio::test]
async fn test_requests_carry_image_labels_and_model() {
    init_test_logging();
    let client = two_item_client("{}".to_owned());

    service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].kind, PromptKind::Segmentation);
    assert_eq!(calls[1].kind, PromptKind::BatchMetrics);
    assert!(calls.iter().all(|call| call.has_image));
    assert!(calls.iter().all(|call| call.model == MODEL && call.api_key == KEY));
    assert!(calls[1].prompt.contains("grilled chicken, white rice"));
}

#[tokio::test]
async fn test_metrics_prompt_asks_for_five_processing_levels() {
    init_test_logging();
    let client = two_item_client("{}".to_owned());

    service(&client)
        .analyze_food_image(&jpeg_bytes(), KEY)
        .await
        .unwrap();

    let batch = client.calls_of(PromptKind::BatchMetrics);
    assert_eq!(batch.len(), 1);
    let prompt = &batch[0].prompt;
    assert!(prompt.contains("processingLevel is an integer from 1 to 5"));
    assert!(prompt.contains("5 = ultra-processed"));
    assert!(!prompt.contains("to 4"));
}

#[tokio::test]
async fn test_missing_file_is_image_read_error() {
    init_test_logging();
    let client = two_item_client(String::new());
    let dir = tempfile::tempdir().unwrap();

    let err = service(&client)
        .analyze_image_file(&dir.path().join("missing.jpg"), KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::ImageRead { .. }));
}

#[tokio::test]
async fn test_image_file_is_analyzed() {
    init_test_logging();
    let client = two_item_client("{}".to_owned());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.jpg");
    fs::write(&path, jpeg_bytes()).unwrap();

    let analysis = service(&client)
        .analyze_image_file(&path, KEY)
        .await
        .unwrap();

    assert_eq!(analysis.food_items.len(), 2);
}

#[tokio::test]
async fn test_capture_meal_persists_items() {
    init_test_logging();
    let reply = format!(
        "{{\"grilled chicken\": {}, \"white rice\": {}}}",
        metrics_json(250, 31.0, 1, true),
        metrics_json(200, 4.0, 2, false)
    );
    let client = two_item_client(reply);
    let store = InMemoryMealStore::new();
    let captured_at = Utc::now();
    let meal = NewMeal {
        meal_type: MealType::Lunch,
        captured_at,
        image_uri: Some("file:///photos/lunch.jpg".to_owned()),
    };

    let (id, analysis) = service(&client)
        .capture_meal(&store, &meal, &jpeg_bytes(), KEY)
        .await
        .unwrap();

    assert_eq!(store.len(), 1);
    let items = store.get_food_items_for_meal(id).await.unwrap();
    assert_eq!(items, analysis.food_items);

    let day: NaiveDate = captured_at.date_naive();
    let meals = store.get_meals_for_day(day).await.unwrap();
    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0].calories, 450);
    assert_eq!(meals[0].meal_type, MealType::Lunch);
}

#[tokio::test]
async fn test_capture_meal_failure_stores_nothing() {
    init_test_logging();
    let client = Arc::new(ScriptedInferenceClient::new(|_, _| Ok("[]".to_owned())));
    let store = InMemoryMealStore::new();
    let meal = NewMeal {
        meal_type: MealType::Dinner,
        captured_at: Utc::now(),
        image_uri: None,
    };

    let err = service(&client)
        .capture_meal(&store, &meal, &jpeg_bytes(), KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::NoFoodDetected));
    assert!(store.is_empty());
}
