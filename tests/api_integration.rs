//! Integration tests for the companion HTTP API

use aurora::core::{create_router, create_router_with_state, AppState};
use aurora::types::{EmotionLabel, InteractionRecord, Insights};
use aurora::CONVERSATION_CAP;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn post_chat(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router();
    let json = get_json(&app, "/health").await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["interactions"], 0);
}

#[tokio::test]
async fn test_chat_reply_shape() {
    let app = create_router();
    let (status, json) = post_chat(&app, json!({"message": "thank you so much", "emotion": "Happy"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["response"].as_str().unwrap().starts_with("You're very welcome"));
    assert_eq!(json["emotion"], "Happy");
    assert_eq!(json["has_drug_mention"], false);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_empty_message_is_400() {
    let app = create_router();
    let (status, json) = post_chat(&app, json!({"message": "  ", "emotion": "Sad"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"error": "Empty message"}));
}

#[tokio::test]
async fn test_missing_emotion_defaults_neutral() {
    let app = create_router();
    let (status, json) = post_chat(&app, json!({"message": "the rings look bright"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["emotion"], "Neutral");
}

#[tokio::test]
async fn test_insights_over_recorded_chats() {
    let state = Arc::new(AppState::default());
    let app = create_router_with_state(state.clone());

    post_chat(&app, json!({"message": "abcd", "emotion": "Sad"})).await;
    post_chat(&app, json!({"message": "my pills", "emotion": "Anxious"})).await;
    post_chat(&app, json!({"message": "ab", "emotion": "Sad"})).await;

    let insights: Insights = serde_json::from_value(get_json(&app, "/api/user_insights").await).unwrap();
    assert_eq!(insights.total_interactions, 3);
    assert_eq!(insights.most_common_emotion, EmotionLabel::Sad);
    assert_eq!(insights.recent_drug_mentions, 1);
    assert_eq!(insights.emotion_distribution[&EmotionLabel::Sad], 2);
    assert!((insights.avg_message_length - 4.7).abs() < 1e-9);
    assert_eq!(state.records.read().await.len(), 3);
}

#[tokio::test]
async fn test_history_newest_first_and_capped() {
    let app = create_router();
    for i in 0..(CONVERSATION_CAP + 5) {
        post_chat(&app, json!({"message": format!("note {}", i), "emotion": "Neutral"})).await;
    }

    let history: Vec<InteractionRecord> =
        serde_json::from_value(get_json(&app, "/api/conversation_history").await).unwrap();
    assert_eq!(history.len(), CONVERSATION_CAP);
    assert_eq!(history[0].user_input, format!("note {}", CONVERSATION_CAP + 4));
    assert_eq!(history.last().unwrap().user_input, "note 5");
}
