//! HTTP API for the companion endpoint
//!
//! Endpoints:
//! - POST /api/chat - Reply to a message
//! - GET /api/user_insights - Aggregate emotion statistics
//! - GET /api/conversation_history - Latest 50 interactions, newest first
//! - GET /health - Health check

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::responder::{has_drug_mention, Responder};
use crate::types::{ChatRequest, ChatResponse, EmotionLabel, ErrorBody, InteractionRecord, Insights};
use crate::{CompanionError, CONVERSATION_CAP};

/// Flagged records counted by `recent_drug_mentions`
pub const RECENT_DRUG_WINDOW: usize = 5;

/// App state
#[derive(Debug, Default)]
pub struct AppState {
    /// Interactions, oldest first
    pub records: RwLock<Vec<InteractionRecord>>,
    pub responder: Responder,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub interactions: usize,
}

/// 400 with a JSON error body
fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Create the API router
pub fn create_router() -> Router {
    create_router_with_state(Arc::new(AppState::default()))
}

/// Router over existing state (tests inspect the records)
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/user_insights", get(user_insights))
        .route("/api/conversation_history", get(conversation_history))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let records = state.records.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        interactions: records.len(),
    })
}

/// Reply to one message
async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    let message = req.message.trim();
    if message.is_empty() {
        return bad_request("Empty message");
    }

    let reply = {
        let mut rng = rand::thread_rng();
        state.responder.respond(message, req.emotion, &mut rng).to_string()
    };
    let drug_mention = has_drug_mention(message);
    let now = Utc::now();

    let record = InteractionRecord {
        emotion: req.emotion,
        timestamp: now,
        user_input: message.to_string(),
        ai_response: reply.clone(),
        drug_mention,
    };
    state.records.write().await.push(record);
    tracing::debug!(emotion = %req.emotion, drug_mention, "chat reply generated");

    Json(ChatResponse {
        response: reply,
        emotion: req.emotion,
        has_drug_mention: drug_mention,
        timestamp: Some(now),
    })
    .into_response()
}

/// Aggregate statistics over all records
pub fn compute_insights(records: &[InteractionRecord]) -> Insights {
    let mut distribution: HashMap<EmotionLabel, u64> = HashMap::new();
    for r in records {
        *distribution.entry(r.emotion).or_default() += 1;
    }

    // ties go to enumeration order
    let most_common = EmotionLabel::ALL
        .iter()
        .copied()
        .filter(|l| distribution.contains_key(l))
        .fold(None::<(EmotionLabel, u64)>, |best, label| {
            let count = distribution[&label];
            match best {
                Some((_, c)) if c >= count => best,
                _ => Some((label, count)),
            }
        })
        .map(|(label, _)| label)
        .unwrap_or_default();

    let avg = if records.is_empty() {
        0.0
    } else {
        let total: usize = records.iter().map(|r| r.user_input.chars().count()).sum();
        (total as f64 / records.len() as f64 * 10.0).round() / 10.0
    };

    let recent_drug_mentions = records
        .iter()
        .rev()
        .filter(|r| r.drug_mention)
        .take(RECENT_DRUG_WINDOW)
        .count() as u64;

    Insights {
        most_common_emotion: most_common,
        total_interactions: records.len() as u64,
        recent_drug_mentions,
        emotion_distribution: distribution,
        avg_message_length: avg,
    }
}

async fn user_insights(State(state): State<Arc<AppState>>) -> Json<Insights> {
    let records = state.records.read().await;
    Json(compute_insights(&records))
}

async fn conversation_history(State(state): State<Arc<AppState>>) -> Json<Vec<InteractionRecord>> {
    let records = state.records.read().await;
    Json(records.iter().rev().take(CONVERSATION_CAP).cloned().collect())
}

/// Run the API server
pub async fn run_server(addr: SocketAddr) -> Result<(), CompanionError> {
    let router = create_router();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CompanionError::Server(format!("bind {}: {}", addr, e)))?;
    tracing::info!(%addr, "companion endpoint listening");
    println!("Aurora endpoint running on {}", addr);
    println!("  POST /api/chat                 - Chat reply");
    println!("  GET  /api/user_insights        - Insights");
    println!("  GET  /api/conversation_history - History");
    println!("  GET  /health                   - Health check");
    axum::serve(listener, router)
        .await
        .map_err(|e| CompanionError::Server(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(emotion: EmotionLabel, input: &str, drug: bool) -> InteractionRecord {
        InteractionRecord {
            emotion,
            timestamp: Utc::now(),
            user_input: input.to_string(),
            ai_response: String::new(),
            drug_mention: drug,
        }
    }

    #[test]
    fn test_empty_insights_default_neutral() {
        let insights = compute_insights(&[]);
        assert_eq!(insights.most_common_emotion, EmotionLabel::Neutral);
        assert_eq!(insights.total_interactions, 0);
        assert_eq!(insights.avg_message_length, 0.0);
    }

    #[test]
    fn test_insights_aggregation() {
        let records = vec![
            record(EmotionLabel::Sad, "abcd", false),
            record(EmotionLabel::Happy, "ab", true),
            record(EmotionLabel::Sad, "abc", false),
        ];
        let insights = compute_insights(&records);
        assert_eq!(insights.most_common_emotion, EmotionLabel::Sad);
        assert_eq!(insights.emotion_distribution[&EmotionLabel::Sad], 2);
        assert_eq!(insights.recent_drug_mentions, 1);
        assert_eq!(insights.avg_message_length, 3.0);
    }

    #[test]
    fn test_recent_drug_mentions_capped() {
        let records: Vec<_> = (0..8).map(|_| record(EmotionLabel::Neutral, "pill", true)).collect();
        assert_eq!(compute_insights(&records).recent_drug_mentions, RECENT_DRUG_WINDOW as u64);
    }
}
