//! Chat controller and the chat endpoint client
//!
//! Flow per message:
//! text → classify → append user turn → endpoint → append reply →
//! emotion history/trend → speech
//!
//! Current emotion comes from the local classifier. The endpoint's own
//! emotion field is logged and otherwise ignored.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;
use crate::core::classifier::EmotionClassifier;
use crate::core::history::{EmotionHistory, EmotionTrend};
use crate::core::speech::SpeechOutput;
use crate::core::store::ConversationStore;
use crate::types::{
    ChatRequest, ChatResponse, ConversationTurn, EmotionLabel, InteractionRecord, Insights, Notice,
    NoticeCode,
};
use crate::{CompanionError, RESTORE_RECENT};

/// Reply appended when the endpoint cannot be reached
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting right now. Please try again in a moment.";

// =============================================================================
// BACKEND
// =============================================================================

/// The remote chat endpoint
pub trait ChatBackend: Send + Sync {
    fn chat(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, CompanionError>> + Send;

    fn insights(&self) -> impl Future<Output = Result<Insights, CompanionError>> + Send;
}

/// JSON-over-HTTP chat endpoint
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpChatBackend {
    /// Client with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CompanionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CompanionError> {
        Self::new(config.endpoint.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map transport errors, giving timeouts their own variant
    fn transport(&self, e: reqwest::Error) -> CompanionError {
        if e.is_timeout() {
            CompanionError::Timeout(self.timeout.as_secs())
        } else {
            CompanionError::Http(e)
        }
    }

    /// Convert a non-success status into `Endpoint`
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CompanionError> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|e| self.transport(e))
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::BAD_REQUEST => tracing::debug!(%body, "endpoint rejected request"),
                _ => tracing::warn!(status = status.as_u16(), "endpoint error"),
            }
            Err(CompanionError::Endpoint {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Recent interactions recorded by the endpoint
    pub async fn history(&self) -> Result<Vec<InteractionRecord>, CompanionError> {
        let response = self
            .client
            .get(self.url("/api/conversation_history"))
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        self.handle_response(response).await
    }
}

impl ChatBackend for HttpChatBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, CompanionError> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        self.handle_response(response).await
    }

    async fn insights(&self) -> Result<Insights, CompanionError> {
        let response = self
            .client
            .get(self.url("/api/user_insights"))
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        self.handle_response(response).await
    }
}

// =============================================================================
// QUICK TOOLS
// =============================================================================

/// One-tap canned messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickTool {
    Stress,
    Anxious,
    Grounding,
    Emergency,
}

impl QuickTool {
    pub const ALL: [QuickTool; 4] = [
        QuickTool::Stress,
        QuickTool::Anxious,
        QuickTool::Grounding,
        QuickTool::Emergency,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            QuickTool::Stress => "stress",
            QuickTool::Anxious => "anxious",
            QuickTool::Grounding => "grounding",
            QuickTool::Emergency => "emergency",
        }
    }

    /// The user message the tool sends
    pub fn message(&self) -> &'static str {
        match self {
            QuickTool::Stress => "I'm feeling really stressed about colony life.",
            QuickTool::Anxious => "I'm feeling anxious and overwhelmed.",
            QuickTool::Grounding => "I need help staying grounded.",
            QuickTool::Emergency => "I need immediate help.",
        }
    }
}

impl FromStr for QuickTool {
    type Err = CompanionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        QuickTool::ALL
            .iter()
            .copied()
            .find(|t| t.id() == wanted)
            .ok_or_else(|| CompanionError::unknown("tool", wanted))
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Result of one `send_message`
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// Empty input; nothing happened
    Rejected,
    /// The endpoint replied
    Replied {
        reply: ConversationTurn,
        emotion: EmotionLabel,
        notices: Vec<Notice>,
    },
    /// Transport failure; the canned fallback reply was appended
    Fallback {
        reply: ConversationTurn,
        error: String,
    },
}

impl ChatOutcome {
    /// The agent turn to display, if any
    pub fn reply(&self) -> Option<&ConversationTurn> {
        match self {
            ChatOutcome::Rejected => None,
            ChatOutcome::Replied { reply, .. } | ChatOutcome::Fallback { reply, .. } => Some(reply),
        }
    }
}

/// Chat orchestration state for one session
pub struct ChatController<B: ChatBackend> {
    backend: B,
    store: ConversationStore,
    classifier: EmotionClassifier,
    current_emotion: EmotionLabel,
    history: EmotionHistory,
    trend: EmotionTrend,
    speech: SpeechOutput,
    /// Messages shown this session, counting the welcome
    message_count: u32,
    session_start: DateTime<Utc>,
}

impl<B: ChatBackend> ChatController<B> {
    pub fn new(backend: B, store: ConversationStore, speech: SpeechOutput) -> Self {
        Self {
            backend,
            store,
            classifier: EmotionClassifier::new(),
            current_emotion: EmotionLabel::default(),
            history: EmotionHistory::new(),
            trend: EmotionTrend::new(),
            speech,
            message_count: 1,
            session_start: Utc::now(),
        }
    }

    /// Send one user message
    pub async fn send_message(&mut self, text: &str) -> ChatOutcome {
        let text = text.trim();
        if text.is_empty() {
            return ChatOutcome::Rejected;
        }

        let reading = self.classifier.classify(text, self.current_emotion);
        self.store
            .append(ConversationTurn::user(text, reading.label));
        self.message_count += 1;

        let request = ChatRequest {
            message: text.to_string(),
            emotion: reading.label,
        };

        match self.backend.chat(&request).await {
            Ok(response) => {
                if response.emotion != reading.label {
                    tracing::debug!(
                        local = %reading.label,
                        remote = %response.emotion,
                        "endpoint emotion differs from local classification"
                    );
                }

                let reply = ConversationTurn::agent(response.response, reading.label);
                self.store.append(reply.clone());
                self.record_emotion(reading.label);

                let mut notices = Vec::new();
                if self.speech.is_enabled() {
                    if let Some(notice) = self.speech.speak(&reply.text) {
                        notices.push(notice);
                    }
                }
                if response.has_drug_mention {
                    notices.push(Notice::new(NoticeCode::N001_DRUG_SUPPORT));
                }

                ChatOutcome::Replied {
                    reply,
                    emotion: reading.label,
                    notices,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "chat request failed");
                let reply = ConversationTurn::agent(FALLBACK_REPLY, self.current_emotion);
                self.store.append(reply.clone());
                ChatOutcome::Fallback {
                    reply,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Send a quick tool's canned message
    pub async fn quick_tool(&mut self, tool: QuickTool) -> ChatOutcome {
        self.send_message(tool.message()).await
    }

    /// Reset the transcript to the welcome turn
    pub fn clear(&mut self) -> Notice {
        self.store.clear();
        self.message_count = 1;
        Notice::new(NoticeCode::N001_CHAT_CLEARED)
    }

    /// Flip and persist speech output
    pub fn toggle_speech(&mut self) -> Notice {
        self.speech.toggle()
    }

    /// Manual emotion selection
    pub fn set_emotion(&mut self, label: EmotionLabel) {
        self.record_emotion(label);
    }

    fn record_emotion(&mut self, label: EmotionLabel) {
        self.current_emotion = label;
        self.history.record(label);
        self.trend.push(label);
    }

    /// Latest insights from the endpoint
    pub async fn insights(&self) -> Result<Insights, CompanionError> {
        self.backend.insights().await
    }

    /// Turns replayed when a session resumes
    pub fn restored_turns(&self) -> Vec<ConversationTurn> {
        self.store.load_recent(RESTORE_RECENT)
    }

    pub fn current_emotion(&self) -> EmotionLabel {
        self.current_emotion
    }

    pub fn history(&self) -> &EmotionHistory {
        &self.history
    }

    pub fn trend(&self) -> &EmotionTrend {
        &self.trend
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech.is_enabled()
    }

    pub fn message_count(&self) -> u32 {
        self.message_count
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    /// Whole minutes since the session started
    pub fn session_minutes(&self) -> i64 {
        (Utc::now() - self.session_start).num_minutes()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::LocalCache;
    use crate::types::Sender;
    use std::sync::{Arc, Mutex};

    /// Echoes canned replies and records requests
    #[derive(Clone, Default)]
    struct MockBackend {
        fail: bool,
        drug: bool,
        requests: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl ChatBackend for MockBackend {
        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, CompanionError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(CompanionError::Timeout(20));
            }
            Ok(ChatResponse {
                response: format!("echo: {}", request.message),
                emotion: EmotionLabel::Surprise,
                has_drug_mention: self.drug,
                timestamp: None,
            })
        }

        async fn insights(&self) -> Result<Insights, CompanionError> {
            Ok(Insights::default())
        }
    }

    fn controller(backend: MockBackend) -> ChatController<MockBackend> {
        let cache = LocalCache::in_memory();
        ChatController::new(
            backend,
            ConversationStore::new(cache.clone()),
            SpeechOutput::load(None, cache),
        )
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let backend = MockBackend::default();
        let mut chat = controller(backend.clone());
        assert_eq!(chat.send_message("   ").await, ChatOutcome::Rejected);
        assert!(chat.store().is_empty());
        assert!(backend.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reply_appends_and_uses_local_emotion() {
        let backend = MockBackend::default();
        let mut chat = controller(backend.clone());
        chat.toggle_speech();

        let outcome = chat.send_message("I am so happy and excited today").await;
        match outcome {
            ChatOutcome::Replied { reply, emotion, notices } => {
                assert_eq!(reply.sender, Sender::Agent);
                assert_eq!(emotion, EmotionLabel::Happy);
                assert!(notices.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(chat.current_emotion(), EmotionLabel::Happy);
        assert_eq!(chat.store().len(), 2);
        assert_eq!(chat.message_count(), 2);
        assert_eq!(backend.requests.lock().unwrap()[0].emotion, EmotionLabel::Happy);
        assert_eq!(chat.history().len(), 1);
        assert_eq!(chat.trend().values(), vec![90]);
    }

    #[tokio::test]
    async fn test_transport_failure_appends_fallback_only() {
        let mut chat = controller(MockBackend {
            fail: true,
            ..Default::default()
        });
        chat.set_emotion(EmotionLabel::Sad);

        let outcome = chat.send_message("I feel happy").await;
        let reply = outcome.reply().unwrap();
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert!(matches!(outcome, ChatOutcome::Fallback { .. }));
        // emotion display untouched
        assert_eq!(chat.current_emotion(), EmotionLabel::Sad);
        assert_eq!(chat.history().len(), 1);
        assert_eq!(chat.store().len(), 2);
    }

    #[tokio::test]
    async fn test_drug_mention_raises_notice() {
        let mut chat = controller(MockBackend {
            drug: true,
            ..Default::default()
        });
        chat.toggle_speech();
        match chat.send_message("thinking about a relapse").await {
            ChatOutcome::Replied { notices, .. } => {
                assert!(notices.iter().any(|n| n.code == NoticeCode::N001_DRUG_SUPPORT));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_quick_tool_sends_canned_message() {
        let backend = MockBackend::default();
        let mut chat = controller(backend.clone());
        chat.quick_tool(QuickTool::Anxious).await;
        let sent = &backend.requests.lock().unwrap()[0];
        assert_eq!(sent.message, "I'm feeling anxious and overwhelmed.");
        assert_eq!(sent.emotion, EmotionLabel::Anxious);
    }

    #[tokio::test]
    async fn test_clear_resets_count() {
        let mut chat = controller(MockBackend::default());
        chat.send_message("hello").await;
        let notice = chat.clear();
        assert_eq!(notice.code, NoticeCode::N001_CHAT_CLEARED);
        assert_eq!(chat.message_count(), 1);
        assert_eq!(chat.store().len(), 1);
    }

    #[test]
    fn test_parse_quick_tool() {
        assert_eq!("Stress".parse::<QuickTool>().unwrap(), QuickTool::Stress);
        assert!("panic".parse::<QuickTool>().is_err());
    }
}
