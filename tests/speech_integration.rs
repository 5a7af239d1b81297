//! Integration tests for the speech adapters
//!
//! Tests the path: recognizer events → SpeechInput → ChatController →
//! SpeechOutput, with scripted platform services

use aurora::core::cache::{KEY_SPEECH_PREFS, KEY_SPEECH_USAGE};
use aurora::core::{
    ChatBackend, ChatController, ConversationStore, ListenState, LocalCache, SpeechInput,
    SpeechInputUpdate, SpeechOutput, SpeechRecognizer, SpeechSynthesizer,
};
use aurora::types::{
    ChatRequest, ChatResponse, EmotionLabel, Insights, NoticeCode, RecognitionError,
    RecognizerEvent, SpeechPrefs, SpeechUsage, VoiceOptions,
};
use aurora::{CompanionError, SPEECH_USAGE_CAP};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }
    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct ScriptedSynth(Log);

impl SpeechSynthesizer for ScriptedSynth {
    fn speak(&mut self, text: &str, _voice: &VoiceOptions) -> Result<(), CompanionError> {
        self.0.push(format!("speak {}", text));
        Ok(())
    }
    fn cancel(&mut self) {
        self.0.push("cancel".into());
    }
    fn is_speaking(&mut self) -> bool {
        false
    }
}

struct ScriptedRecognizer {
    log: Log,
    deny: bool,
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&mut self) -> Result<(), CompanionError> {
        if self.deny {
            return Err(CompanionError::SpeechPermission("not-allowed".into()));
        }
        self.log.push("start".into());
        Ok(())
    }
    fn stop(&mut self) {
        self.log.push("stop".into());
    }
}

struct Echo;

impl ChatBackend for Echo {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, CompanionError> {
        Ok(ChatResponse {
            response: format!("heard: {}", request.message),
            emotion: request.emotion,
            has_drug_mention: false,
            timestamp: None,
        })
    }

    async fn insights(&self) -> Result<Insights, CompanionError> {
        Ok(Insights::default())
    }
}

#[tokio::test]
async fn test_spoken_message_round_trip() {
    let cache = LocalCache::in_memory();
    let log = Log::default();
    let mut mic = SpeechInput::new(
        Some(Box::new(ScriptedRecognizer { log: log.clone(), deny: false })),
        cache.clone(),
    );
    let speech = SpeechOutput::load(Some(Box::new(ScriptedSynth(log.clone()))), cache.clone());
    let mut chat = ChatController::new(Echo, ConversationStore::new(cache.clone()), speech);

    assert_eq!(mic.toggle().unwrap(), ListenState::Listening);
    mic.handle_event(RecognizerEvent::Started);
    assert_eq!(
        mic.handle_event(RecognizerEvent::Interim("I am".into())),
        SpeechInputUpdate::Input("I am".into())
    );
    let update = mic.handle_event(RecognizerEvent::Final("I am really scared".into()));
    let SpeechInputUpdate::Transcript { text, auto_send: true } = update else {
        panic!("expected an auto-sent transcript, got {:?}", update);
    };
    mic.handle_event(RecognizerEvent::Ended);
    assert_eq!(mic.state(), ListenState::Idle);

    chat.send_message(&text).await;
    mic.clear_input();
    assert!(mic.input().is_empty());
    assert_eq!(chat.current_emotion(), EmotionLabel::Anxious);

    assert_eq!(
        log.entries(),
        vec!["start", "cancel", "speak heard: I am really scared"]
    );

    let usage: Vec<SpeechUsage> = cache.get(KEY_SPEECH_USAGE).unwrap();
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].transcript, "I am really scared");
}

#[test]
fn test_short_transcript_waits_for_send() {
    let mut mic = SpeechInput::new(
        Some(Box::new(ScriptedRecognizer { log: Log::default(), deny: false })),
        LocalCache::in_memory(),
    );
    mic.toggle().unwrap();
    for (said, expected) in [("not sure", false), ("hi", true), ("why?", true), ("maybe later", false), ("this", true)] {
        match mic.handle_event(RecognizerEvent::Final(said.into())) {
            SpeechInputUpdate::Transcript { auto_send, .. } => assert_eq!(auto_send, expected, "{}", said),
            other => panic!("unexpected {:?}", other),
        }
    }
}

#[test]
fn test_usage_log_capped() {
    let cache = LocalCache::in_memory();
    let mut mic = SpeechInput::new(
        Some(Box::new(ScriptedRecognizer { log: Log::default(), deny: false })),
        cache.clone(),
    );
    for i in 0..(SPEECH_USAGE_CAP + 3) {
        mic.handle_event(RecognizerEvent::Final(format!("phrase {}", i)));
    }
    let usage: Vec<SpeechUsage> = cache.get(KEY_SPEECH_USAGE).unwrap();
    assert_eq!(usage.len(), SPEECH_USAGE_CAP);
    assert_eq!(usage[0].transcript, "phrase 3");
}

#[test]
fn test_denied_and_unsupported_notices_differ() {
    let mut denied = SpeechInput::new(
        Some(Box::new(ScriptedRecognizer { log: Log::default(), deny: true })),
        LocalCache::in_memory(),
    );
    let mut missing = SpeechInput::new(None, LocalCache::in_memory());

    let denied = denied.toggle().unwrap_err();
    let missing = missing.toggle().unwrap_err();
    assert_eq!(denied.code, NoticeCode::N002_MICROPHONE_DENIED);
    assert_eq!(missing.code, NoticeCode::N002_RECOGNITION_UNSUPPORTED);
    assert_ne!(denied.message, missing.message);
}

#[test]
fn test_mid_session_permission_error() {
    let log = Log::default();
    let mut mic = SpeechInput::new(
        Some(Box::new(ScriptedRecognizer { log: log.clone(), deny: false })),
        LocalCache::in_memory(),
    );
    mic.toggle().unwrap();
    match mic.handle_event(RecognizerEvent::Error(RecognitionError::NotAllowed)) {
        SpeechInputUpdate::Notice(notice) => assert_eq!(notice.code, NoticeCode::N002_MICROPHONE_DENIED),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(mic.state(), ListenState::Idle);
}

#[tokio::test]
async fn test_speech_toggle_persists_across_sessions() {
    let cache = LocalCache::in_memory();
    let log = Log::default();
    let mut chat = ChatController::new(
        Echo,
        ConversationStore::new(cache.clone()),
        SpeechOutput::load(Some(Box::new(ScriptedSynth(log.clone()))), cache.clone()),
    );
    assert_eq!(chat.toggle_speech().code, NoticeCode::N002_SPEECH_DISABLED);
    chat.send_message("hello").await;
    assert!(!log.entries().iter().any(|e| e.starts_with("speak")));

    let prefs: SpeechPrefs = cache.get(KEY_SPEECH_PREFS).unwrap();
    assert!(!prefs.speech_enabled);
    assert!(!SpeechOutput::load(None, cache).is_enabled());
}
