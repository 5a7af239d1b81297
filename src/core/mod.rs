//! Core modules for Aurora

pub mod api;
pub mod cache;
pub mod chat;
pub mod classifier;
pub mod exercise;
pub mod grounding;
pub mod history;
pub mod insights;
pub mod resources;
pub mod responder;
pub mod session;
pub mod speech;
pub mod store;
pub mod timer;

pub use api::{create_router, create_router_with_state, run_server, AppState};
pub use cache::LocalCache;
pub use chat::{ChatBackend, ChatController, ChatOutcome, HttpChatBackend, QuickTool, FALLBACK_REPLY};
pub use classifier::EmotionClassifier;
pub use exercise::{transition, ExerciseEngine};
pub use grounding::{GroundingEngine, Practice};
pub use history::{EmotionHistory, EmotionTrend};
pub use insights::InsightsPoller;
pub use resources::ResourceLibrary;
pub use responder::Responder;
pub use session::{ExerciseSession, FrameReceiver};
pub use speech::{
    CommandSynthesizer, ListenState, SpeechInput, SpeechInputUpdate, SpeechOutput, SpeechRecognizer,
    SpeechSynthesizer,
};
pub use store::{ConversationStore, WELCOME_MESSAGE};
pub use timer::TimerGuard;
