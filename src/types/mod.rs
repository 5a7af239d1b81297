//! Core types for Aurora

mod chat;
mod emotion;
mod exercise;
mod grounding;
mod output;
mod reason;
mod resources;
mod signals;
mod speech;
mod turn;

pub use chat::{ChatRequest, ChatResponse, ErrorBody, Insights, InteractionRecord};
pub use emotion::EmotionLabel;
pub use exercise::{
    ExerciseDefinition, ExerciseEvent, ExerciseRunState, ExerciseStatus, Stage, Technique,
    VisualAction,
};
pub use grounding::{GroundingRunState, GroundingStep, GroundingView, PracticePhase, GROUNDING_STEPS};
pub use output::{format_mm_ss, ExerciseFrame};
pub use reason::{Notice, NoticeCode, NoticeKind};
pub use resources::{
    BreathingGuide, CopingStrategy, MediaResource, ResourcePrefs, ResourceTab, ResourceUsage,
    StrategyKind, TipCategory,
};
pub use signals::{EmotionReading, EmotionScores};
pub use speech::{RecognitionError, RecognizerEvent, SpeechPrefs, SpeechUsage, VoiceOptions};
pub use turn::{ConversationLog, ConversationTurn, Sender};
