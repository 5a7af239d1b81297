//! Aurora: wellness companion core
//!
//! Chat with emotion tracking, breathing and grounding exercises,
//! speech I/O adapters and static wellness content.
//!
//! Flow: text → EmotionClassifier → ChatController → remote endpoint →
//! ConversationStore. Exercises run independently on their own ticker.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::CompanionError;

// =============================================================================
// CONVERSATION LIMITS
// =============================================================================

/// Maximum number of turns kept in the persisted conversation log
pub const CONVERSATION_CAP: usize = 50;

/// Number of turns replayed when a session restores its history
pub const RESTORE_RECENT: usize = 10;

/// Entries kept in the rolling emotion history display
pub const EMOTION_HISTORY_LEN: usize = 5;

/// Points kept in the emotion trend chart
pub const EMOTION_TREND_LEN: usize = 10;

// =============================================================================
// TIMING
// =============================================================================

/// Exercise display tick (milliseconds)
pub const EXERCISE_TICK_MS: u64 = 1000;

/// Insights polling interval (seconds)
pub const INSIGHTS_POLL_SECS: u64 = 30;

/// Default timeout for one chat request (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

// =============================================================================
// SPEECH
// =============================================================================

/// Minimum words in a final transcript for it to be auto-sent
pub const AUTO_SEND_MIN_WORDS: usize = 3;

/// Greeting keywords that trigger auto-send
pub const AUTO_SEND_GREETINGS: [&str; 3] = ["hello", "hi", "hey"];

/// Entries kept in the speech usage log
pub const SPEECH_USAGE_CAP: usize = 50;

/// Entries kept in the resource usage log
pub const RESOURCE_USAGE_CAP: usize = 100;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Default remote chat endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Name the companion speaks as
pub const AGENT_NAME: &str = "Dr. Aurora";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.1.0";
