//! Turn model for the conversation log
//!
//! - Turn = one sender's message (user or agent)
//! - Log = append-only, capped at the most recent N turns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::EmotionLabel;
use crate::CONVERSATION_CAP;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    /// Stored as "bot" for compatibility with existing transcripts
    #[serde(rename = "bot", alias = "agent")]
    Agent,
}

impl Sender {
    /// Name shown next to a message
    pub fn display_name(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Agent => crate::AGENT_NAME,
        }
    }

    /// Avatar shown next to a message
    pub fn avatar(&self) -> &'static str {
        match self {
            Sender::User => "🧑‍🚀",
            Sender::Agent => "🤖",
        }
    }
}

/// A single immutable conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub sender: Sender,
    /// The text content
    #[serde(alias = "message")]
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Emotion attached when the turn was created
    #[serde(default)]
    pub emotion: EmotionLabel,
}

impl ConversationTurn {
    /// Create a new turn with current timestamp
    pub fn new(sender: Sender, text: impl Into<String>, emotion: EmotionLabel) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Utc::now(),
            emotion,
        }
    }

    pub fn user(text: impl Into<String>, emotion: EmotionLabel) -> Self {
        Self::new(Sender::User, text, emotion)
    }

    pub fn agent(text: impl Into<String>, emotion: EmotionLabel) -> Self {
        Self::new(Sender::Agent, text, emotion)
    }
}

/// Bounded conversation log - oldest turns are evicted past the cap
#[derive(Debug, Clone)]
pub struct ConversationLog {
    turns: VecDeque<ConversationTurn>,
    cap: usize,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    /// Create log with default cap (50)
    pub fn new() -> Self {
        Self::with_cap(CONVERSATION_CAP)
    }

    /// Create log with custom cap
    pub fn with_cap(cap: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(cap.min(1024)),
            cap: cap.max(1),
        }
    }

    /// Build a log from restored turns, keeping only the newest `cap`
    pub fn from_turns(turns: Vec<ConversationTurn>, cap: usize) -> Self {
        let mut log = Self::with_cap(cap);
        for turn in turns {
            log.push(turn);
        }
        log
    }

    /// Append a turn, evicting the oldest if over cap.
    /// Returns the evicted turn, if any.
    pub fn push(&mut self, turn: ConversationTurn) -> Option<ConversationTurn> {
        self.turns.push_back(turn);
        if self.turns.len() > self.cap {
            self.turns.pop_front()
        } else {
            None
        }
    }

    /// All turns, oldest first
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// The most recent `n` turns, oldest first
    pub fn recent(&self, n: usize) -> Vec<ConversationTurn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).cloned().collect()
    }

    /// Most recent turn
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Clear all turns
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Snapshot for persistence, oldest first
    pub fn to_vec(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
