//! Conversation store: bounded transcript persisted to the local cache
//!
//! Key invariant: the persisted log never exceeds `CONVERSATION_CAP` turns.
//! Persistence is best-effort; a failed write is logged and the in-memory
//! log stays authoritative.

use crate::core::cache::{LocalCache, KEY_CONVERSATION};
use crate::types::{ConversationLog, ConversationTurn, EmotionLabel, Sender};
use crate::CONVERSATION_CAP;

/// Greeting pushed after the log is cleared
pub const WELCOME_MESSAGE: &str = "Hello! I'm Dr. Aurora, your AI mental health companion. \
I'm here to support you through your journey in the Saturn colonies. How are you feeling today?";

/// Append-only, capped conversation log
#[derive(Debug, Clone)]
pub struct ConversationStore {
    log: ConversationLog,
    cache: LocalCache,
}

impl ConversationStore {
    /// Empty store writing to `cache`
    pub fn new(cache: LocalCache) -> Self {
        Self {
            log: ConversationLog::with_cap(CONVERSATION_CAP),
            cache,
        }
    }

    /// Restore from the cache; corrupt or missing data starts empty
    pub fn load(cache: LocalCache) -> Self {
        let turns: Vec<ConversationTurn> = match cache.get(KEY_CONVERSATION) {
            Some(turns) => turns,
            None => {
                tracing::debug!("no conversation history found");
                Vec::new()
            }
        };
        Self {
            log: ConversationLog::from_turns(turns, CONVERSATION_CAP),
            cache,
        }
    }

    /// Append a turn, evicting the oldest past the cap
    pub fn append(&mut self, turn: ConversationTurn) {
        if let Some(evicted) = self.log.push(turn) {
            tracing::trace!(timestamp = %evicted.timestamp, "evicted oldest turn");
        }
        self.persist();
    }

    /// Reset to a single welcome turn
    pub fn clear(&mut self) {
        self.log.clear();
        self.log
            .push(ConversationTurn::agent(WELCOME_MESSAGE, EmotionLabel::Neutral));
        self.persist();
    }

    /// The most recent `n` turns, oldest first
    pub fn load_recent(&self, n: usize) -> Vec<ConversationTurn> {
        self.log.recent(n)
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.log.turns()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.log.last()
    }

    /// Newest turn the user sent, as stored with its classified emotion
    pub fn last_user_turn(&self) -> Option<&ConversationTurn> {
        self.turns().filter(|t| t.sender == Sender::User).last()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.cache.set(KEY_CONVERSATION, &self.log.to_vec()) {
            tracing::warn!(error = %e, "failed to persist conversation");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
