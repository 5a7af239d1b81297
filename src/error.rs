//! Crate error type
//!
//! No variant is fatal to a session: callers degrade the single feature
//! that failed and keep the rest of the companion usable.

use thiserror::Error;

/// Errors raised by the companion core
#[derive(Debug, Error)]
pub enum CompanionError {
    /// Transport failure talking to the chat endpoint
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Endpoint error ({status}): {body}")]
    Endpoint { status: u16, body: String },

    /// The endpoint did not answer in time
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Local cache I/O
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Local cache or wire (de)serialization
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Speech platform service missing
    #[error("Speech {0} is not supported on this platform")]
    SpeechUnsupported(&'static str),

    /// Speech platform refused access
    #[error("Speech permission denied: {0}")]
    SpeechPermission(String),

    /// Speech device or engine failure
    #[error("Speech error: {0}")]
    Speech(String),

    /// Companion server failed to bind or serve
    #[error("Server error: {0}")]
    Server(String),

    /// Exercise or practice operation not valid in the current state
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Unknown identifier (technique, tool, emotion, tab)
    #[error("Unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

impl CompanionError {
    /// Build an `Unknown` error
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Unknown {
            kind,
            value: value.into(),
        }
    }

    /// Is this a transport-class failure (reported as a canned reply)?
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Endpoint { .. } | Self::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(CompanionError::Timeout(5).is_transport());
        assert!(CompanionError::Endpoint { status: 500, body: String::new() }.is_transport());
        assert!(!CompanionError::SpeechUnsupported("recognition").is_transport());
        assert!(!CompanionError::unknown("technique", "x").is_transport());
    }

    #[test]
    fn test_unknown_message() {
        let err = CompanionError::unknown("technique", "square");
        assert_eq!(err.to_string(), "Unknown technique: square");
    }
}
