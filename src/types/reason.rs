//! User-facing notices
//!
//! Every degraded feature surfaces as a dismissible notice instead of
//! an error that stops the session.

use serde::{Deserialize, Serialize};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    /// Icon shown with the notice
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeKind::Success => "✓",
            NoticeKind::Info => "ℹ",
            NoticeKind::Warning => "⚠",
            NoticeKind::Error => "✗",
        }
    }
}

/// Stable codes for every notice the companion raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum NoticeCode {
    // =========================================================================
    // N001: Chat
    // =========================================================================
    /// Chat history cleared
    N001_CHAT_CLEARED,
    /// Reply mentioned substances; point to support line
    N001_DRUG_SUPPORT,

    // =========================================================================
    // N002: Speech
    // =========================================================================
    /// Speech recognition not available
    N002_RECOGNITION_UNSUPPORTED,
    /// Microphone permission denied
    N002_MICROPHONE_DENIED,
    /// No speech heard before recognizer stopped
    N002_NO_SPEECH,
    /// Recognizer failed for another reason
    N002_RECOGNITION_FAILED,
    /// Speech synthesis not available
    N002_SYNTHESIS_UNSUPPORTED,
    /// Speech output toggled on
    N002_SPEECH_ENABLED,
    /// Speech output toggled off
    N002_SPEECH_DISABLED,

    // =========================================================================
    // N003: Exercises
    // =========================================================================
    /// Guided practice finished
    N003_PRACTICE_COMPLETE,
}

impl NoticeCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::N001_CHAT_CLEARED => "N001_CHAT_CLEARED",
            Self::N001_DRUG_SUPPORT => "N001_DRUG_SUPPORT",
            Self::N002_RECOGNITION_UNSUPPORTED => "N002_RECOGNITION_UNSUPPORTED",
            Self::N002_MICROPHONE_DENIED => "N002_MICROPHONE_DENIED",
            Self::N002_NO_SPEECH => "N002_NO_SPEECH",
            Self::N002_RECOGNITION_FAILED => "N002_RECOGNITION_FAILED",
            Self::N002_SYNTHESIS_UNSUPPORTED => "N002_SYNTHESIS_UNSUPPORTED",
            Self::N002_SPEECH_ENABLED => "N002_SPEECH_ENABLED",
            Self::N002_SPEECH_DISABLED => "N002_SPEECH_DISABLED",
            Self::N003_PRACTICE_COMPLETE => "N003_PRACTICE_COMPLETE",
        }
    }

    pub fn kind(&self) -> NoticeKind {
        match self {
            Self::N001_CHAT_CLEARED | Self::N002_SPEECH_ENABLED | Self::N003_PRACTICE_COMPLETE => {
                NoticeKind::Success
            }
            Self::N001_DRUG_SUPPORT => NoticeKind::Info,
            Self::N002_SPEECH_DISABLED | Self::N002_NO_SPEECH => NoticeKind::Warning,
            Self::N002_RECOGNITION_UNSUPPORTED
            | Self::N002_MICROPHONE_DENIED
            | Self::N002_RECOGNITION_FAILED
            | Self::N002_SYNTHESIS_UNSUPPORTED => NoticeKind::Error,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            Self::N001_CHAT_CLEARED => "Chat cleared",
            Self::N001_DRUG_SUPPORT => {
                "Remember: the colony offers confidential support for substance use at Extension 933."
            }
            Self::N002_RECOGNITION_UNSUPPORTED => {
                "Speech recognition is not supported on this platform."
            }
            Self::N002_MICROPHONE_DENIED => {
                "Microphone access is required for speech recognition. Please allow microphone permissions."
            }
            Self::N002_NO_SPEECH => "No speech was detected. Please try again.",
            Self::N002_RECOGNITION_FAILED => "Speech recognition stopped unexpectedly.",
            Self::N002_SYNTHESIS_UNSUPPORTED => "Text-to-speech is not available on this platform.",
            Self::N002_SPEECH_ENABLED => "Text-to-speech enabled",
            Self::N002_SPEECH_DISABLED => "Text-to-speech disabled",
            Self::N003_PRACTICE_COMPLETE => "Practice complete! Great job completing this wellness practice.",
        }
    }
}

/// A dismissible, user-visible notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub code: NoticeCode,
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(code: NoticeCode) -> Self {
        Self {
            code,
            kind: code.kind(),
            message: code.message().to_string(),
        }
    }

    /// Notice with extra detail appended to the canned message
    pub fn with_detail(code: NoticeCode, detail: impl AsRef<str>) -> Self {
        let mut notice = Self::new(code);
        notice.message = format!("{} ({})", notice.message, detail.as_ref());
        notice
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.icon(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_and_unsupported_are_distinct() {
        let denied = Notice::new(NoticeCode::N002_MICROPHONE_DENIED);
        let unsupported = Notice::new(NoticeCode::N002_RECOGNITION_UNSUPPORTED);
        assert_ne!(denied.message, unsupported.message);
        assert_eq!(denied.kind, NoticeKind::Error);
    }

    #[test]
    fn test_with_detail() {
        let n = Notice::with_detail(NoticeCode::N002_RECOGNITION_FAILED, "audio-capture");
        assert!(n.message.ends_with("(audio-capture)"));
    }
}
