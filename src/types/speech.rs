//! Speech adapter events and persisted records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a recognizer stopped with an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecognitionError {
    /// Microphone permission refused
    NotAllowed,
    NoSpeech,
    AudioCapture,
    Network,
    Other(String),
}

impl RecognitionError {
    pub fn code(&self) -> &str {
        match self {
            RecognitionError::NotAllowed => "not-allowed",
            RecognitionError::NoSpeech => "no-speech",
            RecognitionError::AudioCapture => "audio-capture",
            RecognitionError::Network => "network",
            RecognitionError::Other(code) => code.as_str(),
        }
    }
}

/// Events delivered by a platform recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    Started,
    /// Partial transcript, reflected live into the input
    Interim(String),
    /// Finished transcript
    Final(String),
    Error(RecognitionError),
    Ended,
}

/// Persisted speech preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechPrefs {
    pub speech_enabled: bool,
    pub timestamp: DateTime<Utc>,
}

/// One speech usage log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechUsage {
    #[serde(rename = "type")]
    pub kind: String,
    pub transcript: String,
    pub timestamp: DateTime<Utc>,
    pub word_count: usize,
    pub auto_sent: bool,
}

/// Synthesis voice options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceOptions {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}
