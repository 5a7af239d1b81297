//! Speech I/O adapter
//!
//! `SpeechInput` turns recognizer events into input-field updates and
//! finished transcripts; `SpeechOutput` speaks replies, keeping at most one
//! utterance in flight. Missing platform support and permission denial
//! become notices, never errors that end the session.

use chrono::Utc;
use std::process::Stdio;
use tokio::process::{Child, Command};

use crate::core::cache::{LocalCache, KEY_SPEECH_PREFS, KEY_SPEECH_USAGE};
use crate::types::{
    Notice, NoticeCode, RecognitionError, RecognizerEvent, SpeechPrefs, SpeechUsage, VoiceOptions,
};
use crate::{CompanionError, AUTO_SEND_GREETINGS, AUTO_SEND_MIN_WORDS, SPEECH_USAGE_CAP};

// =============================================================================
// PLATFORM SEAMS
// =============================================================================

/// Platform speech-to-text service. Events are delivered separately to
/// `SpeechInput::handle_event`.
pub trait SpeechRecognizer: Send {
    fn start(&mut self) -> Result<(), CompanionError>;
    fn stop(&mut self);
}

/// Platform text-to-speech service
pub trait SpeechSynthesizer: Send {
    /// Begin speaking; returns once the utterance has started
    fn speak(&mut self, text: &str, voice: &VoiceOptions) -> Result<(), CompanionError>;
    /// Stop the current utterance, if any
    fn cancel(&mut self);
    fn is_speaking(&mut self) -> bool;
}

/// Should a finished transcript be submitted without an explicit send?
/// Greetings match anywhere in the text, so "this" counts as "hi".
pub fn should_auto_send(transcript: &str) -> bool {
    let lower = transcript.to_lowercase();
    transcript.contains('?')
        || AUTO_SEND_GREETINGS.iter().any(|g| lower.contains(g))
        || transcript.split_whitespace().count() >= AUTO_SEND_MIN_WORDS
}

// =============================================================================
// INPUT
// =============================================================================

/// Recognizer listening state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenState {
    Idle,
    Listening,
}

/// What the front-end should do after a recognizer event
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechInputUpdate {
    /// Nothing visible changed
    Unchanged,
    /// Reflect this text into the message input
    Input(String),
    /// Finished transcript; submit it when `auto_send` is set
    Transcript { text: String, auto_send: bool },
    Notice(Notice),
}

/// Speech-to-text state machine
pub struct SpeechInput {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    state: ListenState,
    input: String,
    cache: LocalCache,
}

impl SpeechInput {
    /// `None` recognizer means the platform has no speech recognition
    pub fn new(recognizer: Option<Box<dyn SpeechRecognizer>>, cache: LocalCache) -> Self {
        Self {
            recognizer,
            state: ListenState::Idle,
            input: String::new(),
            cache,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn state(&self) -> ListenState {
        self.state
    }

    /// Text currently reflected into the input field
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Start or stop listening
    pub fn toggle(&mut self) -> Result<ListenState, Notice> {
        match self.state {
            ListenState::Idle => self.start_listening(),
            ListenState::Listening => {
                self.stop_listening();
                Ok(self.state)
            }
        }
    }

    pub fn start_listening(&mut self) -> Result<ListenState, Notice> {
        let Some(recognizer) = self.recognizer.as_mut() else {
            return Err(Notice::new(NoticeCode::N002_RECOGNITION_UNSUPPORTED));
        };
        if self.state == ListenState::Listening {
            return Ok(self.state);
        }
        match recognizer.start() {
            Ok(()) => {
                self.state = ListenState::Listening;
                Ok(self.state)
            }
            Err(CompanionError::SpeechPermission(reason)) => {
                tracing::warn!(%reason, "microphone permission denied");
                Err(Notice::new(NoticeCode::N002_MICROPHONE_DENIED))
            }
            Err(CompanionError::SpeechUnsupported(_)) => {
                Err(Notice::new(NoticeCode::N002_RECOGNITION_UNSUPPORTED))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to start speech recognition");
                Err(Notice::with_detail(NoticeCode::N002_RECOGNITION_FAILED, e.to_string()))
            }
        }
    }

    pub fn stop_listening(&mut self) {
        if self.state == ListenState::Listening {
            if let Some(recognizer) = self.recognizer.as_mut() {
                recognizer.stop();
            }
            self.state = ListenState::Idle;
        }
    }

    /// Apply one recognizer event
    pub fn handle_event(&mut self, event: RecognizerEvent) -> SpeechInputUpdate {
        match event {
            RecognizerEvent::Started => {
                self.state = ListenState::Listening;
                SpeechInputUpdate::Unchanged
            }
            RecognizerEvent::Interim(text) => {
                self.input = text.clone();
                SpeechInputUpdate::Input(text)
            }
            RecognizerEvent::Final(text) => {
                self.input = text.clone();
                let auto_send = should_auto_send(&text);
                self.track_usage(&text, auto_send);
                SpeechInputUpdate::Transcript { text, auto_send }
            }
            RecognizerEvent::Error(error) => {
                self.state = ListenState::Idle;
                tracing::warn!(code = error.code(), "speech recognition error");
                let notice = match error {
                    RecognitionError::NotAllowed => Notice::new(NoticeCode::N002_MICROPHONE_DENIED),
                    RecognitionError::NoSpeech => Notice::new(NoticeCode::N002_NO_SPEECH),
                    other => Notice::with_detail(NoticeCode::N002_RECOGNITION_FAILED, other.code()),
                };
                SpeechInputUpdate::Notice(notice)
            }
            RecognizerEvent::Ended => {
                self.state = ListenState::Idle;
                SpeechInputUpdate::Unchanged
            }
        }
    }

    /// Clear the reflected input (after the message is sent)
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    fn track_usage(&self, transcript: &str, auto_sent: bool) {
        let entry = SpeechUsage {
            kind: "speech_input".to_string(),
            transcript: transcript.to_string(),
            timestamp: Utc::now(),
            word_count: transcript.split_whitespace().count(),
            auto_sent,
        };
        if let Err(e) = self.cache.append_capped(KEY_SPEECH_USAGE, entry, SPEECH_USAGE_CAP) {
            tracing::warn!(error = %e, "failed to record speech usage");
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Text-to-speech with a persisted enabled flag
pub struct SpeechOutput {
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    voice: VoiceOptions,
    enabled: bool,
    /// Unsupported notice already shown
    warned: bool,
    cache: LocalCache,
}

impl SpeechOutput {
    /// Restore the enabled flag from the cache (default on)
    pub fn load(synthesizer: Option<Box<dyn SpeechSynthesizer>>, cache: LocalCache) -> Self {
        let enabled = match cache.get::<SpeechPrefs>(KEY_SPEECH_PREFS) {
            Some(prefs) => prefs.speech_enabled,
            None => {
                tracing::debug!("no speech preferences found");
                true
            }
        };
        Self {
            synthesizer,
            voice: VoiceOptions::default(),
            enabled,
            warned: false,
            cache,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn with_voice(mut self, voice: VoiceOptions) -> Self {
        self.voice = voice;
        self
    }

    /// Disable output for this session only; the saved preference is kept
    pub fn muted(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Speak `text`, cancelling any utterance in flight. The first attempt
    /// without a synthesizer returns an "unsupported" notice.
    pub fn speak(&mut self, text: &str) -> Option<Notice> {
        if !self.enabled {
            return None;
        }
        if self.synthesizer.is_none() {
            return self.unsupported_once();
        }
        let synth = self.synthesizer.as_mut()?;
        synth.cancel();
        match synth.speak(text, &self.voice) {
            Ok(()) => None,
            Err(CompanionError::SpeechUnsupported(_)) => {
                tracing::warn!("speech synthesis unavailable, disabling");
                self.synthesizer = None;
                self.unsupported_once()
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed");
                None
            }
        }
    }

    fn unsupported_once(&mut self) -> Option<Notice> {
        if self.warned {
            return None;
        }
        self.warned = true;
        Some(Notice::new(NoticeCode::N002_SYNTHESIS_UNSUPPORTED))
    }

    pub fn cancel(&mut self) {
        if let Some(synth) = self.synthesizer.as_mut() {
            synth.cancel();
        }
    }

    pub fn is_speaking(&mut self) -> bool {
        self.synthesizer.as_mut().is_some_and(|s| s.is_speaking())
    }

    /// Flip the enabled flag, persist it, and report the new state
    pub fn toggle(&mut self) -> Notice {
        self.set_enabled(!self.enabled);
        if self.enabled {
            Notice::new(NoticeCode::N002_SPEECH_ENABLED)
        } else {
            Notice::new(NoticeCode::N002_SPEECH_DISABLED)
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
        let prefs = SpeechPrefs {
            speech_enabled: enabled,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.cache.set(KEY_SPEECH_PREFS, &prefs) {
            tracing::warn!(error = %e, "failed to save speech preferences");
        }
    }
}

// =============================================================================
// COMMAND-LINE SYNTHESIZER
// =============================================================================

/// Speaks through an external TTS program (`espeak`, `say`, ...).
/// The text is passed as the final argument.
#[derive(Debug)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandSynthesizer {
    /// Parse a command line such as `"espeak-ng -v en-us"`
    pub fn new(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            child: None,
        })
    }

    /// First known TTS program found on `PATH`
    pub fn detect() -> Option<Self> {
        ["espeak-ng", "espeak", "say", "spd-say"]
            .into_iter()
            .find(|p| on_path(p))
            .and_then(Self::new)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn voice_args(&self, voice: &VoiceOptions) -> Vec<String> {
        let name = std::path::Path::new(&self.program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let wpm = (175.0 * voice.rate).round() as u32;
        match name {
            "espeak" | "espeak-ng" => vec![
                "-s".into(),
                wpm.to_string(),
                "-p".into(),
                ((50.0 * voice.pitch).round() as u32).to_string(),
                "-a".into(),
                ((200.0 * voice.volume).round() as u32).to_string(),
            ],
            "say" => vec!["-r".into(), wpm.to_string()],
            _ => Vec::new(),
        }
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&mut self, text: &str, voice: &VoiceOptions) -> Result<(), CompanionError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .args(self.voice_args(voice))
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CompanionError::SpeechUnsupported("synthesis"),
                _ => CompanionError::Speech(e.to_string()),
            })?;
        self.child = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                tracing::debug!(error = %e, "tts process already gone");
            }
        }
    }

    fn is_speaking(&mut self) -> bool {
        let running = match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        };
        if !running {
            self.child = None;
        }
        running
    }
}

fn on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

// =============================================================================
// TESTS
// =============================================================================
