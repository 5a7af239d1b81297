//! Runtime configuration, built once from CLI flags and passed explicitly

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::{DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Companion configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the chat endpoint (no trailing slash)
    pub endpoint: String,
    /// Directory holding the local cache files
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    /// Speak agent replies
    pub speech: bool,
    /// Explicit TTS command; autodetected when `None`
    pub tts_command: Option<String>,
    /// Listen address for the companion server
    pub addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            data_dir: default_data_dir(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            speech: true,
            tts_command: None,
            addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

impl Config {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }
}

/// `<platform data dir>/aurora`, falling back to `./.aurora`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("aurora"))
        .unwrap_or_else(|| PathBuf::from(".aurora"))
}
