//! Local key-value cache: one JSON blob per key
//!
//! Reads are best-effort: missing or corrupt data reads as `None`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::CompanionError;

/// Conversation transcript key
pub const KEY_CONVERSATION: &str = "companionConversation";
/// Speech preferences key
pub const KEY_SPEECH_PREFS: &str = "companionSpeechPrefs";
/// Resources view preferences key
pub const KEY_RESOURCE_PREFS: &str = "companionResourcesPrefs";
/// Speech usage log key
pub const KEY_SPEECH_USAGE: &str = "speechUsageHistory";
/// Resource usage log key
pub const KEY_RESOURCE_USAGE: &str = "resourceUsageHistory";

#[derive(Debug, Clone)]
enum Backing {
    Dir(PathBuf),
    Memory(Arc<Mutex<HashMap<String, String>>>),
}

/// Persisted key-value blobs
#[derive(Debug, Clone)]
pub struct LocalCache {
    backing: Backing,
}

impl LocalCache {
    /// Open (and create) a directory-backed cache
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CompanionError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            backing: Backing::Dir(dir),
        })
    }

    /// Cache that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            backing: Backing::Memory(Arc::new(Mutex::new(HashMap::new()))),
        }
    }

    fn path_for(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{}.json", key))
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match &self.backing {
            Backing::Dir(dir) => std::fs::read_to_string(Self::path_for(dir, key)).ok(),
            Backing::Memory(map) => map.lock().ok()?.get(key).cloned(),
        }
    }

    /// Read and decode a value; missing or malformed data yields `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "ignoring malformed cache entry");
                None
            }
        }
    }

    /// Encode and store a value
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CompanionError> {
        let json = serde_json::to_string(value)?;
        match &self.backing {
            Backing::Dir(dir) => {
                std::fs::write(Self::path_for(dir, key), json)?;
            }
            Backing::Memory(map) => {
                if let Ok(mut map) = map.lock() {
                    map.insert(key.to_string(), json);
                }
            }
        }
        Ok(())
    }

    /// Store raw text without encoding (used to seed data in tests and imports)
    pub fn set_raw(&self, key: &str, raw: &str) -> Result<(), CompanionError> {
        match &self.backing {
            Backing::Dir(dir) => std::fs::write(Self::path_for(dir, key), raw)?,
            Backing::Memory(map) => {
                if let Ok(mut map) = map.lock() {
                    map.insert(key.to_string(), raw.to_string());
                }
            }
        }
        Ok(())
    }

    /// Delete a key; missing keys are fine
    pub fn remove(&self, key: &str) -> Result<(), CompanionError> {
        match &self.backing {
            Backing::Dir(dir) => match std::fs::remove_file(Self::path_for(dir, key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
            Backing::Memory(map) => {
                if let Ok(mut map) = map.lock() {
                    map.remove(key);
                }
                Ok(())
            }
        }
    }

    /// Append to a JSON array stored under `key`, keeping the newest `cap` entries
    pub fn append_capped<T>(&self, key: &str, entry: T, cap: usize) -> Result<(), CompanionError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut entries: Vec<T> = self.get(key).unwrap_or_default();
        entries.push(entry);
        if entries.len() > cap {
            let excess = entries.len() - cap;
            entries.drain(..excess);
        }
        self.set(key, &entries)
    }
}
