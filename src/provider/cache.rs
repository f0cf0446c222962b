//! Provider response cache keyed by chunk identity.
//!
//! The cache is advisory: a miss is never an error. Each chunk owns a
//! distinct key (its file name), so reads and writes for different chunks
//! are safe to interleave.

use crate::error::Result;
use crate::transcript::chunk::ChunkTranscript;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key/value store for provider responses.
pub trait TranscriptCache: Send + Sync {
    /// Looks up the transcript cached under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<ChunkTranscript>>;

    /// Stores `transcript` under `key`, replacing any previous entry.
    fn put(&self, key: &str, transcript: &ChunkTranscript) -> Result<()>;
}

/// Disk cache storing one pretty-printed JSON file per chunk
/// (`{dir}/{key}.json`), the raw provider payload.
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        // Keys are chunk file names; drop any directory components so a
        // caller passing a full path cannot escape the cache dir.
        let base = Path::new(key)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(key);
        self.dir.join(format!("{}.json", base))
    }
}

impl TranscriptCache for JsonFileCache {
    fn get(&self, key: &str) -> Result<Option<ChunkTranscript>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn put(&self, key: &str, transcript: &ChunkTranscript) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(transcript)?;
        fs::write(self.entry_path(key), contents)?;
        Ok(())
    }
}

/// In-memory cache for tests and one-shot sessions.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, ChunkTranscript>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TranscriptCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<ChunkTranscript>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| crate::error::ChunkscribeError::Other("cache lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, transcript: &ChunkTranscript) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| crate::error::ChunkscribeError::Other("cache lock poisoned".to_string()))?;
        entries.insert(key.to_string(), transcript.clone());
        Ok(())
    }
}
