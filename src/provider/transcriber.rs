//! Transcription provider abstraction.
//!
//! The provider is an opaque collaborator: audio bytes in, an ordered list
//! of word timestamps plus the joined text out. The trait allows swapping
//! implementations (real HTTP provider vs mock).

use crate::error::{ChunkscribeError, Result};
use crate::transcript::chunk::ChunkTranscript;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

/// Speech-to-text provider turning one chunk's audio into a transcript.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe the audio file at `path`.
    ///
    /// `context` optionally carries the previous chunk's text to bias the
    /// recognizer across the chunk boundary.
    ///
    /// Any failure (network, auth, quota, malformed audio) is an error; it
    /// is never a silent chunk.
    async fn transcribe(&self, path: &Path, context: Option<&str>) -> Result<ChunkTranscript>;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;
}

/// Mock provider for testing.
///
/// Serves canned transcripts in the order they were queued.
pub struct MockProvider {
    model: String,
    responses: Mutex<VecDeque<ChunkTranscript>>,
    should_fail: bool,
}

impl MockProvider {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            responses: Mutex::new(VecDeque::new()),
            should_fail: false,
        }
    }

    /// Queues a response to serve on a later `transcribe` call.
    pub fn with_response(self, transcript: ChunkTranscript) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(transcript);
        }
        self
    }

    /// Configures the mock to fail every call.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl TranscriptionProvider for MockProvider {
    async fn transcribe(&self, path: &Path, _context: Option<&str>) -> Result<ChunkTranscript> {
        if self.should_fail {
            return Err(ChunkscribeError::Provider {
                message: format!("mock failure for {}", path.display()),
            });
        }
        let mut responses = self
            .responses
            .lock()
            .map_err(|_| ChunkscribeError::Other("mock provider lock poisoned".to_string()))?;
        // Out of queued responses: serve a silent chunk.
        Ok(responses.pop_front().unwrap_or_default())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
