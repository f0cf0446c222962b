//! Async provider station.
//!
//! Turns chunk jobs into transcribed chunks without blocking chunk
//! acquisition. Provider calls for different chunks run concurrently
//! (bounded by a semaphore) and complete in any order — the stitcher
//! station downstream restores commit order.

use crate::error::Result;
use crate::provider::cache::TranscriptCache;
use crate::provider::transcriber::TranscriptionProvider;
use crate::transcript::chunk::{Chunk, ChunkTranscript};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::{Semaphore, mpsc};

/// A captured chunk awaiting transcription.
#[derive(Debug, Clone)]
pub struct ChunkJob {
    /// Submission-order id; the stitcher station commits in id order.
    pub chunk_id: u64,
    /// Path to the chunk's WAV file, named `{start_ms}_{end_ms}.wav`.
    pub path: PathBuf,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// A chunk with its provider transcript attached.
#[derive(Debug, Clone)]
pub struct TranscribedChunk {
    pub chunk_id: u64,
    pub chunk: Chunk,
}

/// Station resolving chunk jobs through the cache and the provider.
pub struct ProviderStation<P: TranscriptionProvider + 'static> {
    provider: Arc<P>,
    cache: Arc<dyn TranscriptCache>,
    /// Text of the most recently completed chunk, passed to the provider
    /// as recognition context for the next request.
    last_text: Arc<Mutex<Option<String>>>,
}

impl<P: TranscriptionProvider + 'static> ProviderStation<P> {
    pub fn new(provider: P, cache: Arc<dyn TranscriptCache>) -> Self {
        Self {
            provider: Arc::new(provider),
            cache,
            last_text: Arc::new(Mutex::new(None)),
        }
    }

    /// Resolves one job: cache hit, or provider call followed by a cache
    /// write.
    pub async fn resolve(&self, job: &ChunkJob) -> Result<TranscribedChunk> {
        let key = job
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .unwrap_or_else(|| job.path.display().to_string());

        let transcript = match self.cache.get(&key)? {
            Some(cached) => cached,
            None => {
                let context = self.last_text.lock().ok().and_then(|t| t.clone());
                let transcript = self
                    .provider
                    .transcribe(&job.path, context.as_deref())
                    .await?;
                self.cache.put(&key, &transcript)?;
                transcript
            }
        };

        self.remember(&transcript);
        Ok(TranscribedChunk {
            chunk_id: job.chunk_id,
            chunk: Chunk {
                start_ms: job.start_ms,
                end_ms: job.end_ms,
                transcript,
            },
        })
    }

    fn remember(&self, transcript: &ChunkTranscript) {
        if transcript.is_silent() {
            return;
        }
        if let Ok(mut last) = self.last_text.lock() {
            *last = Some(transcript.full_text.clone());
        }
    }

    /// Runs the station.
    ///
    /// Receives jobs, resolves them concurrently, and sends results in
    /// completion order. A provider failure is forwarded as an `Err`
    /// frame — it is never treated as a silent chunk.
    pub async fn run(
        self,
        mut input: mpsc::Receiver<ChunkJob>,
        output: mpsc::Sender<Result<TranscribedChunk>>,
        max_concurrent: usize,
    ) {
        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let station = Arc::new(self);

        while let Some(job) = input.recv().await {
            let permit = semaphore.clone().acquire_owned().await;
            let station = station.clone();
            let output = output.clone();

            tokio::spawn(async move {
                let _permit = permit; // Hold until done
                let result = station.resolve(&job).await;
                if let Err(ref e) = result {
                    eprintln!("Provider error for chunk {}: {}", job.chunk_id, e);
                }
                let _ = output.send(result).await;
            });
        }

        // Drain: don't exit while resolutions are still in flight.
        let _ = semaphore.acquire_many(max_concurrent as u32).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::cache::MemoryCache;
    use crate::provider::transcriber::MockProvider;
    use crate::transcript::chunk::Word;

    fn transcript(text: &str) -> ChunkTranscript {
        ChunkTranscript {
            words: vec![Word::new(text, 0.0, 0.5)],
            full_text: text.to_string(),
        }
    }

    fn job(chunk_id: u64, start_ms: u64) -> ChunkJob {
        ChunkJob {
            chunk_id,
            path: PathBuf::from(format!("{}_{}.wav", start_ms, start_ms + 7000)),
            start_ms,
            end_ms: start_ms + 7000,
        }
    }

    #[tokio::test]
    async fn test_resolve_calls_provider_and_fills_cache() {
        let cache = Arc::new(MemoryCache::new());
        let provider = MockProvider::new("whisper-1").with_response(transcript("hello"));
        let station = ProviderStation::new(provider, cache.clone());

        let resolved = station.resolve(&job(0, 0)).await.unwrap();
        assert_eq!(resolved.chunk.transcript.full_text, "hello");
        assert_eq!(resolved.chunk.start_ms, 0);

        assert!(cache.get("0_7000.wav").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_resolve_prefers_cache() {
        let cache = Arc::new(MemoryCache::new());
        cache.put("0_7000.wav", &transcript("cached")).unwrap();

        // Provider would fail if called.
        let provider = MockProvider::new("whisper-1").with_failure();
        let station = ProviderStation::new(provider, cache);

        let resolved = station.resolve(&job(0, 0)).await.unwrap();
        assert_eq!(resolved.chunk.transcript.full_text, "cached");
    }

    #[tokio::test]
    async fn test_resolve_propagates_provider_error() {
        let cache = Arc::new(MemoryCache::new());
        let provider = MockProvider::new("whisper-1").with_failure();
        let station = ProviderStation::new(provider, cache.clone());

        assert!(station.resolve(&job(0, 0)).await.is_err());
        // A failed chunk is never cached as silence.
        assert!(cache.get("0_7000.wav").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_run_forwards_results_and_errors() {
        let cache = Arc::new(MemoryCache::new());
        let provider = MockProvider::new("whisper-1").with_response(transcript("one"));
        let station = ProviderStation::new(provider, cache);

        let (input_tx, input_rx) = mpsc::channel(10);
        let (output_tx, mut output_rx) = mpsc::channel(10);

        tokio::spawn(async move {
            station.run(input_rx, output_tx, 2).await;
        });

        input_tx.send(job(0, 0)).await.unwrap();
        let first = output_rx.recv().await.unwrap();
        assert_eq!(first.unwrap().chunk.transcript.full_text, "one");

        // Mock is exhausted: next job resolves as a silent chunk.
        input_tx.send(job(1, 6500)).await.unwrap();
        let second = output_rx.recv().await.unwrap();
        assert!(second.unwrap().chunk.transcript.is_silent());

        drop(input_tx);
    }
}
