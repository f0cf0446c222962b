//! chunkscribe - Continuous chunked transcription stitching
//!
//! Records-as-chunks audio transcription: overlapping fixed-length chunks
//! are transcribed independently and stitched back into one continuous
//! transcript plus a silence-segmented utterance stream.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod transcript;

// Core types (chunk transcripts in → utterances out)
pub use transcript::chunk::{Chunk, ChunkTranscript, Utterance, Word};
pub use transcript::stitcher::{ChunkOutcome, Stitcher, StitcherConfig};

// Provider surface
pub use provider::cache::{JsonFileCache, MemoryCache, TranscriptCache};
pub use provider::transcriber::TranscriptionProvider;

// Pipeline
pub use pipeline::provider_station::{ChunkJob, ProviderStation, TranscribedChunk};
pub use pipeline::sink::{CollectorSink, StdoutSink, UtteranceSink};
pub use pipeline::stitcher_station::StitcherStation;

// Error handling
pub use error::{ChunkscribeError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.1+abc1234"` when git hash is available, `"0.3.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }
}
