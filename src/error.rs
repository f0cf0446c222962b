//! Error types for chunkscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkscribeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Provider errors
    #[error("Transcription provider request failed: {message}")]
    Provider { message: String },

    #[error("Transcription provider HTTP error: {0}")]
    ProviderHttp(#[from] reqwest::Error),

    // Chunk bookkeeping errors
    #[error("Chunk committed out of order: start {actual}ms is before previous start {previous}ms")]
    SequenceViolation { previous: u64, actual: u64 },

    #[error("Invalid chunk name {name}: expected {{start_ms}}_{{end_ms}}.wav")]
    ChunkName { name: String },

    // Cache errors
    #[error("Cache serialization error: {0}")]
    Cache(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ChunkscribeError>;
