//! OpenAI-compatible HTTP transcription provider.
//!
//! Uploads one chunk's WAV file to the `/audio/transcriptions` endpoint
//! with `response_format=verbose_json` and word-level timestamp
//! granularity; the verbose payload deserializes directly into
//! [`ChunkTranscript`].

use crate::config::ProviderConfig;
use crate::error::{ChunkscribeError, Result};
use crate::provider::transcriber::TranscriptionProvider;
use crate::transcript::chunk::ChunkTranscript;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::path::Path;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    language: String,
}

impl OpenAiProvider {
    /// Creates a provider from config, reading the API key from
    /// `OPENAI_API_KEY`.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| ChunkscribeError::Provider {
            message: format!("{} is not set", API_KEY_ENV),
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            language: config.language.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/audio/transcriptions", self.api_base)
    }
}

/// Prompt biasing the recognizer with the previous chunk's text.
fn context_prompt(previous: &str) -> String {
    format!("previous transcription: {}", previous)
}

#[async_trait]
impl TranscriptionProvider for OpenAiProvider {
    async fn transcribe(&self, path: &Path, context: Option<&str>) -> Result<ChunkTranscript> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("chunk.wav")
            .to_string();

        let mut form = Form::new()
            .part(
                "file",
                Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("audio/wav")
                    .map_err(|e| ChunkscribeError::Provider {
                        message: format!("invalid mime type: {}", e),
                    })?,
            )
            .text("model", self.model.clone())
            .text("language", self.language.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word");

        if let Some(previous) = context {
            form = form.text("prompt", context_prompt(previous));
        }

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChunkscribeError::Provider {
                message: format!("{} from provider: {}", status, body),
            });
        }

        Ok(response.json::<ChunkTranscript>().await?)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
