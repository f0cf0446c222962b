//! Speech-to-text provider surface: the transcription trait, the HTTP
//! implementation, and the response cache.

pub mod cache;
pub mod openai;
pub mod transcriber;

pub use cache::{JsonFileCache, MemoryCache, TranscriptCache};
pub use openai::OpenAiProvider;
pub use transcriber::{MockProvider, TranscriptionProvider};
