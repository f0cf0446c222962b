//! Default configuration constants for chunkscribe.
//!
//! Shared constants used across configuration types to ensure consistency
//! and eliminate duplication.

/// Default silence gap in milliseconds that closes an utterance.
///
/// 1000ms allows natural mid-sentence pauses without splitting a command
/// in two, while still feeling responsive for voice-command use.
pub const SILENCE_THRESHOLD_MS: u64 = 1000;

/// Default chunk length in milliseconds.
///
/// 7 seconds keeps provider requests small enough for low latency while
/// giving the recognizer enough context to place word timestamps reliably.
pub const CHUNK_LENGTH_MS: u64 = 7000;

/// Default overlap margin between consecutive chunks in milliseconds.
///
/// The next chunk starts this long before the current one ends, so no
/// audio is lost while one recording finishes and the next spins up.
pub const MARGIN_MS: u64 = 500;

/// Guard subtracted from a boundary word's start when slicing, in seconds.
///
/// Keeps the word that opens a new utterance out of the slice that closes
/// the previous one.
pub const BOUNDARY_EPSILON_SEC: f64 = 0.01;

/// Placeholder recorded in the full transcript for a chunk with no words.
pub const SILENCE_MARKER: &str = "[silence]";

/// Default transcription model name.
pub const DEFAULT_MODEL: &str = "whisper-1";

/// Default language code sent to the provider.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default base URL for the OpenAI-compatible transcription endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Upper bound used as the open end of a tail slice, in seconds.
///
/// Any value beyond the longest possible chunk works; matches the slicer's
/// inclusive end-of-range comparison.
pub const SLICE_OPEN_END_SEC: f64 = 1.0e7;
