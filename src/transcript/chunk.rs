//! Transcript data types flowing between the provider and the stitcher.
//!
//! Field names mirror the provider's verbose JSON payload (`word`, `start`,
//! `end`, `text`) so cached responses deserialize without a translation
//! layer.

use crate::error::{ChunkscribeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recognized word with offsets relative to the start of its chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// The recognized text, without surrounding punctuation.
    #[serde(rename = "word")]
    pub text: String,
    /// Offset of the word's start from the chunk start, in seconds.
    #[serde(rename = "start")]
    pub start_sec: f64,
    /// Offset of the word's end from the chunk start, in seconds.
    #[serde(rename = "end")]
    pub end_sec: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start_sec: f64, end_sec: f64) -> Self {
        Self {
            text: text.into(),
            start_sec,
            end_sec,
        }
    }

    /// Absolute start of this word in epoch milliseconds.
    pub fn abs_start_ms(&self, chunk_start_ms: u64) -> u64 {
        chunk_start_ms + (self.start_sec * 1000.0).round() as u64
    }

    /// Absolute end of this word in epoch milliseconds.
    pub fn abs_end_ms(&self, chunk_start_ms: u64) -> u64 {
        chunk_start_ms + (self.end_sec * 1000.0).round() as u64
    }
}

/// Provider output for one audio chunk.
///
/// `full_text` is the provider's own join of the words including
/// punctuation; it is not derivable by concatenating `words` with spaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkTranscript {
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(rename = "text", default)]
    pub full_text: String,
}

impl ChunkTranscript {
    /// Returns true if the provider recognized no words in the chunk.
    pub fn is_silent(&self) -> bool {
        self.words.is_empty()
    }
}

/// One transcribed audio chunk with absolute capture timestamps.
///
/// Neighboring chunks overlap by the capture margin, so `start_ms` of a
/// chunk is usually earlier than `end_ms` of its predecessor.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Wall-clock epoch milliseconds when capture of this chunk started.
    pub start_ms: u64,
    /// Wall-clock epoch milliseconds when capture of this chunk ended.
    pub end_ms: u64,
    pub transcript: ChunkTranscript,
}

/// A unit of emitted text bounded by detected silence.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// The silence gap that closed this utterance, in seconds.
    ///
    /// `-1.0` marks the final flush: no following word exists, so no gap
    /// was measured.
    pub silence_gap_sec: f64,
}

impl Utterance {
    /// Returns true if this utterance came from the end-of-session flush.
    pub fn is_final_flush(&self) -> bool {
        self.silence_gap_sec < 0.0
    }
}

/// Parses the capture timestamps out of a chunk file name.
///
/// The recorder names chunks `{start_ms}_{end_ms}.wav`; any leading
/// directory components are ignored.
pub fn parse_chunk_name(name: &str) -> Result<(u64, u64)> {
    let invalid = || ChunkscribeError::ChunkName {
        name: name.to_string(),
    };

    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(invalid)?;
    let stem = base.strip_suffix(".wav").ok_or_else(invalid)?;
    let (start, end) = stem.split_once('_').ok_or_else(invalid)?;

    let start_ms: u64 = start.parse().map_err(|_| invalid())?;
    let end_ms: u64 = end.parse().map_err(|_| invalid())?;
    if end_ms < start_ms {
        return Err(invalid());
    }
    Ok((start_ms, end_ms))
}

/// Formats the canonical chunk file name for the given capture window.
pub fn chunk_file_name(start_ms: u64, end_ms: u64) -> String {
    format!("{}_{}.wav", start_ms, end_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_absolute_times() {
        let word = Word::new("hi", 0.05, 0.4);
        assert_eq!(word.abs_start_ms(1000), 1050);
        assert_eq!(word.abs_end_ms(1000), 1400);
    }

    #[test]
    fn test_transcript_silent() {
        assert!(ChunkTranscript::default().is_silent());
        let transcript = ChunkTranscript {
            words: vec![Word::new("hi", 0.0, 0.3)],
            full_text: "Hi".to_string(),
        };
        assert!(!transcript.is_silent());
    }

    #[test]
    fn test_deserialize_provider_payload() {
        let json = r#"{
            "text": "Hello, world.",
            "words": [
                {"word": "Hello", "start": 0.0, "end": 0.4},
                {"word": "world", "start": 0.5, "end": 0.9}
            ]
        }"#;
        let transcript: ChunkTranscript = serde_json::from_str(json).unwrap();
        assert_eq!(transcript.full_text, "Hello, world.");
        assert_eq!(transcript.words.len(), 2);
        assert_eq!(transcript.words[0].text, "Hello");
        assert_eq!(transcript.words[1].start_sec, 0.5);
    }

    #[test]
    fn test_serialize_round_trip() {
        let transcript = ChunkTranscript {
            words: vec![Word::new("one", 0.1, 0.2)],
            full_text: "One.".to_string(),
        };
        let json = serde_json::to_string(&transcript).unwrap();
        assert!(json.contains("\"word\":\"one\""));
        assert!(json.contains("\"text\":\"One.\""));
        let back: ChunkTranscript = serde_json::from_str(&json).unwrap();
        assert_eq!(back, transcript);
    }

    #[test]
    fn test_parse_chunk_name() {
        assert_eq!(
            parse_chunk_name("1714706294033_1714706304033.wav").unwrap(),
            (1714706294033, 1714706304033)
        );
    }

    #[test]
    fn test_parse_chunk_name_with_directory() {
        assert_eq!(
            parse_chunk_name("audio/session/1000_8000.wav").unwrap(),
            (1000, 8000)
        );
    }

    #[test]
    fn test_parse_chunk_name_rejects_malformed() {
        assert!(parse_chunk_name("clip.wav").is_err());
        assert!(parse_chunk_name("1000_2000.mp3").is_err());
        assert!(parse_chunk_name("abc_def.wav").is_err());
        // End before start is a recorder bug, not a valid window.
        assert!(parse_chunk_name("2000_1000.wav").is_err());
    }

    #[test]
    fn test_chunk_file_name_round_trip() {
        let name = chunk_file_name(1000, 8000);
        assert_eq!(name, "1000_8000.wav");
        assert_eq!(parse_chunk_name(&name).unwrap(), (1000, 8000));
    }

    #[test]
    fn test_utterance_final_flush() {
        let utterance = Utterance {
            text: "stop".to_string(),
            silence_gap_sec: -1.0,
        };
        assert!(utterance.is_final_flush());

        let utterance = Utterance {
            text: "go".to_string(),
            silence_gap_sec: 0.75,
        };
        assert!(!utterance.is_final_flush());
    }
}
