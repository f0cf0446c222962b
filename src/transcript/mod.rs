//! Transcript stitching core.
//!
//! Takes per-chunk, word-timestamped transcription results (each chunk
//! overlapping its neighbors) and produces a deduplicated utterance stream
//! plus a continuous full transcript:
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌──────────┐
//! │ Provider │───▶│  Stitcher  │───▶│ Utterance│
//! │ results  │    │ (+ Slicer) │    │  stream  │
//! └──────────┘    └─────┬──────┘    └──────────┘
//!                       │
//!                       ▼
//!                 full transcript
//! ```

pub mod chunk;
pub mod slicer;
pub mod stitcher;

pub use chunk::{Chunk, ChunkTranscript, Utterance, Word, chunk_file_name, parse_chunk_name};
pub use slicer::slice;
pub use stitcher::{ChunkOutcome, Clock, MockClock, Stitcher, StitcherConfig, SystemClock};
