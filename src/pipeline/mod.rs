//! Transcription session pipeline.
//!
//! Connects the provider surface to the stitching core:
//!
//! ```text
//! ┌───────────┐    ┌──────────────┐    ┌───────────────┐    ┌──────┐
//! │  Chunk    │───▶│   Provider   │───▶│   Stitcher    │───▶│ Sink │
//! │  jobs     │    │ (cache+HTTP, │    │ (ordered      │    │      │
//! └───────────┘    │  concurrent) │    │  commit)      │    └──────┘
//!                  └──────────────┘    └───────┬───────┘
//!                                              ▼
//!                                       full transcript
//! ```
//!
//! Provider calls run concurrently and finish in any order; the stitcher
//! station restores strict commit order before touching the engine.

pub mod provider_station;
pub mod sink;
pub mod stitcher_station;

pub use provider_station::{ChunkJob, ProviderStation, TranscribedChunk};
pub use sink::{CollectorSink, StdoutSink, UtteranceSink};
pub use stitcher_station::StitcherStation;
