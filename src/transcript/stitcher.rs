//! Transcript stitcher: the cross-chunk segmentation state machine.
//!
//! Consumes word-timestamped chunk transcripts in capture order and
//! produces (a) a monotonically growing full transcript and (b) utterances
//! bounded by silence gaps. A gap at least `silence_threshold_ms` wide
//! between the absolute end of one word and the absolute start of the next
//! closes the buffered text as one utterance.
//!
//! State is owned exclusively by one `Stitcher` and only mutated by
//! `process_chunk`, `flush` and `reset`; chunks must be committed in
//! non-decreasing start-time order.

use crate::defaults;
use crate::error::{ChunkscribeError, Result};
use crate::transcript::chunk::{Chunk, Utterance};
use crate::transcript::slicer;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock source for the live-mode silence check.
///
/// Injected so tests can drive time without real delays.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in epoch milliseconds.
    fn now_ms(&self) -> u64;
}

/// System wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually driven clock for testing live mode.
#[derive(Clone, Default)]
pub struct MockClock {
    now_ms: Arc<AtomicU64>,
}

impl MockClock {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(now_ms)),
        }
    }

    pub fn set_ms(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Configuration for the stitcher.
#[derive(Debug, Clone)]
pub struct StitcherConfig {
    /// Minimum silence gap (ms) that closes an utterance. Inclusive.
    pub silence_threshold_ms: u64,
    /// Live mode: a silent chunk may close the buffered utterance by wall
    /// clock instead of waiting for the next word.
    pub live: bool,
}

impl Default for StitcherConfig {
    fn default() -> Self {
        Self {
            silence_threshold_ms: defaults::SILENCE_THRESHOLD_MS,
            live: false,
        }
    }
}

impl StitcherConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.silence_threshold_ms == 0 {
            return Err(ChunkscribeError::ConfigInvalidValue {
                key: "silence_threshold_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of processing one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOutcome {
    /// The chunk's contribution to the full transcript: its raw text, or
    /// the silence marker for an empty chunk.
    pub chunk_text: String,
    /// Utterances closed while walking this chunk, in order.
    pub utterances: Vec<Utterance>,
}

/// Stateful engine combining chunk transcripts into a continuous
/// transcript and an utterance stream.
pub struct Stitcher {
    config: StitcherConfig,
    clock: Box<dyn Clock>,
    /// Absolute end of the last word seen, in epoch ms. Monotonically
    /// non-decreasing; unset only before the first word ever.
    last_word_end_ms: Option<u64>,
    /// Start of the most recently committed chunk, for order checking.
    last_chunk_start_ms: Option<u64>,
    /// Text buffered since the last emitted utterance.
    pending: String,
    /// One entry per processed chunk, never rewritten after append.
    transcripts: Vec<String>,
}

impl Stitcher {
    /// Creates a stitcher using the system wall clock.
    pub fn new(config: StitcherConfig) -> Result<Self> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Creates a stitcher with an injected clock (live-mode testing).
    pub fn with_clock(config: StitcherConfig, clock: Box<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            last_word_end_ms: None,
            last_chunk_start_ms: None,
            pending: String::new(),
            transcripts: Vec::new(),
        })
    }

    /// Processes the next chunk in capture order.
    ///
    /// Returns the chunk's transcript contribution and any utterances whose
    /// closing silence gap was detected inside this chunk. Chunks committed
    /// with a start time earlier than the previous chunk's are rejected
    /// with [`ChunkscribeError::SequenceViolation`].
    pub fn process_chunk(&mut self, chunk: &Chunk) -> Result<ChunkOutcome> {
        if let Some(previous) = self.last_chunk_start_ms
            && chunk.start_ms < previous
        {
            return Err(ChunkscribeError::SequenceViolation {
                previous,
                actual: chunk.start_ms,
            });
        }
        self.last_chunk_start_ms = Some(chunk.start_ms);

        if chunk.transcript.is_silent() {
            return Ok(self.process_silent_chunk());
        }

        let mut utterances = Vec::new();
        // Relative offset the next slice starts from; unset until the first
        // boundary of this chunk fires.
        let mut cue: Option<f64> = None;

        for word in &chunk.transcript.words {
            let abs_start = word.abs_start_ms(chunk.start_ms);
            let abs_end = word.abs_end_ms(chunk.start_ms);

            // Negative across the overlap margin; never fires a boundary.
            let gap_ms = match self.last_word_end_ms {
                Some(last) => abs_start as i64 - last as i64,
                None => 0,
            };

            if gap_ms >= self.config.silence_threshold_ms as i64 {
                let cut = word.start_sec - defaults::BOUNDARY_EPSILON_SEC;
                let piece = slicer::slice(&chunk.transcript, cue.unwrap_or(0.0), cut);
                push_piece(&mut self.pending, &piece);
                if let Some(utterance) = self.take_pending(gap_ms as f64 / 1000.0) {
                    utterances.push(utterance);
                }
                cue = Some(cut);
            }

            self.last_word_end_ms = Some(abs_end);
        }

        match cue {
            Some(from) => {
                // A boundary fired: only the tail past the last cut is still
                // unaccounted for.
                let tail = slicer::slice(&chunk.transcript, from, defaults::SLICE_OPEN_END_SEC);
                push_piece(&mut self.pending, &tail);
            }
            None => {
                // Whole-chunk continuation.
                push_piece(&mut self.pending, &chunk.transcript.full_text);
            }
        }

        self.transcripts.push(chunk.transcript.full_text.clone());
        Ok(ChunkOutcome {
            chunk_text: chunk.transcript.full_text.clone(),
            utterances,
        })
    }

    /// A chunk with no words: recorded as a silence marker, cursor and
    /// pending text untouched. In live mode the wall clock may still close
    /// the buffered utterance.
    fn process_silent_chunk(&mut self) -> ChunkOutcome {
        self.transcripts.push(defaults::SILENCE_MARKER.to_string());

        let mut utterances = Vec::new();
        if self.config.live
            && let Some(last) = self.last_word_end_ms
        {
            let gap_ms = self.clock.now_ms().saturating_sub(last);
            if gap_ms >= self.config.silence_threshold_ms
                && let Some(utterance) = self.take_pending(gap_ms as f64 / 1000.0)
            {
                utterances.push(utterance);
            }
        }

        ChunkOutcome {
            chunk_text: defaults::SILENCE_MARKER.to_string(),
            utterances,
        }
    }

    /// Closes the buffered text as an utterance, clearing the buffer.
    /// Returns None when nothing but whitespace is buffered.
    fn take_pending(&mut self, silence_gap_sec: f64) -> Option<Utterance> {
        let text = self.pending.trim().to_string();
        self.pending.clear();
        if text.is_empty() {
            None
        } else {
            Some(Utterance {
                text,
                silence_gap_sec,
            })
        }
    }

    /// Emits whatever is still buffered as a final utterance.
    ///
    /// The gap is `-1.0`: no following word exists, so none was measured.
    /// Idempotent; a second call with no intervening chunk returns None.
    pub fn flush(&mut self) -> Option<Utterance> {
        self.take_pending(-1.0)
    }

    /// The continuous transcript: per-chunk texts joined with spaces.
    ///
    /// Callable at any time; never mutates state. Overlapping audio across
    /// chunk boundaries is not deduplicated at this layer.
    pub fn full_transcript(&self) -> String {
        self.transcripts.join(" ")
    }

    /// Absolute end of the last word processed, if any word was seen.
    pub fn last_word_end_ms(&self) -> Option<u64> {
        self.last_word_end_ms
    }

    /// Number of chunks processed so far (including silent ones).
    pub fn chunks_processed(&self) -> usize {
        self.transcripts.len()
    }

    /// Text buffered since the last emitted utterance.
    pub fn pending_text(&self) -> &str {
        &self.pending
    }

    /// Returns the stitcher to its empty starting state, keeping the
    /// configuration.
    pub fn reset(&mut self) {
        self.last_word_end_ms = None;
        self.last_chunk_start_ms = None;
        self.pending.clear();
        self.transcripts.clear();
    }
}

/// Appends a slice to the pending buffer with a single space separator.
fn push_piece(pending: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if !pending.is_empty() {
        pending.push(' ');
    }
    pending.push_str(piece);
}
