//! Stitcher station: the single consumer committing chunks in order.
//!
//! Provider results arrive in completion order (cache hits return faster
//! than provider calls), but the stitcher is order-sensitive. Results are
//! buffered by chunk id and drained strictly in id order, so the engine
//! only ever sees a non-decreasing start-time sequence.

use crate::error::Result;
use crate::pipeline::provider_station::TranscribedChunk;
use crate::pipeline::sink::UtteranceSink;
use crate::transcript::chunk::{Chunk, Utterance};
use crate::transcript::stitcher::Stitcher;
use std::collections::BTreeMap;
use tokio::sync::mpsc;

/// Ordered commit queue around an owned [`Stitcher`].
pub struct StitcherStation {
    stitcher: Stitcher,
    /// Results waiting for an earlier chunk, keyed by chunk id.
    buffered: BTreeMap<u64, Chunk>,
    /// Next chunk id the stitcher will accept.
    next_chunk_id: u64,
}

impl StitcherStation {
    pub fn new(stitcher: Stitcher) -> Self {
        Self {
            stitcher,
            buffered: BTreeMap::new(),
            next_chunk_id: 0,
        }
    }

    /// Submits one provider result, committing every chunk that is now
    /// ready. Returns the utterances emitted by the drained chunks.
    pub fn submit(&mut self, chunk_id: u64, chunk: Chunk) -> Result<Vec<Utterance>> {
        self.buffered.insert(chunk_id, chunk);

        let mut emitted = Vec::new();
        while let Some(chunk) = self.buffered.remove(&self.next_chunk_id) {
            let outcome = self.stitcher.process_chunk(&chunk)?;
            emitted.extend(outcome.utterances);
            self.next_chunk_id += 1;
        }
        Ok(emitted)
    }

    /// Number of results waiting for an earlier chunk.
    pub fn buffered(&self) -> usize {
        self.buffered.len()
    }

    /// Flushes the stitcher's buffered text as a final utterance.
    pub fn flush(&mut self) -> Option<Utterance> {
        self.stitcher.flush()
    }

    /// The continuous transcript accumulated so far.
    pub fn full_transcript(&self) -> String {
        self.stitcher.full_transcript()
    }

    /// Runs the station until the input closes, forwarding utterances to
    /// the sink and flushing at end of session.
    ///
    /// A provider error aborts the session: the stitcher's state for
    /// already-committed chunks is preserved, but the error propagates to
    /// the caller rather than being swallowed as silence.
    pub async fn run(
        mut self,
        mut input: mpsc::Receiver<Result<TranscribedChunk>>,
        mut sink: Box<dyn UtteranceSink>,
    ) -> Result<String> {
        while let Some(result) = input.recv().await {
            let transcribed = result?;
            for utterance in self.submit(transcribed.chunk_id, transcribed.chunk)? {
                sink.emit(&utterance.text, utterance.silence_gap_sec)?;
            }
        }

        if let Some(last) = self.flush() {
            sink.emit(&last.text, last.silence_gap_sec)?;
        }
        Ok(self.full_transcript())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sink::CollectorSink;
    use crate::transcript::chunk::{ChunkTranscript, Word};
    use crate::transcript::stitcher::StitcherConfig;

    fn chunk(start_ms: u64, full_text: &str, words: &[(&str, f64, f64)]) -> Chunk {
        Chunk {
            start_ms,
            end_ms: start_ms + 7000,
            transcript: ChunkTranscript {
                words: words
                    .iter()
                    .map(|(text, start, end)| Word::new(*text, *start, *end))
                    .collect(),
                full_text: full_text.to_string(),
            },
        }
    }

    fn station(threshold_ms: u64) -> StitcherStation {
        let stitcher = Stitcher::new(StitcherConfig {
            silence_threshold_ms: threshold_ms,
            live: false,
        })
        .unwrap();
        StitcherStation::new(stitcher)
    }

    #[test]
    fn test_submit_in_order() {
        let mut station = station(200);

        let emitted = station
            .submit(0, chunk(0, "hi", &[("hi", 0.0, 0.3)]))
            .unwrap();
        assert!(emitted.is_empty());

        let emitted = station
            .submit(1, chunk(1000, "there", &[("there", 0.05, 0.4)]))
            .unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].text, "hi");
    }

    #[test]
    fn test_submit_out_of_order_buffers_until_ready() {
        let mut station = station(200);

        // Chunk 1 completes first (cache hit); nothing drains yet.
        let emitted = station
            .submit(1, chunk(1000, "there", &[("there", 0.05, 0.4)]))
            .unwrap();
        assert!(emitted.is_empty());
        assert_eq!(station.buffered(), 1);

        // Chunk 0 arrives: both drain, in order.
        let emitted = station
            .submit(0, chunk(0, "hi", &[("hi", 0.0, 0.3)]))
            .unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].text, "hi");
        assert_eq!(station.buffered(), 0);
        assert_eq!(station.full_transcript(), "hi there");
    }

    #[test]
    fn test_flush_after_session() {
        let mut station = station(200);
        station
            .submit(0, chunk(0, "pending", &[("pending", 0.0, 0.4)]))
            .unwrap();

        let last = station.flush().unwrap();
        assert_eq!(last.text, "pending");
        assert_eq!(last.silence_gap_sec, -1.0);
        assert!(station.flush().is_none());
    }

    #[tokio::test]
    async fn test_run_forwards_to_sink_and_flushes() {
        let station = station(200);
        let (input_tx, input_rx) = mpsc::channel(10);

        let handle = tokio::spawn(async move {
            let sink = Box::new(CollectorSink::new());
            station.run(input_rx, sink).await
        });

        input_tx
            .send(Ok(TranscribedChunk {
                chunk_id: 0,
                chunk: chunk(0, "hi", &[("hi", 0.0, 0.3)]),
            }))
            .await
            .unwrap();
        input_tx
            .send(Ok(TranscribedChunk {
                chunk_id: 1,
                chunk: chunk(1000, "there", &[("there", 0.05, 0.4)]),
            }))
            .await
            .unwrap();
        drop(input_tx);

        let transcript = handle.await.unwrap().unwrap();
        assert_eq!(transcript, "hi there");
    }

    #[tokio::test]
    async fn test_run_aborts_on_provider_error() {
        let station = station(200);
        let (input_tx, input_rx) = mpsc::channel(10);

        let handle = tokio::spawn(async move {
            let sink = Box::new(CollectorSink::new());
            station.run(input_rx, sink).await
        });

        input_tx
            .send(Err(crate::error::ChunkscribeError::Provider {
                message: "quota exceeded".to_string(),
            }))
            .await
            .unwrap();
        drop(input_tx);

        assert!(handle.await.unwrap().is_err());
    }
}
