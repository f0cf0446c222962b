//! Utterance output handlers.
//!
//! The sink receives each emitted utterance synchronously; it pairs with
//! the stitcher station the way an audio source pairs with capture. Sinks
//! must not block indefinitely — a slow sink delays every later chunk.

use crate::error::Result;
use crate::transcript::chunk::Utterance;

/// Pluggable utterance handler.
pub trait UtteranceSink: Send + 'static {
    /// Handle one emitted utterance.
    fn emit(&mut self, text: &str, silence_gap_sec: f64) -> Result<()>;

    /// Called on session shutdown. Returns accumulated text if applicable.
    fn finish(&mut self) -> Option<String> {
        None
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Collects utterances in memory, for tests and replay sessions.
pub struct CollectorSink {
    collected: Vec<Utterance>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self {
            collected: Vec::new(),
        }
    }

    /// The utterances received so far, in emission order.
    pub fn utterances(&self) -> &[Utterance] {
        &self.collected
    }
}

impl Default for CollectorSink {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceSink for CollectorSink {
    fn emit(&mut self, text: &str, silence_gap_sec: f64) -> Result<()> {
        self.collected.push(Utterance {
            text: text.to_string(),
            silence_gap_sec,
        });
        Ok(())
    }

    fn finish(&mut self) -> Option<String> {
        if self.collected.is_empty() {
            None
        } else {
            Some(
                self.collected
                    .iter()
                    .map(|u| u.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Writes each utterance to stdout with its closing gap.
pub struct StdoutSink;

impl UtteranceSink for StdoutSink {
    fn emit(&mut self, text: &str, silence_gap_sec: f64) -> Result<()> {
        if silence_gap_sec < 0.0 {
            println!("[flush] {}", text);
        } else {
            println!("[{:.2}s] {}", silence_gap_sec, text);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}
