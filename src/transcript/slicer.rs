//! Time-range slicing of a chunk transcript.
//!
//! Extracts the words of a [`ChunkTranscript`] that fall inside a relative
//! time range, recovering trailing punctuation from the provider's full
//! text. The word list alone loses punctuation, so each selected word is
//! located inside `full_text` and the character immediately following it is
//! kept when it is a punctuation mark.

use crate::transcript::chunk::ChunkTranscript;

/// Returns the text of every word with `start_sec >= start` and
/// `end_sec <= end`, in order, with recovered punctuation attached.
///
/// An empty or non-matching range yields `""`. A word that cannot be found
/// verbatim in `full_text` (provider normalization mismatch) falls back to
/// its bare text with a space separator; the mismatch is reported on stderr
/// but never fails the slice.
pub fn slice(transcript: &ChunkTranscript, start: f64, end: f64) -> String {
    let mut out = String::new();
    // Forward-moving search position so repeated words resolve to their own
    // occurrence rather than the first.
    let mut search_from = 0;

    for word in &transcript.words {
        if word.start_sec > end {
            // Words are ordered by start time; nothing later can match.
            break;
        }
        let included = word.start_sec >= start && word.end_sec <= end;

        // Locate excluded words too, so an included repeat of an earlier
        // word resolves to its own occurrence.
        match find_from(&transcript.full_text, &word.text, search_from) {
            Some(pos) => {
                let word_end = pos + word.text.len();
                search_from = word_end;
                if included {
                    out.push_str(&word.text);
                    if let Some(punct) = following_punctuation(&transcript.full_text, word_end) {
                        out.push(punct);
                    }
                    out.push(' ');
                }
            }
            None if included => {
                eprintln!(
                    "Reconstruction mismatch: word {:?} not found in chunk text",
                    word.text
                );
                out.push_str(&word.text);
                out.push(' ');
            }
            None => {}
        }
    }

    out.trim().to_string()
}

/// Byte position of `needle` in `haystack` at or after `from`.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..].find(needle).map(|pos| from + pos)
}

/// The punctuation character at byte position `at`, if any.
///
/// Punctuation is any character outside `[A-Za-z0-9_]` and whitespace,
/// matching what the provider appends directly after a word.
fn following_punctuation(text: &str, at: usize) -> Option<char> {
    let c = text[at..].chars().next()?;
    if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
        None
    } else {
        Some(c)
    }
}
