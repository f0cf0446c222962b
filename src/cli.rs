//! Command-line interface for chunkscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Continuous chunked transcription stitching
#[derive(Parser, Debug)]
#[command(
    name = "chunkscribe",
    version,
    about = "Continuous chunked transcription stitching"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay cached provider responses through the stitcher
    ///
    /// Reads `{start_ms}_{end_ms}.wav.json` files from the cache
    /// directory, commits them in capture order, and prints the utterance
    /// stream followed by the full transcript.
    Replay {
        /// Directory holding cached provider responses
        cache_dir: PathBuf,

        /// Silence threshold override in milliseconds
        #[arg(long, value_name = "MS")]
        threshold_ms: Option<u64>,
    },

    /// Slice one cached chunk transcript by relative time range
    Slice {
        /// Cached provider response (JSON)
        file: PathBuf,

        /// Range start in seconds, relative to the chunk
        #[arg(long, value_name = "SEC")]
        from: f64,

        /// Range end in seconds, relative to the chunk
        #[arg(long, value_name = "SEC")]
        to: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_replay() {
        let cli = Cli::parse_from(["chunkscribe", "replay", "cache/", "--threshold-ms", "250"]);
        match cli.command {
            Commands::Replay {
                cache_dir,
                threshold_ms,
            } => {
                assert_eq!(cache_dir, PathBuf::from("cache/"));
                assert_eq!(threshold_ms, Some(250));
            }
            _ => panic!("expected replay command"),
        }
    }

    #[test]
    fn test_cli_parses_slice() {
        let cli = Cli::parse_from([
            "chunkscribe",
            "slice",
            "cache/0_7000.wav.json",
            "--from",
            "1.0",
            "--to",
            "6.5",
        ]);
        match cli.command {
            Commands::Slice { file, from, to } => {
                assert_eq!(file, PathBuf::from("cache/0_7000.wav.json"));
                assert_eq!(from, 1.0);
                assert_eq!(to, 6.5);
            }
            _ => panic!("expected slice command"),
        }
    }
}
