use anyhow::{Context, Result, bail};
use chunkscribe::cli::{Cli, Commands};
use chunkscribe::config::Config;
use chunkscribe::pipeline::sink::{StdoutSink, UtteranceSink};
use chunkscribe::transcript::chunk::{Chunk, ChunkTranscript, parse_chunk_name};
use chunkscribe::transcript::slicer;
use chunkscribe::transcript::stitcher::Stitcher;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Replay {
            cache_dir,
            threshold_ms,
        } => run_replay(config, &cache_dir, threshold_ms),
        Commands::Slice { file, from, to } => run_slice(&file, from, to),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display())),
        None => match Config::default_path() {
            Some(path) => Ok(Config::load_or_default(&path)?),
            None => Ok(Config::default()),
        },
    }
}

/// Replays a directory of cached provider responses through a fresh
/// stitcher, in capture order.
fn run_replay(config: Config, cache_dir: &Path, threshold_ms: Option<u64>) -> Result<()> {
    let mut stitcher_config = config.segmenter.stitcher_config();
    if let Some(threshold) = threshold_ms {
        stitcher_config.silence_threshold_ms = threshold;
    }
    // Live mode is wall-clock driven; replay is always chunk-driven.
    stitcher_config.live = false;

    let mut stitcher = Stitcher::new(stitcher_config)?;
    let mut sink = StdoutSink;

    let mut chunks = Vec::new();
    for entry in fs::read_dir(cache_dir)
        .with_context(|| format!("reading cache dir {}", cache_dir.display()))?
    {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(chunk_name) = name.strip_suffix(".json") else {
            continue;
        };
        let (start_ms, end_ms) = parse_chunk_name(chunk_name)?;
        chunks.push((start_ms, end_ms, path));
    }
    if chunks.is_empty() {
        bail!("no cached responses in {}", cache_dir.display());
    }
    chunks.sort_by_key(|(start_ms, _, _)| *start_ms);

    for (start_ms, end_ms, path) in chunks {
        let transcript = read_transcript(&path)?;
        let chunk = Chunk {
            start_ms,
            end_ms,
            transcript,
        };
        let outcome = stitcher.process_chunk(&chunk)?;
        for utterance in outcome.utterances {
            sink.emit(&utterance.text, utterance.silence_gap_sec)?;
        }
    }

    if let Some(last) = stitcher.flush() {
        sink.emit(&last.text, last.silence_gap_sec)?;
    }

    println!();
    println!("{}", stitcher.full_transcript());
    Ok(())
}

/// Slices one cached chunk transcript by a relative time range.
fn run_slice(file: &PathBuf, from: f64, to: f64) -> Result<()> {
    let transcript = read_transcript(file)?;
    println!("{}", slicer::slice(&transcript, from, to));
    Ok(())
}

fn read_transcript(path: &Path) -> Result<ChunkTranscript> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}
