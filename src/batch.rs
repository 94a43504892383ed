//! Batch driver: walks an input tree, de-silences every WAV file, and
//! mirrors the results under the save path.
//!
//! Each file gets its own classifier and segmenter instance, so files are
//! independent and fan out across a small worker pool with no shared
//! mutable state.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::BatchConfig;
use crate::segment::{frames, VoicedSpans};
use crate::vad::EarshotClassifier;
use crate::wav::{self, PcmAudio};

/// Aggregate results for one batch pass.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchReport {
    pub files_processed: usize,
    pub files_failed: usize,
    pub spans_written: usize,
    /// Whole seconds of audio across all successfully processed inputs.
    pub original_seconds: u64,
    /// Whole seconds of audio kept after silence removal.
    pub modified_seconds: u64,
}

struct FileReport {
    spans: usize,
    original_seconds: u64,
    kept_seconds: u64,
}

/// De-silence every WAV file under `cfg.data_path`, writing one output per
/// input under `cfg.save_path` with the input's relative directory
/// preserved. Per-file failures are logged and counted; the batch keeps
/// going.
pub fn run(cfg: &BatchConfig) -> Result<BatchReport> {
    let inputs = discover_wav_files(&cfg.data_path)?;
    info!(
        "discovered {} wav file(s) under '{}'",
        inputs.len(),
        cfg.data_path.display()
    );
    info!(
        "vad mode '{}', {} ms frames, {} ms padding, {} worker(s)",
        cfg.vad_mode.label(),
        cfg.frame_duration.millis(),
        cfg.padding_ms,
        cfg.jobs
    );

    // Mirror the input tree up front so workers only ever write files.
    fs::create_dir_all(&cfg.save_path)
        .with_context(|| format!("failed to create '{}'", cfg.save_path.display()))?;
    for input in &inputs {
        let rel = input.strip_prefix(&cfg.data_path).unwrap_or(input);
        if let Some(parent) = rel.parent() {
            let dir = cfg.save_path.join(parent);
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create '{}'", dir.display()))?;
        }
    }

    let (job_tx, job_rx) = unbounded();
    for input in &inputs {
        let _ = job_tx.send(input.clone());
    }
    drop(job_tx);

    let workers = cfg.jobs.min(inputs.len()).max(1);
    let (result_tx, result_rx) = unbounded();
    let mut report = BatchReport::default();
    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for input in job_rx.iter() {
                    let outcome = process_file(&input, cfg);
                    if result_tx.send((input, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);
        drop(job_rx);

        for (input, outcome) in result_rx.iter() {
            match outcome {
                Ok(file) => {
                    info!(
                        "de-silenced '{}': {} span(s), kept {} of {} s",
                        input.display(),
                        file.spans,
                        file.kept_seconds,
                        file.original_seconds
                    );
                    report.files_processed += 1;
                    report.spans_written += file.spans;
                    report.original_seconds += file.original_seconds;
                    report.modified_seconds += file.kept_seconds;
                }
                Err(err) => {
                    warn!("skipping '{}': {err:#}", input.display());
                    report.files_failed += 1;
                }
            }
        }
    });
    Ok(report)
}

fn process_file(input: &Path, cfg: &BatchConfig) -> Result<FileReport> {
    let audio = wav::read_mono_pcm(input)?;
    let rel = input.strip_prefix(&cfg.data_path).unwrap_or(input);
    let out_dir = match rel.parent() {
        Some(parent) => cfg.save_path.join(parent),
        None => cfg.save_path.clone(),
    };
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .context("input file has no stem")?;

    let mut chunks = Vec::new();
    match desilence(&audio, cfg, &out_dir, &stem, &mut chunks) {
        Ok(kept_bytes) => Ok(FileReport {
            spans: chunks.len(),
            original_seconds: audio.whole_seconds(),
            kept_seconds: (kept_bytes / 2) as u64 / u64::from(audio.rate.hz()),
        }),
        Err(err) => {
            // Never leave half a file's intermediates behind.
            for chunk in &chunks {
                let _ = fs::remove_file(chunk);
            }
            Err(err.context(format!("failed to process '{}'", input.display())))
        }
    }
}

/// Write each voiced span as an intermediate chunk, reassemble the chunks
/// in emission order into `<stem>.wav`, then delete the intermediates.
/// Returns the number of PCM bytes kept.
fn desilence(
    audio: &PcmAudio,
    cfg: &BatchConfig,
    out_dir: &Path,
    stem: &str,
    chunks: &mut Vec<PathBuf>,
) -> Result<usize> {
    let classifier = EarshotClassifier::new(cfg.vad_mode);
    let spans = VoicedSpans::new(
        frames(&audio.pcm, audio.rate, cfg.frame_duration),
        classifier,
        audio.rate,
        cfg.frame_duration,
        cfg.padding_ms,
    )?;

    for (index, span) in spans.enumerate() {
        let span = span?;
        let chunk_path = out_dir.join(format!("{stem}-chunk-{index:03}.wav"));
        wav::write_mono_pcm(&chunk_path, &span.pcm, audio.rate)?;
        debug!(
            "wrote '{}' ({:.2}s at {:.2}s)",
            chunk_path.display(),
            span.duration,
            span.start
        );
        chunks.push(chunk_path);
    }

    let mut joined = Vec::new();
    for chunk in chunks.iter() {
        let chunk_audio = wav::read_mono_pcm(chunk)?;
        joined.extend_from_slice(&chunk_audio.pcm);
    }
    let reassembled = out_dir.join(format!("{stem}.wav"));
    wav::write_mono_pcm(&reassembled, &joined, audio.rate)?;
    for chunk in chunks.iter() {
        fs::remove_file(chunk)
            .with_context(|| format!("failed to remove intermediate '{}'", chunk.display()))?;
    }
    Ok(joined.len())
}

fn discover_wav_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_wav_files(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_wav_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory '{}'", dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read directory '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            collect_wav_files(&path, files)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("wav"))
        {
            files.push(path);
        }
    }
    Ok(())
}
