//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;
use std::path::PathBuf;

use crate::vad::{Aggressiveness, FrameDuration};
pub use defaults::{default_jobs, DEFAULT_PADDING_MS, DEFAULT_SAVE_PATH, MAX_JOBS, MAX_PADDING_MS};

/// CLI options for the batch silence remover. Validated values are
/// snapshotted into [`BatchConfig`] before any audio is opened.
#[derive(Debug, Parser, Clone)]
#[command(about = "Remove silence from mono 16-bit PCM WAV files", author, version)]
pub struct AppConfig {
    /// Directory tree containing the input WAV files
    #[arg(long = "data-path", value_name = "DIR")]
    pub data_path: PathBuf,

    /// Directory that receives the de-silenced tree
    #[arg(long = "save-path", value_name = "DIR", default_value = DEFAULT_SAVE_PATH)]
    pub save_path: PathBuf,

    /// Voice activity detector aggressiveness mode
    #[arg(long = "vad-mode", value_enum, default_value_t = Aggressiveness::Quality)]
    pub vad_mode: Aggressiveness,

    /// Analysis frame duration (milliseconds)
    #[arg(long = "frame-ms", value_enum, default_value_t = FrameDuration::Ms20)]
    pub frame_duration: FrameDuration,

    /// Lookback padding spanned by the trigger window (milliseconds)
    #[arg(long = "padding-ms", default_value_t = DEFAULT_PADDING_MS)]
    pub padding_ms: u64,

    /// Worker threads processing files in parallel
    #[arg(long, default_value_t = default_jobs())]
    pub jobs: usize,

    /// Print the aggregate report as a single JSON line
    #[arg(long = "json-summary", default_value_t = false)]
    pub json_summary: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "VOICETRIM_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "VOICETRIM_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,
}

/// Tunable parameters for one batch pass, handed to the driver by value so
/// no component reads ambient global state.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub data_path: PathBuf,
    pub save_path: PathBuf,
    pub vad_mode: Aggressiveness,
    pub frame_duration: FrameDuration,
    pub padding_ms: u64,
    pub jobs: usize,
}
