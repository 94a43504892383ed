//! Batch silence removal for mono 16-bit PCM WAV files.
//!
//! The pipeline slices each file into fixed-duration frames, asks a
//! WebRTC-style voice activity detector for a per-frame speech verdict,
//! stitches the voiced runs (plus lookback padding) into contiguous spans,
//! and writes one de-silenced WAV per input, mirroring the input tree.

pub mod batch;
pub mod config;
pub mod segment;
pub mod telemetry;
pub mod vad;
pub mod wav;
