//! Frame slicing and voiced-span segmentation.
//!
//! The pipeline is `frames` -> per-frame classifier verdicts ->
//! [`VoicedSpans`], a lazy forward pass that keeps speech-dominated runs
//! (plus a lookback padding window) and discards everything else. Each
//! instance owns its window and in-progress span exclusively, so many
//! streams can be segmented in parallel with one instance per stream.

mod collector;
mod frame;
#[cfg(test)]
mod tests;

pub use collector::{VoicedSpan, VoicedSpans};
pub use frame::{frames, Frame, FrameSlicer, BYTES_PER_SAMPLE};
