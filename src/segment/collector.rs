//! Hangover-smoothed speech/silence segmentation.
//!
//! [`VoicedSpans`] consumes an ordered frame sequence plus per-frame
//! classifier verdicts and yields maximal voiced runs (with their lookback
//! padding) as contiguous PCM buffers. It is a single forward pass: one
//! bounded window, one in-progress span, no backtracking.

use std::collections::VecDeque;
use std::mem;

use anyhow::{bail, Result};
use tracing::debug;

use super::frame::Frame;
use crate::vad::{FrameDuration, SampleRate, SpeechClassifier};

/// Fraction of the trigger window that must agree before a state change.
const TRIGGER_RATIO: f64 = 0.9;

/// One maximal run of speech-dominated audio, padded by the lookback
/// window, handed off to the caller as an owned buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct VoicedSpan {
    /// Concatenated frame bytes, in arrival order.
    pub pcm: Vec<u8>,
    /// Timestamp of the span's first frame, in seconds.
    pub start: f64,
    /// Span length in seconds.
    pub duration: f64,
}

/// Pull-based segmenter over a frame iterator and an injected classifier.
///
/// # State machine
///
/// Starts untriggered. Each `(frame, verdict)` pair is pushed into a
/// bounded lookback window of capacity `W = padding_ms / frame_ms`; once
/// more than `TRIGGER_RATIO * W` of the buffered verdicts are voiced, the
/// segmenter triggers and seeds the in-progress span with the whole window
/// (oldest first), so leading audio just before the trigger point is kept.
/// While triggered every frame is appended to the span and the window keeps
/// tracking the most recent verdicts; once more than `TRIGGER_RATIO * W` of
/// them are non-voiced the span is emitted and the machine re-arms. A
/// non-empty span is flushed once at end of stream regardless of state.
///
/// Dropping the iterator mid-stream is safe: it owns no external handles,
/// only the window and the span buffer.
pub struct VoicedSpans<'a, I, C>
where
    I: Iterator<Item = Frame<'a>>,
    C: SpeechClassifier,
{
    frames: I,
    classifier: C,
    rate: SampleRate,
    window: VecDeque<(Frame<'a>, bool)>,
    capacity: usize,
    triggered: bool,
    span: Vec<u8>,
    span_start: f64,
    span_end: f64,
    done: bool,
}

impl<'a, I, C> VoicedSpans<'a, I, C>
where
    I: Iterator<Item = Frame<'a>>,
    C: SpeechClassifier,
{
    /// Build a segmenter, validating its parameters before any frame is
    /// consumed. `padding_ms` must span at least one frame; the window
    /// capacity is the truncating quotient of the two durations.
    pub fn new(
        frames: I,
        classifier: C,
        rate: SampleRate,
        frame_duration: FrameDuration,
        padding_ms: u64,
    ) -> Result<Self> {
        let capacity = (padding_ms / frame_duration.millis()) as usize;
        if capacity == 0 {
            bail!(
                "padding of {padding_ms} ms is shorter than one {} ms frame; \
                 the trigger window would be empty",
                frame_duration.millis()
            );
        }
        Ok(Self {
            frames,
            classifier,
            rate,
            window: VecDeque::with_capacity(capacity),
            capacity,
            triggered: false,
            span: Vec::new(),
            span_start: 0.0,
            span_end: 0.0,
            done: false,
        })
    }

    fn push_window(&mut self, frame: Frame<'a>, verdict: bool) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back((frame, verdict));
    }

    fn threshold(&self) -> f64 {
        TRIGGER_RATIO * self.capacity as f64
    }

    fn take_span(&mut self) -> VoicedSpan {
        VoicedSpan {
            pcm: mem::take(&mut self.span),
            start: self.span_start,
            duration: self.span_end - self.span_start,
        }
    }
}

impl<'a, I, C> Iterator for VoicedSpans<'a, I, C>
where
    I: Iterator<Item = Frame<'a>>,
    C: SpeechClassifier,
{
    type Item = Result<VoicedSpan>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while let Some(frame) = self.frames.next() {
            let verdict = match self.classifier.is_speech(frame.bytes, self.rate) {
                Ok(verdict) => verdict,
                Err(err) => {
                    // A failing classifier invalidates the whole pass.
                    self.done = true;
                    return Some(Err(err));
                }
            };
            if !self.triggered {
                self.push_window(frame, verdict);
                let voiced = self.window.iter().filter(|(_, speech)| *speech).count();
                if voiced as f64 > self.threshold() {
                    debug!(timestamp = frame.timestamp, voiced, "speech run triggered");
                    self.triggered = true;
                    if let Some((first, _)) = self.window.front() {
                        self.span_start = first.timestamp;
                    }
                    for (buffered, _) in self.window.drain(..) {
                        self.span.extend_from_slice(buffered.bytes);
                        self.span_end = buffered.timestamp + buffered.duration;
                    }
                }
            } else {
                self.span.extend_from_slice(frame.bytes);
                self.span_end = frame.timestamp + frame.duration;
                self.push_window(frame, verdict);
                let unvoiced = self.window.iter().filter(|(_, speech)| !*speech).count();
                if unvoiced as f64 > self.threshold() {
                    debug!(timestamp = frame.timestamp, unvoiced, "speech run ended");
                    self.triggered = false;
                    self.window.clear();
                    return Some(Ok(self.take_span()));
                }
            }
        }
        self.done = true;
        if self.span.is_empty() {
            None
        } else {
            // A run still open at end of stream is flushed as-is.
            Some(Ok(self.take_span()))
        }
    }
}
