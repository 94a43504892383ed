//! Fixed-duration frame slicing over raw PCM buffers.

use crate::vad::{FrameDuration, SampleRate};

/// Bytes per sample for 16-bit linear PCM.
pub const BYTES_PER_SAMPLE: usize = 2;

/// One fixed-duration slice of a PCM buffer.
///
/// Borrows the underlying audio; frames are never copied until the
/// segmenter folds them into a voiced span.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub bytes: &'a [u8],
    /// Offset of this frame from the start of the stream, in seconds.
    pub timestamp: f64,
    /// Frame length in seconds.
    pub duration: f64,
}

/// Slice `audio` into non-overlapping frames of `frame_duration` each.
///
/// The returned iterator is lazy and restartable: calling this again on the
/// same buffer yields an identical sequence, and the buffer itself is never
/// touched. A trailing run of fewer than one frame's worth of bytes is
/// dropped silently; input shorter than a single frame yields no frames at
/// all.
pub fn frames(audio: &[u8], rate: SampleRate, frame_duration: FrameDuration) -> FrameSlicer<'_> {
    let frame_len =
        rate.hz() as usize * frame_duration.millis() as usize / 1000 * BYTES_PER_SAMPLE;
    let duration = frame_len as f64 / f64::from(rate.hz()) / BYTES_PER_SAMPLE as f64;
    FrameSlicer {
        audio,
        frame_len,
        offset: 0,
        timestamp: 0.0,
        duration,
    }
}

/// Iterator produced by [`frames`]. Advances a cursor one frame at a time
/// and stamps each frame with an additively accumulated timestamp.
#[derive(Debug, Clone)]
pub struct FrameSlicer<'a> {
    audio: &'a [u8],
    frame_len: usize,
    offset: usize,
    timestamp: f64,
    duration: f64,
}

impl<'a> Iterator for FrameSlicer<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        if self.audio.len() - self.offset < self.frame_len {
            return None;
        }
        let bytes = &self.audio[self.offset..self.offset + self.frame_len];
        let frame = Frame {
            bytes,
            timestamp: self.timestamp,
            duration: self.duration,
        };
        self.offset += self.frame_len;
        self.timestamp += self.duration;
        Some(frame)
    }
}
