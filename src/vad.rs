//! Speech/non-speech classification for fixed-duration PCM frames.
//!
//! The segmenter only sees the [`SpeechClassifier`] trait; the production
//! implementation wraps the `earshot` WebRTC-style detector.

use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use earshot::{VoiceActivityDetector, VoiceActivityProfile};

/// Sample rates the classifier accepts, in Hz.
pub const SUPPORTED_RATES_HZ: [u32; 4] = [8_000, 16_000, 32_000, 48_000];

/// A sample rate from the supported set.
///
/// Constructed through [`SampleRate::from_hz`], which rejects everything
/// outside [`SUPPORTED_RATES_HZ`] so downstream code never has to re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRate {
    Hz8000,
    Hz16000,
    Hz32000,
    Hz48000,
}

impl SampleRate {
    pub fn from_hz(hz: u32) -> Result<Self> {
        match hz {
            8_000 => Ok(SampleRate::Hz8000),
            16_000 => Ok(SampleRate::Hz16000),
            32_000 => Ok(SampleRate::Hz32000),
            48_000 => Ok(SampleRate::Hz48000),
            other => bail!(
                "unsupported sample rate {other} Hz (supported: 8000, 16000, 32000, 48000)"
            ),
        }
    }

    pub fn hz(self) -> u32 {
        match self {
            SampleRate::Hz8000 => 8_000,
            SampleRate::Hz16000 => 16_000,
            SampleRate::Hz32000 => 32_000,
            SampleRate::Hz48000 => 48_000,
        }
    }
}

/// Detector aggressiveness ladder, least to most strict about what counts
/// as speech. Matches the classic WebRTC VAD modes 0-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Aggressiveness {
    #[default]
    Quality,
    LowBitrate,
    Aggressive,
    VeryAggressive,
}

impl Aggressiveness {
    fn profile(self) -> VoiceActivityProfile {
        match self {
            Aggressiveness::Quality => VoiceActivityProfile::QUALITY,
            Aggressiveness::LowBitrate => VoiceActivityProfile::LBR,
            Aggressiveness::Aggressive => VoiceActivityProfile::AGGRESSIVE,
            Aggressiveness::VeryAggressive => VoiceActivityProfile::VERY_AGGRESSIVE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Aggressiveness::Quality => "quality",
            Aggressiveness::LowBitrate => "low-bitrate",
            Aggressiveness::Aggressive => "aggressive",
            Aggressiveness::VeryAggressive => "very-aggressive",
        }
    }
}

/// Frame durations the detector accepts.
///
/// Frame size in samples = (sample_rate * frame_duration_ms) / 1000, so a
/// 20 ms frame at 16 kHz is 320 samples (640 bytes of 16-bit PCM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FrameDuration {
    #[value(name = "10")]
    Ms10,
    #[default]
    #[value(name = "20")]
    Ms20,
    #[value(name = "30")]
    Ms30,
}

impl FrameDuration {
    pub fn from_millis(ms: u64) -> Result<Self> {
        match ms {
            10 => Ok(FrameDuration::Ms10),
            20 => Ok(FrameDuration::Ms20),
            30 => Ok(FrameDuration::Ms30),
            other => bail!("unsupported frame duration {other} ms (supported: 10, 20, 30)"),
        }
    }

    pub fn millis(self) -> u64 {
        match self {
            FrameDuration::Ms10 => 10,
            FrameDuration::Ms20 => 20,
            FrameDuration::Ms30 => 30,
        }
    }
}

/// Per-frame speech classifier.
///
/// Implementations must be deterministic for a given frame + rate and keep
/// no hidden per-stream adaptation: the segmenter assumes a verdict depends
/// only on the frame it was asked about. Failures propagate to the caller
/// unchanged; a classifier that cannot judge a frame invalidates the whole
/// segmentation pass.
pub trait SpeechClassifier {
    fn is_speech(&mut self, frame: &[u8], rate: SampleRate) -> Result<bool>;
}

/// WebRTC-style voice activity detector backed by `earshot`.
///
/// Construct one per input stream with a fixed aggressiveness mode, the way
/// the original WebRTC API hands out one `Vad` per pass.
pub struct EarshotClassifier {
    detector: VoiceActivityDetector,
    scratch: Vec<i16>,
}

impl EarshotClassifier {
    pub fn new(mode: Aggressiveness) -> Self {
        Self {
            detector: VoiceActivityDetector::new(mode.profile()),
            scratch: Vec::new(),
        }
    }
}

impl SpeechClassifier for EarshotClassifier {
    fn is_speech(&mut self, frame: &[u8], rate: SampleRate) -> Result<bool> {
        self.scratch.clear();
        self.scratch.reserve(frame.len() / 2);
        for pair in frame.chunks_exact(2) {
            self.scratch.push(i16::from_le_bytes([pair[0], pair[1]]));
        }
        let verdict = match rate {
            SampleRate::Hz8000 => self.detector.predict_8khz(&self.scratch),
            SampleRate::Hz16000 => self.detector.predict_16khz(&self.scratch),
            SampleRate::Hz32000 => self.detector.predict_32khz(&self.scratch),
            SampleRate::Hz48000 => self.detector.predict_48khz(&self.scratch),
        };
        verdict.map_err(|err| {
            anyhow!(
                "voice activity detector rejected a {}-sample frame at {} Hz: {err:?}",
                self.scratch.len(),
                rate.hz()
            )
        })
    }
}
