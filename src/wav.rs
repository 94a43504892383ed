//! Mono 16-bit PCM WAV read/write.
//!
//! Container glue around the core: files are decoded to raw little-endian
//! byte buffers before slicing, and span buffers are written back under the
//! same spec. Header checks fail fast so nothing downstream re-validates.

use std::path::Path;

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::vad::SampleRate;

/// Decoded contents of one input file.
#[derive(Debug)]
pub struct PcmAudio {
    /// Raw little-endian 16-bit samples.
    pub pcm: Vec<u8>,
    pub rate: SampleRate,
}

impl PcmAudio {
    /// Whole seconds of audio, truncating (sample count / rate).
    pub fn whole_seconds(&self) -> u64 {
        (self.pcm.len() / 2) as u64 / u64::from(self.rate.hz())
    }
}

/// Read a WAV file, insisting on mono 16-bit integer PCM at a supported
/// sample rate. Anything else is a configuration error, reported before
/// any frame is sliced.
pub fn read_mono_pcm(path: &Path) -> Result<PcmAudio> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
    let spec = reader.spec();
    if spec.channels != 1 {
        bail!(
            "'{}' has {} channels; only mono input is supported",
            path.display(),
            spec.channels
        );
    }
    if spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int {
        bail!(
            "'{}' is {}-bit {} audio; only 16-bit integer PCM is supported",
            path.display(),
            spec.bits_per_sample,
            match spec.sample_format {
                SampleFormat::Int => "integer",
                SampleFormat::Float => "float",
            }
        );
    }
    let rate = SampleRate::from_hz(spec.sample_rate)
        .with_context(|| format!("cannot process '{}'", path.display()))?;

    let mut pcm = Vec::with_capacity(reader.len() as usize * 2);
    for sample in reader.into_samples::<i16>() {
        let sample =
            sample.with_context(|| format!("failed to decode '{}'", path.display()))?;
        pcm.extend_from_slice(&sample.to_le_bytes());
    }
    Ok(PcmAudio { pcm, rate })
}

/// Write a raw PCM buffer as a mono 16-bit WAV at the given rate.
pub fn write_mono_pcm(path: &Path, pcm: &[u8], rate: SampleRate) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: rate.hz(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    for pair in pcm.chunks_exact(2) {
        writer
            .write_sample(i16::from_le_bytes([pair[0], pair[1]]))
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("failed to finalize '{}'", path.display()))?;
    Ok(())
}
