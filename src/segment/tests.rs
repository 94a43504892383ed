use super::{frames, VoicedSpan, VoicedSpans};
use crate::vad::{FrameDuration, SampleRate, SpeechClassifier};
use anyhow::{bail, Result};

const RATE: SampleRate = SampleRate::Hz16000;
const FRAME: FrameDuration = FrameDuration::Ms20;
// 20 ms at 16 kHz, 16-bit mono.
const FRAME_LEN: usize = 640;
const PADDING_MS: u64 = 300;

#[test]
fn slicer_emits_fixed_length_frames_with_running_timestamps() {
    let audio = patterned_audio(3);
    let sliced: Vec<_> = frames(&audio, RATE, FRAME).collect();
    assert_eq!(sliced.len(), 3);
    for (index, frame) in sliced.iter().enumerate() {
        assert_eq!(frame.bytes.len(), FRAME_LEN);
        assert!((frame.timestamp - index as f64 * 0.02).abs() < 1e-9);
        assert!((frame.duration - 0.02).abs() < 1e-9);
        assert!(frame.bytes.iter().all(|byte| *byte == index as u8));
    }
}

#[test]
fn slicer_drops_trailing_partial_frame() {
    let mut audio = patterned_audio(3);
    audio.extend(std::iter::repeat(0xFF).take(FRAME_LEN - 1));
    let count = frames(&audio, RATE, FRAME).count();
    assert_eq!(count, 3);
}

#[test]
fn slicer_yields_nothing_for_input_shorter_than_one_frame() {
    let audio = vec![0u8; FRAME_LEN - 2];
    assert_eq!(frames(&audio, RATE, FRAME).count(), 0);
}

#[test]
fn slicer_is_restartable_over_the_same_buffer() {
    let audio = patterned_audio(5);
    let first: Vec<_> = frames(&audio, RATE, FRAME)
        .map(|frame| frame.bytes.to_vec())
        .collect();
    let second: Vec<_> = frames(&audio, RATE, FRAME)
        .map(|frame| frame.bytes.to_vec())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn silence_only_input_yields_no_spans() {
    let audio = patterned_audio(60);
    let spans = collect_spans(&audio, vec![false; 60], PADDING_MS);
    assert!(spans.is_empty());
}

#[test]
fn all_voiced_input_yields_single_span_with_every_byte() {
    let audio = patterned_audio(30);
    let spans = collect_spans(&audio, vec![true; 30], PADDING_MS);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].pcm.len(), audio.len());
    assert_eq!(spans[0].pcm, audio);
    assert!((spans[0].start - 0.0).abs() < 1e-9);
    assert!((spans[0].duration - 0.6).abs() < 1e-6);
}

#[test]
fn voiced_run_keeps_leading_padding_and_emits_one_span() {
    // 60 frames, frames 5..=40 voiced, 300 ms padding -> W = 15 and the
    // trigger fires once 14 of the last 15 buffered verdicts are voiced.
    let audio = patterned_audio(60);
    let script = verdict_script(60, |index| (5..=40).contains(&index));
    let spans = collect_spans(&audio, script, PADDING_MS);
    assert_eq!(spans.len(), 1);

    let span_frames = spans[0].pcm.len() / FRAME_LEN;
    assert!(
        span_frames >= 36,
        "span should cover the whole voiced run, got {span_frames} frames"
    );
    // The window held frames 4..=18 when the trigger fired, so the span
    // starts with frame 4 and keeps the padding before the first voiced
    // frame.
    assert!(spans[0].pcm[..FRAME_LEN].iter().all(|byte| *byte == 4));
    assert!(spans[0].pcm[FRAME_LEN..2 * FRAME_LEN]
        .iter()
        .all(|byte| *byte == 5));
    assert!((spans[0].start - 0.08).abs() < 1e-9);
}

#[test]
fn two_runs_separated_by_long_silence_yield_two_spans_in_order() {
    let audio = patterned_audio(100);
    let script = verdict_script(100, |index| {
        (5..=40).contains(&index) || (60..=95).contains(&index)
    });
    let spans = collect_spans(&audio, script, PADDING_MS);
    assert_eq!(spans.len(), 2);
    assert!(spans[0].start < spans[1].start);
    // Each span holds a contiguous run of original frames.
    for span in &spans {
        assert_eq!(span.pcm.len() % FRAME_LEN, 0);
        let first = span.pcm[0];
        for (offset, chunk) in span.pcm.chunks_exact(FRAME_LEN).enumerate() {
            let expected = first + offset as u8;
            assert!(chunk.iter().all(|byte| *byte == expected));
        }
    }
}

#[test]
fn spans_never_exceed_input_length() {
    let audio = patterned_audio(100);
    let script = verdict_script(100, |index| {
        (5..=40).contains(&index) || (60..=95).contains(&index)
    });
    let spans = collect_spans(&audio, script, PADDING_MS);
    let total: usize = spans.iter().map(|span| span.pcm.len()).sum();
    assert!(total <= audio.len());
}

#[test]
fn segmentation_is_deterministic_across_runs() {
    let audio = patterned_audio(60);
    let script = verdict_script(60, |index| (5..=40).contains(&index));
    let first = collect_spans(&audio, script.clone(), PADDING_MS);
    let second = collect_spans(&audio, script, PADDING_MS);
    assert_eq!(first, second);
}

#[test]
fn bounded_window_never_accumulates_stale_verdicts() {
    // 9 voiced frames out of every 10 stays at the trigger threshold for a
    // 10-frame window, so a correctly bounded window must never fire even
    // though an unbounded count would blow past it within two periods.
    let frame = FrameDuration::Ms30;
    let frame_len = 960;
    let audio = vec![0u8; frame_len * 100];
    let script: Vec<bool> = (0..100).map(|index| index % 10 != 9).collect();
    let spans = VoicedSpans::new(
        frames(&audio, RATE, frame),
        ScriptedClassifier::new(script),
        RATE,
        frame,
        300,
    )
    .expect("segmenter config")
    .map(|span| span.expect("classifier verdict"))
    .count();
    assert_eq!(spans, 0);
}

#[test]
fn classifier_failure_propagates_and_ends_the_pass() {
    let audio = patterned_audio(30);
    let classifier = FailingClassifier { failing_call: 20 };
    let mut spans = VoicedSpans::new(
        frames(&audio, RATE, FRAME),
        classifier,
        RATE,
        FRAME,
        PADDING_MS,
    )
    .expect("segmenter config");
    let first = spans.next().expect("one item before the failure");
    let err = first.expect_err("the classifier error should surface");
    assert!(err.to_string().contains("synthetic classifier failure"));
    assert!(spans.next().is_none());
}

#[test]
fn padding_shorter_than_one_frame_is_rejected() {
    let audio = patterned_audio(10);
    let err = VoicedSpans::new(
        frames(&audio, RATE, FRAME),
        ScriptedClassifier::new(vec![true; 10]),
        RATE,
        FRAME,
        10,
    )
    .err()
    .expect("zero-capacity window must be rejected");
    assert!(err.to_string().contains("shorter than one 20 ms frame"));
}

#[test]
fn abandoning_iteration_mid_stream_is_safe() {
    let audio = patterned_audio(60);
    let script = verdict_script(60, |index| index >= 2);
    let mut spans = VoicedSpans::new(
        frames(&audio, RATE, FRAME),
        ScriptedClassifier::new(script),
        RATE,
        FRAME,
        PADDING_MS,
    )
    .expect("segmenter config");
    // Pull nothing past construction and drop; nothing to clean up.
    assert!(spans.next().is_some());
    drop(spans);
}

/// Replays a fixed verdict sequence, one verdict per call; frames past the
/// end of the script read as silence.
struct ScriptedClassifier {
    script: Vec<bool>,
    cursor: usize,
}

impl ScriptedClassifier {
    fn new(script: Vec<bool>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl SpeechClassifier for ScriptedClassifier {
    fn is_speech(&mut self, _frame: &[u8], _rate: SampleRate) -> Result<bool> {
        let verdict = self.script.get(self.cursor).copied().unwrap_or(false);
        self.cursor += 1;
        Ok(verdict)
    }
}

struct FailingClassifier {
    failing_call: usize,
}

impl SpeechClassifier for FailingClassifier {
    fn is_speech(&mut self, _frame: &[u8], _rate: SampleRate) -> Result<bool> {
        if self.failing_call == 0 {
            bail!("synthetic classifier failure");
        }
        self.failing_call -= 1;
        Ok(true)
    }
}

fn patterned_audio(frame_count: usize) -> Vec<u8> {
    let mut audio = Vec::with_capacity(frame_count * FRAME_LEN);
    for index in 0..frame_count {
        audio.extend(std::iter::repeat(index as u8).take(FRAME_LEN));
    }
    audio
}

fn verdict_script(frame_count: usize, voiced: impl Fn(usize) -> bool) -> Vec<bool> {
    (0..frame_count).map(voiced).collect()
}

fn collect_spans(audio: &[u8], script: Vec<bool>, padding_ms: u64) -> Vec<VoicedSpan> {
    VoicedSpans::new(
        frames(audio, RATE, FRAME),
        ScriptedClassifier::new(script),
        RATE,
        FRAME,
        padding_ms,
    )
    .expect("segmenter config")
    .map(|span| span.expect("classifier verdict"))
    .collect()
}
