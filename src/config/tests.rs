use super::AppConfig;
use crate::vad::{Aggressiveness, FrameDuration};
use clap::Parser;
use tempfile::TempDir;

fn parse(dir: &TempDir, extra: &[&str]) -> AppConfig {
    let data_path = dir.path().to_str().expect("utf-8 temp path");
    let mut argv = vec!["voicetrim", "--data-path", data_path];
    argv.extend_from_slice(extra);
    AppConfig::try_parse_from(argv).expect("CLI should parse")
}

#[test]
fn defaults_match_the_documented_values() {
    let dir = TempDir::new().unwrap();
    let config = parse(&dir, &[]);
    assert_eq!(config.vad_mode, Aggressiveness::Quality);
    assert_eq!(config.frame_duration, FrameDuration::Ms20);
    assert_eq!(config.padding_ms, 300);
    assert!(config.jobs >= 1);
    assert!(config.validate().is_ok());
}

#[test]
fn frame_ms_parses_numeric_variants() {
    let dir = TempDir::new().unwrap();
    let config = parse(&dir, &["--frame-ms", "30"]);
    assert_eq!(config.frame_duration, FrameDuration::Ms30);
}

#[test]
fn vad_mode_parses_kebab_case_variants() {
    let dir = TempDir::new().unwrap();
    let config = parse(&dir, &["--vad-mode", "very-aggressive"]);
    assert_eq!(config.vad_mode, Aggressiveness::VeryAggressive);
}

#[test]
fn rejects_missing_data_path() {
    let config = AppConfig::try_parse_from([
        "voicetrim",
        "--data-path",
        "/definitely/not/a/real/dir",
    ])
    .expect("CLI should parse");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("not an existing directory"));
}

#[test]
fn rejects_padding_shorter_than_one_frame() {
    let dir = TempDir::new().unwrap();
    let config = parse(&dir, &["--padding-ms", "10", "--frame-ms", "20"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("at least one frame"));
}

#[test]
fn rejects_oversized_padding() {
    let dir = TempDir::new().unwrap();
    let config = parse(&dir, &["--padding-ms", "600000"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--padding-ms must be at most"));
}

#[test]
fn rejects_zero_jobs() {
    let dir = TempDir::new().unwrap();
    let config = parse(&dir, &["--jobs", "0"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--jobs must be between"));
}

#[test]
fn batch_config_snapshots_cli_values() {
    let dir = TempDir::new().unwrap();
    let config = parse(&dir, &["--padding-ms", "240", "--jobs", "2"]);
    let batch = config.batch_config();
    assert_eq!(batch.data_path, config.data_path);
    assert_eq!(batch.padding_ms, 240);
    assert_eq!(batch.jobs, 2);
}
