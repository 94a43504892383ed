use anyhow::{bail, Result};
use voicetrim::batch;
use voicetrim::config::AppConfig;
use voicetrim::telemetry;

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    telemetry::init_tracing(&config);

    let report = batch::run(&config.batch_config())?;
    if config.json_summary {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!(
            "Processed {} wav file(s), {} failed, {} voiced span(s) written",
            report.files_processed, report.files_failed, report.spans_written
        );
        println!(
            "Original duration for all wav files: {} s",
            report.original_seconds
        );
        println!(
            "De-silenced duration for all wav files: {} s",
            report.modified_seconds
        );
    }

    if report.files_processed == 0 && report.files_failed > 0 {
        bail!("all {} input file(s) failed", report.files_failed);
    }
    Ok(())
}
