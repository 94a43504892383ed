use super::{AppConfig, BatchConfig, MAX_JOBS, MAX_PADDING_MS};
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before any audio is opened.
    pub fn validate(&self) -> Result<()> {
        if !self.data_path.is_dir() {
            bail!(
                "--data-path '{}' is not an existing directory",
                self.data_path.display()
            );
        }
        if self.save_path.as_os_str().is_empty() {
            bail!("--save-path must not be empty");
        }
        // The trigger window must hold at least one frame.
        if self.padding_ms < self.frame_duration.millis() {
            bail!(
                "--padding-ms must be at least one frame ({} ms), got {}",
                self.frame_duration.millis(),
                self.padding_ms
            );
        }
        if self.padding_ms > MAX_PADDING_MS {
            bail!(
                "--padding-ms must be at most {MAX_PADDING_MS}, got {}",
                self.padding_ms
            );
        }
        if !(1..=MAX_JOBS).contains(&self.jobs) {
            bail!("--jobs must be between 1 and {MAX_JOBS}, got {}", self.jobs);
        }
        Ok(())
    }

    /// Snapshot the validated CLI values for the batch driver.
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            data_path: self.data_path.clone(),
            save_path: self.save_path.clone(),
            vad_mode: self.vad_mode,
            frame_duration: self.frame_duration,
            padding_ms: self.padding_ms,
            jobs: self.jobs,
        }
    }
}
