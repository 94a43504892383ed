//! Default values shared by the CLI definition, validation, and tests.

pub const DEFAULT_SAVE_PATH: &str = "data";
pub const DEFAULT_PADDING_MS: u64 = 300;

/// Ceiling on the lookback padding; anything longer buffers whole phrases
/// instead of a trigger window.
pub const MAX_PADDING_MS: u64 = 10_000;

pub const MAX_JOBS: usize = 128;

/// One worker per CPU by default, bounded so misreported core counts can't
/// fork-bomb the host.
pub fn default_jobs() -> usize {
    num_cpus::get().clamp(1, MAX_JOBS)
}
