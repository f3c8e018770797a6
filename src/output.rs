//! Result types returned by a conversion batch.

use crate::pipeline::naming::TargetFormat;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of converting a single texture.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    /// Path as given by the caller.
    pub input: PathBuf,
    /// Format requested from the compressor; `None` if the job failed
    /// before a format was chosen.
    pub format: Option<TargetFormat>,
    /// Final output path on success.
    pub output: Option<PathBuf>,
    /// Human-readable error on failure.
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate counts for a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
}

/// Every job outcome plus aggregate stats, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub jobs: Vec<JobOutcome>,
    pub stats: BatchStats,
}

impl BatchReport {
    /// Number of failed jobs.
    pub fn failures(&self) -> usize {
        self.stats.failed
    }

    /// Process exit status: the failure count, saturated to `i32`.
    pub fn exit_code(&self) -> i32 {
        i32::try_from(self.stats.failed).unwrap_or(i32::MAX)
    }
}
