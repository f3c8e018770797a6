//! Progress-callback trait for per-texture conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline processes each texture. The CLI uses this to print
//! its status lines; a GUI front-end or build script can forward them
//! anywhere else.
//!
//! # Example
//!
//! ```rust
//! use autoheckin::{ConversionConfig, ConversionProgressCallback, ToolPaths};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_job_complete(&self, _index: usize, _total: usize, input: &Path, output: &Path) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{} -> {}", input.display(), output.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder(ToolPaths::in_dir("tools"))
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build();
//! ```

use crate::error::JobError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Pipeline stage about to run for a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decompress,
    Compress,
    Transform,
    FinalCompress,
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Decompress => "decompressing",
            Stage::Compress => "compressing",
            Stage::Transform => "transforming",
            Stage::FinalCompress => "final compression",
            Stage::Finalize => "renaming",
        })
    }
}

/// Called by the conversion pipeline as it processes each texture.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `index` is 1-based.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first texture.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before the input of a texture is checked.
    fn on_job_start(&self, index: usize, total: usize, input: &Path) {
        let _ = (index, total, input);
    }

    /// Called right before `stage` runs for `input`.
    fn on_stage(&self, input: &Path, stage: Stage) {
        let _ = (input, stage);
    }

    /// Called when a texture reached its final name.
    fn on_job_complete(&self, index: usize, total: usize, input: &Path, output: &Path) {
        let _ = (index, total, input, output);
    }

    /// Called when a texture failed. Intermediates are already gone.
    fn on_job_error(&self, index: usize, total: usize, input: &Path, error: &JobError) {
        let _ = (index, total, input, error);
    }

    /// Called once after the last texture.
    fn on_batch_complete(&self, total: usize, succeeded: usize) {
        let _ = (total, succeeded);
    }
}

/// Shared, thread-safe progress callback.
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

/// A no-op progress callback (default when none is provided).
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_callback_does_not_panic() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        let input = Path::new("foo.png");
        cb.on_batch_start(1);
        cb.on_job_start(1, 1, input);
        cb.on_stage(input, Stage::Compress);
        cb.on_job_complete(1, 1, input, Path::new("foo.tga"));
        cb.on_job_error(
            1,
            1,
            input,
            &JobError::InputNotFound {
                path: input.to_path_buf(),
            },
        );
        cb.on_batch_complete(1, 1);
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::Decompress.to_string(), "decompressing");
        assert_eq!(Stage::FinalCompress.to_string(), "final compression");
    }
}
