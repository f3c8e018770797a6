//! Error types for the autoheckin library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] (**fatal**): the batch cannot start at all (a required
//!   tool is missing, nothing to convert). Returned as `Err(ConvertError)`
//!   before any texture is touched.
//!
//! * [`JobError`] (**non-fatal**): a single texture failed (tool exited
//!   non-zero, rename failed) but the remaining inputs are still processed.
//!   Recorded in [`crate::output::JobOutcome`] and counted towards the
//!   process exit code.

use crate::pipeline::invoke::ToolExit;
use crate::pipeline::naming::TargetFormat;
use std::path::PathBuf;
use texture_tools::ToolsError;
use thiserror::Error;

/// All fatal errors returned by the autoheckin library.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Tool directory could not be resolved or a tool is missing.
    #[error(transparent)]
    Tools(#[from] ToolsError),

    /// No input textures were given.
    #[error("No input textures given")]
    NoInputs,
}

/// A non-fatal error for a single texture.
///
/// Every variant leaves the input file untouched and no intermediates behind.
#[derive(Debug, Error)]
pub enum JobError {
    /// Input path does not exist or is not a regular file.
    #[error("{} was not found.", .path.display())]
    InputNotFound { path: PathBuf },

    /// The input path has no usable file name.
    #[error("{} is not a valid texture file name.", .path.display())]
    InvalidFileName { path: PathBuf },

    /// The tool process could not be started at all.
    #[error("Failed to run {tool} ({}): {source}", .program.display())]
    ToolLaunch {
        tool: &'static str,
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decompress texture using nvdecompress ({status}).")]
    DecompressFailed { status: ToolExit },

    #[error("Failed to convert texture to {format} using cuttlefish ({status}).")]
    CompressFailed {
        format: TargetFormat,
        status: ToolExit,
    },

    #[error("Failed to convert texture to TGA using DivinityMachine ({status}).")]
    TransformFailed { status: ToolExit },

    #[error("Failed to compress texture using EternalTextureCompressor ({status}).")]
    FinalCompressFailed { status: ToolExit },

    /// Moving the finished texture to its final name failed.
    #[error("Failed to rename {}: {source}", .from.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
