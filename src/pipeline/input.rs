//! Input resolution: validate a user-supplied path before any tool runs.
//!
//! A texture that is missing, is a directory, or has no usable file name
//! fails here without spawning a single process, so there is nothing to
//! clean up.

use crate::error::JobError;
use crate::pipeline::naming::TextureName;
use std::path::Path;
use tracing::debug;

/// Check `path` is an existing regular file and derive its [`TextureName`].
pub fn resolve_input(path: &Path) -> Result<TextureName, JobError> {
    let is_file = std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        return Err(JobError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let name = TextureName::from_path(path).ok_or_else(|| JobError::InvalidFileName {
        path: path.to_path_buf(),
    })?;

    debug!("Resolved texture: {}", path.display());
    Ok(name)
}
