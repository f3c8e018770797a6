//! Advisory cleanup of intermediate files.
//!
//! Every file a stage produces for the next one is wrapped in an
//! [`Intermediate`] before the producing tool runs. Dropping the guard deletes
//! the file, so an early `?` return anywhere in the pipeline leaves nothing
//! behind, the same way `tempfile::TempDir` cleans up on drop. Only the final
//! output is released with [`Intermediate::keep`].
//!
//! Deletion errors are logged and swallowed: cleanup runs on paths that are
//! already failing or already consumed, and must never turn into a new error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file that is removed when the guard is dropped unless kept.
#[derive(Debug)]
pub struct Intermediate {
    path: PathBuf,
    armed: bool,
}

impl Intermediate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Disarm the guard and hand the path back; the file stays on disk.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for Intermediate {
    fn drop(&mut self) {
        if self.armed {
            remove_quietly(&self.path);
        }
    }
}

/// Delete `path`, ignoring every error.
pub fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("Removed intermediate {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => debug!("Could not remove {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_drop_removes_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("foo.png.dds");
        std::fs::write(&path, b"dds").unwrap();

        drop(Intermediate::new(&path));
        assert!(!path.exists());
    }

    #[test]
    fn test_keep_leaves_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("foo.png.tga");
        std::fs::write(&path, b"tga").unwrap();

        let kept = Intermediate::new(&path).keep();
        assert_eq!(kept, path);
        assert!(path.exists());
    }

    #[test]
    fn test_missing_file_is_fine() {
        let tmp = TempDir::new().unwrap();
        drop(Intermediate::new(tmp.path().join("never-written.tga")));
    }

    #[test]
    fn test_directory_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("foo.tga");
        std::fs::create_dir(&dir).unwrap();

        remove_quietly(&dir);
        assert!(dir.is_dir());
    }
}
