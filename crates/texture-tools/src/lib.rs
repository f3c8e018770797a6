//! # texture-tools
//!
//! Locate and verify the pre-built external binaries that the `autoheckin`
//! texture pipeline drives as subprocesses.
//!
//! ## How it works
//!
//! On a call to [`ToolPaths::locate_default`]:
//!
//! 1. Resolves the tools directory: `AUTOHECKIN_TOOLS_DIR` if set, otherwise
//!    `tools/` next to the canonicalised running executable.
//! 2. Checks every required file (executables *and* the shared libraries they
//!    load) is a regular file, in a fixed order.
//! 3. Returns a [`ToolPaths`] holding the absolute path of each executable.
//!
//! The first missing file is reported by name so the user knows what to
//! re-extract.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use texture_tools::{Tool, ToolPaths};
//!
//! let tools = ToolPaths::locate_default().expect("tools missing");
//! println!("compressor: {}", tools.get(Tool::Compressor).display());
//! ```
//!
//! ## Platform support
//!
//! | OS      | Executables            | Support libraries                        |
//! |---------|------------------------|------------------------------------------|
//! | Windows | `*.exe`                | `cuttlefish.dll`, `PVRTexLib.dll`, `nvtt.dll` |
//! | Others  | no suffix              | `libcuttlefish.so.2`, `libPVRTexLib.so`  |
//!
//! ## Environment variable overrides
//!
//! - `AUTOHECKIN_TOOLS_DIR`: directory holding the tools; skips the
//!   executable-relative lookup.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Name of the directory, next to the running executable, that holds the tools.
pub const TOOLS_SUBDIR: &str = "tools";

/// Environment variable that overrides the tools directory.
pub const TOOLS_DIR_ENV: &str = "AUTOHECKIN_TOOLS_DIR";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned while resolving the tools directory.
#[derive(Error, Debug)]
pub enum ToolsError {
    /// The running executable's location could not be determined.
    #[error("Could not resolve the executable directory: {0}")]
    ExecutableDir(#[source] std::io::Error),

    /// A required executable or support library is absent.
    #[error("'{name}' not found! Did you extract everything in the tools folder?")]
    MissingTool { name: &'static str, path: PathBuf },
}

// ── Tools ────────────────────────────────────────────────────────────────────

/// The four external programs the pipeline invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// `nvdecompress <in> <out>`: DDS to uncompressed TGA.
    Decompressor,
    /// `cuttlefish --input … --format … --output …`: block compression.
    Compressor,
    /// `DivinityMachine <in.dds>`: writes a sibling `.tga`/`.png`.
    Transformer,
    /// `EternalTextureCompressor <in>`: final in-place compression.
    FinalCompressor,
}

impl Tool {
    /// Every tool, in pipeline order.
    pub const ALL: [Tool; 4] = [
        Tool::Decompressor,
        Tool::Compressor,
        Tool::Transformer,
        Tool::FinalCompressor,
    ];

    /// Short program name used in messages, e.g. `cuttlefish`.
    pub fn label(self) -> &'static str {
        match self {
            Tool::Decompressor => "nvdecompress",
            Tool::Compressor => "cuttlefish",
            Tool::Transformer => "DivinityMachine",
            Tool::FinalCompressor => "EternalTextureCompressor",
        }
    }

    /// On-disk filename of the executable for the current platform.
    pub fn file_name(self) -> &'static str {
        let files = platform_files();
        match self {
            Tool::Decompressor => files.decompressor,
            Tool::Compressor => files.compressor,
            Tool::Transformer => files.transformer,
            Tool::FinalCompressor => files.final_compressor,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Internal: platform metadata ──────────────────────────────────────────────

struct PlatformFiles {
    decompressor: &'static str,
    compressor: &'static str,
    transformer: &'static str,
    final_compressor: &'static str,
    /// Every file that must be present, in check order.
    required: &'static [&'static str],
}

#[cfg(windows)]
fn platform_files() -> &'static PlatformFiles {
    static FILES: PlatformFiles = PlatformFiles {
        decompressor: "nvdecompress.exe",
        compressor: "cuttlefish.exe",
        transformer: "DivinityMachine.exe",
        final_compressor: "EternalTextureCompressor.exe",
        required: &[
            "cuttlefish.exe",
            "cuttlefish.dll",
            "PVRTexLib.dll",
            "nvdecompress.exe",
            "nvtt.dll",
            "DivinityMachine.exe",
            "EternalTextureCompressor.exe",
        ],
    };
    &FILES
}

#[cfg(not(windows))]
fn platform_files() -> &'static PlatformFiles {
    static FILES: PlatformFiles = PlatformFiles {
        decompressor: "nvdecompress",
        compressor: "cuttlefish",
        transformer: "DivinityMachine",
        final_compressor: "EternalTextureCompressor",
        required: &[
            "cuttlefish",
            "libcuttlefish.so.2",
            "libPVRTexLib.so",
            "nvdecompress",
            "DivinityMachine",
            "EternalTextureCompressor",
        ],
    };
    &FILES
}

/// Every file the tools directory must contain on this platform, in the
/// order they are checked.
pub fn required_files() -> &'static [&'static str] {
    platform_files().required
}

// ── Tools directory resolution ───────────────────────────────────────────────

/// Returns the directory the tools are expected in.
///
/// `AUTOHECKIN_TOOLS_DIR` wins when set; otherwise `tools/` beside the
/// canonicalised running executable.
pub fn tools_dir() -> Result<PathBuf, ToolsError> {
    resolve_tools_dir(std::env::var_os(TOOLS_DIR_ENV))
}

fn resolve_tools_dir(override_dir: Option<OsString>) -> Result<PathBuf, ToolsError> {
    if let Some(dir) = override_dir {
        return Ok(PathBuf::from(dir));
    }

    let exe = std::env::current_exe()
        .and_then(|p| p.canonicalize())
        .map_err(ToolsError::ExecutableDir)?;
    let dir = exe.parent().ok_or_else(|| {
        ToolsError::ExecutableDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("'{}' has no parent directory", exe.display()),
        ))
    })?;

    Ok(dir.join(TOOLS_SUBDIR))
}

// ── Resolved paths ───────────────────────────────────────────────────────────

/// Resolved location of every external tool.
///
/// Built once at startup and handed to the pipeline; nothing else in the
/// process knows where the tools live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    dir: PathBuf,
    decompressor: PathBuf,
    compressor: PathBuf,
    transformer: PathBuf,
    final_compressor: PathBuf,
}

impl ToolPaths {
    /// Paths inside `dir` without checking that anything exists.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            decompressor: dir.join(Tool::Decompressor.file_name()),
            compressor: dir.join(Tool::Compressor.file_name()),
            transformer: dir.join(Tool::Transformer.file_name()),
            final_compressor: dir.join(Tool::FinalCompressor.file_name()),
            dir,
        }
    }

    /// Paths inside `dir`, failing on the first required file that is not a
    /// regular file.
    pub fn locate(dir: impl Into<PathBuf>) -> Result<Self, ToolsError> {
        let paths = Self::in_dir(dir);
        if let Some((name, path)) = first_missing(&paths.dir) {
            return Err(ToolsError::MissingTool { name, path });
        }
        Ok(paths)
    }

    /// [`ToolPaths::locate`] in the directory returned by [`tools_dir`].
    pub fn locate_default() -> Result<Self, ToolsError> {
        Self::locate(tools_dir()?)
    }

    /// Directory the tools were resolved in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Executable path for `tool`.
    pub fn get(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Decompressor => &self.decompressor,
            Tool::Compressor => &self.compressor,
            Tool::Transformer => &self.transformer,
            Tool::FinalCompressor => &self.final_compressor,
        }
    }
}

fn first_missing(dir: &Path) -> Option<(&'static str, PathBuf)> {
    required_files().iter().find_map(|&name| {
        let path = dir.join(name);
        // Unreadable metadata counts as missing.
        let present = std::fs::metadata(&path)
            .map(|m| m.is_file())
            .unwrap_or(false);
        (!present).then_some((name, path))
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn populate(dir: &Path, skip: Option<&str>) {
        for name in required_files() {
            if Some(*name) != skip {
                std::fs::write(dir.join(name), b"").unwrap();
            }
        }
    }

    #[test]
    fn every_executable_is_required() {
        for tool in Tool::ALL {
            assert!(
                required_files().contains(&tool.file_name()),
                "{tool} missing from the required list"
            );
        }
    }

    #[test]
    fn locate_succeeds_when_all_present() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path(), None);

        let paths = ToolPaths::locate(tmp.path()).expect("all tools present");
        assert_eq!(paths.dir(), tmp.path());
        assert_eq!(
            paths.get(Tool::Compressor),
            tmp.path().join(Tool::Compressor.file_name())
        );
    }

    #[test]
    fn locate_reports_missing_tool_by_name() {
        let tmp = TempDir::new().unwrap();
        let missing = Tool::Transformer.file_name();
        populate(tmp.path(), Some(missing));

        match ToolPaths::locate(tmp.path()) {
            Err(ToolsError::MissingTool { name, path }) => {
                assert_eq!(name, missing);
                assert_eq!(path, tmp.path().join(missing));
            }
            other => panic!("expected MissingTool, got {other:?}"),
        }
    }

    #[test]
    fn locate_reports_first_missing_in_check_order() {
        let tmp = TempDir::new().unwrap();
        let err = ToolPaths::locate(tmp.path()).unwrap_err();
        assert!(
            err.to_string().contains(required_files()[0]),
            "got: {err}"
        );
        assert!(err.to_string().contains("tools folder"));
    }

    #[test]
    fn directory_with_tool_name_is_not_a_tool() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path(), Some(Tool::FinalCompressor.file_name()));
        std::fs::create_dir(tmp.path().join(Tool::FinalCompressor.file_name())).unwrap();

        assert!(ToolPaths::locate(tmp.path()).is_err());
    }

    #[test]
    fn tools_dir_override_wins() {
        let d = resolve_tools_dir(Some(OsString::from("/tmp/test_autoheckin_tools")));
        assert_eq!(d.unwrap(), PathBuf::from("/tmp/test_autoheckin_tools"));
    }

    #[test]
    fn tools_dir_defaults_next_to_executable() {
        let d = resolve_tools_dir(None).unwrap();
        assert_eq!(d.file_name().unwrap(), TOOLS_SUBDIR);
        let exe = std::env::current_exe().unwrap().canonicalize().unwrap();
        assert_eq!(d.parent(), exe.parent());
    }
}
