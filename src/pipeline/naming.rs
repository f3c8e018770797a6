//! Naming policy: everything the pipeline decides from a texture's file name.
//!
//! Texture file names carry their own conversion instructions. A `$`
//! introduces property markers (`wall$bc7.tga`), a `_n` / `_Normal` suffix
//! marks a normal map, and a `.png` embedded before the properties asks the
//! transform tool for PNG output (`hud.png$bc7.tga`). The checks here are
//! plain string tests on purpose: existing asset trees depend on these exact
//! patterns.

use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Block-compressed format requested from the compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetFormat {
    /// Colour textures (default).
    #[serde(rename = "BC1_RGBA")]
    Bc1Rgba,
    /// Requested explicitly with a `$bc7` marker.
    #[serde(rename = "BC7")]
    Bc7,
    /// Normal maps (`_n`, `_Normal`).
    #[serde(rename = "BC5")]
    Bc5,
}

impl TargetFormat {
    /// Value passed to the compressor's `--format` flag.
    pub fn as_arg(self) -> &'static str {
        match self {
            TargetFormat::Bc1Rgba => "BC1_RGBA",
            TargetFormat::Bc7 => "BC7",
            TargetFormat::Bc5 => "BC5",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// Extension of the file the transform tool writes beside its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputExt {
    #[default]
    Tga,
    Png,
}

impl OutputExt {
    /// Extension without the dot, e.g. `tga`.
    pub fn extension(self) -> &'static str {
        match self {
            OutputExt::Tga => "tga",
            OutputExt::Png => "png",
        }
    }

    /// Extension with the dot, e.g. `.tga`, for appending to a path.
    pub fn suffix(self) -> &'static str {
        match self {
            OutputExt::Tga => ".tga",
            OutputExt::Png => ".png",
        }
    }
}

/// The file name of one input texture and the names derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureName {
    file_name: String,
    stripped: String,
}

impl TextureName {
    pub fn new(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let end = file_name
            .find(|c| c == '.' || c == '$')
            .unwrap_or(file_name.len());
        let stripped = file_name[..end].to_string();
        Self {
            file_name,
            stripped,
        }
    }

    /// Name of the last component of `path`.
    ///
    /// `None` for paths like `..` and for names that are not valid UTF-8,
    /// since the output name is cut out of the input name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        Some(Self::new(file_name))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File name up to (not including) the first `.` or `$`.
    pub fn stripped(&self) -> &str {
        &self.stripped
    }

    /// Whether the name carries `$` property markers.
    pub fn has_properties(&self) -> bool {
        self.file_name.contains('$')
    }

    /// Whether the input is a DDS container that must be decompressed first.
    pub fn is_dds(&self) -> bool {
        Path::new(&self.file_name).extension() == Some(OsStr::new("dds"))
    }

    pub fn is_normal_map(&self) -> bool {
        self.stripped.ends_with("_n") || self.stripped.ends_with("_Normal")
    }

    /// `$bc7` wins over the normal-map suffix; everything else is BC1.
    pub fn target_format(&self) -> TargetFormat {
        if self.file_name.contains("$bc7") {
            TargetFormat::Bc7
        } else if self.is_normal_map() {
            TargetFormat::Bc5
        } else {
            TargetFormat::Bc1Rgba
        }
    }

    /// The file stem cut at the position of the first `$` in the *full* file
    /// name. The index is taken from the file name, not the stem.
    pub fn stripped_properties_name(&self) -> &str {
        let stem = Path::new(&self.file_name)
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("");
        match self.file_name.find('$') {
            Some(i) if i < stem.len() => &stem[..i],
            _ => stem,
        }
    }

    /// Extension of the file the transform tool will produce.
    pub fn transform_output_ext(&self) -> OutputExt {
        if self.stripped_properties_name().ends_with(".png") {
            OutputExt::Png
        } else {
            OutputExt::Tga
        }
    }
}

/// `path` with `suffix` appended verbatim: `foo.dds` + `.tga` → `foo.dds.tga`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Where the finished texture for `input` ends up.
///
/// Names with `$` markers become the bare stripped name with no extension;
/// everything else gets its extension replaced by `ext`. Returns `None` when
/// the stripped name is empty.
pub fn final_output_path(input: &Path, name: &TextureName, ext: OutputExt) -> Option<PathBuf> {
    if name.has_properties() {
        if name.stripped().is_empty() {
            return None;
        }
        Some(input.with_file_name(name.stripped()))
    } else {
        Some(input.with_extension(ext.extension()))
    }
}

/// `path` if it is free, otherwise the first free `stem-N[.ext]` for N ≥ 2.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (2u32..)
        .map(|i| path.with_file_name(format!("{stem}-{i}{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}
