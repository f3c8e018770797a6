//! Running the external tools.
//!
//! Each stage builds a [`ToolInvocation`] (program + argument list) and hands
//! it to a [`ToolRunner`]. Arguments are passed as a vector, never joined into
//! a shell string, so paths with spaces, `$`, or quotes need no escaping on
//! any platform.
//!
//! [`SystemRunner`] is the real implementation: it spawns the process with
//! stdin/stdout/stderr attached to the null device and blocks until it exits.
//! Tests substitute their own runner to script exit codes and outputs.

use crate::pipeline::naming::TargetFormat;
use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use texture_tools::{Tool, ToolPaths};
use tracing::debug;

/// Quality preset passed to the compressor's `--quality` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressQuality {
    /// Fastest encode. (default)
    #[default]
    Lowest,
    Low,
    Normal,
    High,
    Highest,
}

impl CompressQuality {
    pub fn as_arg(self) -> &'static str {
        match self {
            CompressQuality::Lowest => "lowest",
            CompressQuality::Low => "low",
            CompressQuality::Normal => "normal",
            CompressQuality::High => "high",
            CompressQuality::Highest => "highest",
        }
    }
}

/// One external command: which tool, where it lives, and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    tool: Tool,
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolInvocation {
    pub fn new(tool: Tool, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// `nvdecompress <input> <output>`
    pub fn decompress(tools: &ToolPaths, input: &Path, output: &Path) -> Self {
        Self::new(Tool::Decompressor, tools.get(Tool::Decompressor))
            .arg(input)
            .arg(output)
    }

    /// `cuttlefish --input <in> --mipmap --quality <q> --format <fmt> --output <out>`
    pub fn compress(
        tools: &ToolPaths,
        input: &Path,
        output: &Path,
        format: TargetFormat,
        quality: CompressQuality,
    ) -> Self {
        Self::new(Tool::Compressor, tools.get(Tool::Compressor))
            .arg("--input")
            .arg(input)
            .arg("--mipmap")
            .arg("--quality")
            .arg(quality.as_arg())
            .arg("--format")
            .arg(format.as_arg())
            .arg("--output")
            .arg(output)
    }

    /// `DivinityMachine <input.dds>`
    pub fn transform(tools: &ToolPaths, input: &Path) -> Self {
        Self::new(Tool::Transformer, tools.get(Tool::Transformer)).arg(input)
    }

    /// `EternalTextureCompressor <input>`
    pub fn final_compress(tools: &ToolPaths, input: &Path) -> Self {
        Self::new(Tool::FinalCompressor, tools.get(Tool::FinalCompressor)).arg(input)
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Value following `flag` in the argument list, if any.
    pub fn flag_value(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }
}

/// Observed termination of a tool process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    code: Option<i32>,
}

impl ToolExit {
    /// `None` means the process was killed by a signal.
    pub fn from_code(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn code(self) -> Option<i32> {
        self.code
    }

    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ToolExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self::from_code(status.code())
    }
}

impl fmt::Display for ToolExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Executes tool invocations.
///
/// `Err` means the process could not be started; a process that ran and
/// failed is an `Ok` with a non-success [`ToolExit`].
pub trait ToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> std::io::Result<ToolExit>;
}

/// Spawns real processes with all output discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> std::io::Result<ToolExit> {
        debug!(
            "Running {} {:?}",
            invocation.program().display(),
            invocation.args()
        );

        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        platform::configure(&mut cmd);

        let exit = ToolExit::from(cmd.status()?);
        debug!("{} finished: {}", invocation.tool(), exit);
        Ok(exit)
    }
}

#[cfg(windows)]
mod platform {
    use std::os::windows::process::CommandExt;
    use std::process::Command;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    /// Keep console tools from flashing a window of their own.
    pub(super) fn configure(cmd: &mut Command) {
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
}

#[cfg(not(windows))]
mod platform {
    use std::process::Command;

    pub(super) fn configure(_cmd: &mut Command) {}
}
