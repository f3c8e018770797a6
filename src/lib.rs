//! # autoheckin
//!
//! Turn source textures into game-ready assets by driving a fixed chain of
//! pre-built external tools.
//!
//! The crate does no image processing of its own. Its job is to pick the
//! right arguments for each tool from the texture's file name, run the tools
//! in order, stop at the first failure, and leave the directory clean: either
//! the finished texture exists or nothing new does.
//!
//! ## Pipeline Overview
//!
//! ```text
//! texture
//!  │
//!  ├─ 1. Input       check the path is a regular file
//!  ├─ 2. Decompress  nvdecompress P → P.tga (only for .dds)
//!  ├─ 3. Compress    cuttlefish → P.dds as BC1_RGBA / BC5 / BC7
//!  ├─ 4. Transform   DivinityMachine P.dds → P.tga or P.png
//!  ├─ 5. Final pass  EternalTextureCompressor, in place
//!  └─ 6. Rename      P.<ext> → final name
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autoheckin::{convert, ConversionConfig, ToolPaths};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tools = ToolPaths::locate_default()?;
//!     let config = ConversionConfig::new(tools);
//!     let report = convert(&["rock_n.dds", "wall$bc7.tga"], &config)?;
//!     for job in &report.jobs {
//!         println!("{:?} -> {:?}", job.input, job.output);
//!     }
//!     std::process::exit(report.exit_code());
//! }
//! ```
//!
//! ## Naming conventions
//!
//! | File name            | Format     | Final output |
//! |----------------------|------------|--------------|
//! | `foo.png`            | `BC1_RGBA` | `foo.tga`    |
//! | `rock_n.dds`         | `BC5`      | `rock_n.tga` |
//! | `wall$bc7.tga`       | `BC7`      | `wall`       |
//! | `hud.png$bc7.tga`    | `BC7`      | `hud` (PNG transform output) |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `autoheckin` binary (clap + anyhow + tracing-subscriber + indicatif + serde_json) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_file, convert_file_with_runner, convert_with_runner};
pub use error::{ConvertError, JobError};
pub use output::{BatchReport, BatchStats, JobOutcome};
pub use pipeline::invoke::{CompressQuality, SystemRunner, ToolExit, ToolInvocation, ToolRunner};
pub use pipeline::naming::{OutputExt, TargetFormat, TextureName};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
pub use texture_tools::{Tool, ToolPaths, ToolsError};
