//! Configuration types for texture conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The resolved tool locations are part
//! of the config and are passed explicitly into the pipeline; nothing reads
//! them from ambient state.

use crate::pipeline::invoke::CompressQuality;
use crate::progress::ProgressCallback;
use std::fmt;
use texture_tools::ToolPaths;

/// Configuration for a batch of texture conversions.
///
/// # Example
/// ```rust
/// use autoheckin::{CompressQuality, ConversionConfig, ToolPaths};
///
/// let config = ConversionConfig::builder(ToolPaths::in_dir("tools"))
///     .quality(CompressQuality::Normal)
///     .no_clobber(true)
///     .build();
/// assert!(config.no_clobber);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Where the external tools live. Resolved once at startup.
    pub tools: ToolPaths,

    /// Compressor quality preset. Default: [`CompressQuality::Lowest`].
    ///
    /// The final compressor re-encodes the texture anyway, so the intermediate
    /// DDS only needs to be good enough to survive the transform step.
    pub quality: CompressQuality,

    /// Skip the final compressor and rename the transform output directly.
    /// Default: false.
    ///
    /// Useful when inspecting the transform tool's output by hand.
    pub skip_final_compression: bool,

    /// Never overwrite an existing file at the final path; pick `name-2`,
    /// `name-3`, … instead. Default: false.
    ///
    /// Without this, converting `foo.tga` replaces the input itself, since
    /// its final path is `foo.tga` again.
    pub no_clobber: bool,

    /// Leave the decompressed `P.tga` on disk when the compressor fails.
    /// Default: false.
    ///
    /// Older releases of the tool left this file behind; scripts that look
    /// for it can opt back in.
    pub keep_intermediate_on_compress_failure: bool,

    /// Optional progress callback for per-texture events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("tools", &self.tools)
            .field("quality", &self.quality)
            .field("skip_final_compression", &self.skip_final_compression)
            .field("no_clobber", &self.no_clobber)
            .field(
                "keep_intermediate_on_compress_failure",
                &self.keep_intermediate_on_compress_failure,
            )
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Default configuration for the given tools.
    pub fn new(tools: ToolPaths) -> Self {
        Self {
            tools,
            quality: CompressQuality::default(),
            skip_final_compression: false,
            no_clobber: false,
            keep_intermediate_on_compress_failure: false,
            progress_callback: None,
        }
    }

    /// Create a new builder for `ConversionConfig`.
    pub fn builder(tools: ToolPaths) -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::new(tools),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn quality(mut self, quality: CompressQuality) -> Self {
        self.config.quality = quality;
        self
    }

    pub fn skip_final_compression(mut self, v: bool) -> Self {
        self.config.skip_final_compression = v;
        self
    }

    pub fn no_clobber(mut self, v: bool) -> Self {
        self.config.no_clobber = v;
        self
    }

    pub fn keep_intermediate_on_compress_failure(mut self, v: bool) -> Self {
        self.config.keep_intermediate_on_compress_failure = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn build(self) -> ConversionConfig {
        self.config
    }
}
