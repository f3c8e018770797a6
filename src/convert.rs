//! Conversion entry points: run the tool chain for each input texture.
//!
//! Every texture goes through the same fail-fast sequence:
//!
//! ```text
//! [nvdecompress P → P.tga]        only for .dds inputs
//! cuttlefish (P | P.tga) → P.dds
//! DivinityMachine P.dds → P.tga | P.png
//! EternalTextureCompressor P.<ext>  (in place)
//! rename P.<ext> → final path
//! ```
//!
//! The first failing stage ends the job. Each intermediate is wrapped in an
//! [`Intermediate`] guard *before* the tool that writes it runs, so whatever
//! the exit path the only file left behind is the finished texture. One
//! job's failure never stops the batch; it is counted and the next input is
//! processed.

use crate::config::ConversionConfig;
use crate::error::{ConvertError, JobError};
use crate::output::{BatchReport, BatchStats, JobOutcome};
use crate::pipeline::cleanup::Intermediate;
use crate::pipeline::input;
use crate::pipeline::invoke::{SystemRunner, ToolExit, ToolInvocation, ToolRunner};
use crate::pipeline::naming::{self, TargetFormat, TextureName};
use crate::progress::{ConversionProgressCallback, Stage};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use texture_tools::ToolPaths;
use tracing::{debug, info, warn};

/// Convert every texture in `inputs` with the real tools.
///
/// Verifies the tools directory first; a missing tool is fatal and nothing is
/// converted.
///
/// # Returns
/// `Ok(BatchReport)` even if some textures failed
/// (check `report.stats.failed` or [`BatchReport::exit_code`]).
///
/// # Errors
/// - [`ConvertError::NoInputs`] if `inputs` is empty
/// - [`ConvertError::Tools`] if a required tool file is missing
pub fn convert<P: AsRef<Path>>(
    inputs: &[P],
    config: &ConversionConfig,
) -> Result<BatchReport, ConvertError> {
    if inputs.is_empty() {
        return Err(ConvertError::NoInputs);
    }
    ToolPaths::locate(config.tools.dir())?;
    convert_with_runner(inputs, config, &SystemRunner)
}

/// [`convert`] with a caller-supplied [`ToolRunner`] and no tools check.
pub fn convert_with_runner<P: AsRef<Path>>(
    inputs: &[P],
    config: &ConversionConfig,
    runner: &dyn ToolRunner,
) -> Result<BatchReport, ConvertError> {
    if inputs.is_empty() {
        return Err(ConvertError::NoInputs);
    }

    let total = inputs.len();
    let batch_start = Instant::now();
    notify(config, |cb| cb.on_batch_start(total));
    info!("Converting {} textures", total);

    let mut jobs = Vec::with_capacity(total);
    for (i, input) in inputs.iter().enumerate() {
        let input = input.as_ref();
        let index = i + 1;
        notify(config, |cb| cb.on_job_start(index, total, input));

        let job_start = Instant::now();
        let (format, result) = convert_job(input, config, runner);
        let duration_ms = elapsed_ms(job_start.elapsed());

        let outcome = match result {
            Ok(output) => {
                info!("Converted {} into {}", input.display(), output.display());
                notify(config, |cb| cb.on_job_complete(index, total, input, &output));
                JobOutcome {
                    input: input.to_path_buf(),
                    format,
                    output: Some(output),
                    error: None,
                    duration_ms,
                }
            }
            Err(e) => {
                warn!("Failed to convert {}: {}", input.display(), e);
                notify(config, |cb| cb.on_job_error(index, total, input, &e));
                JobOutcome {
                    input: input.to_path_buf(),
                    format,
                    output: None,
                    error: Some(e.to_string()),
                    duration_ms,
                }
            }
        };
        jobs.push(outcome);
    }

    let succeeded = jobs.iter().filter(|j| j.succeeded()).count();
    let stats = BatchStats {
        total,
        succeeded,
        failed: total - succeeded,
        total_duration_ms: elapsed_ms(batch_start.elapsed()),
    };
    info!(
        "Batch complete: {}/{} converted, {}ms total",
        succeeded, total, stats.total_duration_ms
    );
    notify(config, |cb| cb.on_batch_complete(total, succeeded));

    Ok(BatchReport { jobs, stats })
}

/// Convert a single texture with the real tools.
///
/// Does not verify the tools directory; a missing tool surfaces as
/// [`JobError::ToolLaunch`].
pub fn convert_file(input: impl AsRef<Path>, config: &ConversionConfig) -> Result<PathBuf, JobError> {
    convert_file_with_runner(input, config, &SystemRunner)
}

/// [`convert_file`] with a caller-supplied [`ToolRunner`].
pub fn convert_file_with_runner(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
    runner: &dyn ToolRunner,
) -> Result<PathBuf, JobError> {
    convert_job(input.as_ref(), config, runner).1
}

/// Run one job, also reporting the chosen format once it is known.
fn convert_job(
    input: &Path,
    config: &ConversionConfig,
    runner: &dyn ToolRunner,
) -> (Option<TargetFormat>, Result<PathBuf, JobError>) {
    let name = match input::resolve_input(input) {
        Ok(name) => name,
        Err(e) => return (None, Err(e)),
    };
    let format = name.target_format();
    (Some(format), run_pipeline(input, &name, format, config, runner))
}

fn run_pipeline(
    input: &Path,
    name: &TextureName,
    format: TargetFormat,
    config: &ConversionConfig,
    runner: &dyn ToolRunner,
) -> Result<PathBuf, JobError> {
    let tools = &config.tools;
    let ext = name.transform_output_ext();
    let target = naming::final_output_path(input, name, ext).ok_or_else(|| {
        JobError::InvalidFileName {
            path: input.to_path_buf(),
        }
    })?;
    debug!(
        "{}: format {}, transform output {}, target {}",
        name.file_name(),
        format,
        ext.suffix(),
        target.display()
    );

    // ── Steps 1-2: (decompress) + compress ───────────────────────────────
    let compressed = Intermediate::new(naming::with_suffix(input, ".dds"));

    if name.is_dds() {
        let decompressed = Intermediate::new(naming::with_suffix(input, ".tga"));
        run_stage(
            runner,
            config,
            input,
            Stage::Decompress,
            ToolInvocation::decompress(tools, input, decompressed.path()),
            |status| JobError::DecompressFailed { status },
        )?;

        let result = run_stage(
            runner,
            config,
            input,
            Stage::Compress,
            ToolInvocation::compress(
                tools,
                decompressed.path(),
                compressed.path(),
                format,
                config.quality,
            ),
            |status| JobError::CompressFailed { format, status },
        );
        if result.is_err() && config.keep_intermediate_on_compress_failure {
            let kept = decompressed.keep();
            debug!("Keeping {} after compressor failure", kept.display());
        }
        result?;
        // `decompressed` is gone before the transform may write the same name.
    } else {
        run_stage(
            runner,
            config,
            input,
            Stage::Compress,
            ToolInvocation::compress(tools, input, compressed.path(), format, config.quality),
            |status| JobError::CompressFailed { format, status },
        )?;
    }

    // ── Step 3: transform ────────────────────────────────────────────────
    let transformed = Intermediate::new(naming::with_suffix(input, ext.suffix()));
    run_stage(
        runner,
        config,
        input,
        Stage::Transform,
        ToolInvocation::transform(tools, compressed.path()),
        |status| JobError::TransformFailed { status },
    )?;
    drop(compressed);

    // ── Step 4: final compress ───────────────────────────────────────────
    if config.skip_final_compression {
        debug!("Skipping final compression of {}", transformed.path().display());
    } else {
        run_stage(
            runner,
            config,
            input,
            Stage::FinalCompress,
            ToolInvocation::final_compress(tools, transformed.path()),
            |status| JobError::FinalCompressFailed { status },
        )?;
    }

    // ── Step 5: rename to the final name ─────────────────────────────────
    notify(config, |cb| cb.on_stage(input, Stage::Finalize));
    let target = if config.no_clobber {
        naming::unique_path(&target)
    } else {
        target
    };
    std::fs::rename(transformed.path(), &target).map_err(|source| JobError::RenameFailed {
        from: transformed.path().to_path_buf(),
        to: target.clone(),
        source,
    })?;
    transformed.keep();

    Ok(target)
}

/// Run one tool and map a non-zero exit through `on_failure`.
fn run_stage(
    runner: &dyn ToolRunner,
    config: &ConversionConfig,
    input: &Path,
    stage: Stage,
    invocation: ToolInvocation,
    on_failure: impl FnOnce(ToolExit) -> JobError,
) -> Result<(), JobError> {
    notify(config, |cb| cb.on_stage(input, stage));

    let exit = runner
        .run(&invocation)
        .map_err(|source| JobError::ToolLaunch {
            tool: invocation.tool().label(),
            program: invocation.program().to_path_buf(),
            source,
        })?;

    if exit.success() {
        Ok(())
    } else {
        debug!("{} failed for {}: {}", invocation.tool(), input.display(), exit);
        Err(on_failure(exit))
    }
}

/// Whole milliseconds, saturated to `u64`.
fn elapsed_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn notify(config: &ConversionConfig, f: impl FnOnce(&dyn ConversionProgressCallback)) {
    if let Some(ref cb) = config.progress_callback {
        f(cb.as_ref());
    }
}
