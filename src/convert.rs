//! One conversion run as driven from the command line: pick the format and
//! preset (flags, menus or config defaults), then plan or execute.

use crate::config::DefaultsConfig;
use crate::engine::{
    Conversion, ConversionPlan, ConversionRequest, ConvertError, ConvertResult, Converter,
    Executor, HardwareCapabilities, ListingSource, MediaProber, OutputKind, QualityPreset,
    ensure_regular_file, format_ffmpeg_cmd,
};
use crate::prompt;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Command-line choices for a conversion, before validation
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub input: PathBuf,
    pub format: Option<String>,
    pub preset: Option<String>,
    pub destination: Option<PathBuf>,
    pub overwrite: bool,
    pub dry_run: bool,
    /// Menus may be shown for missing choices
    pub interactive: bool,
}

/// What a run ended with
#[derive(Debug)]
pub enum ConvertSession {
    /// `--dry-run`: planned, nothing executed
    Planned(ConversionPlan),
    Finished(Conversion),
}

impl ConvertSession {
    pub fn plan(&self) -> &ConversionPlan {
        match self {
            Self::Planned(plan) => plan,
            Self::Finished(conversion) => &conversion.plan,
        }
    }

    /// Process exit code: ffmpeg's own status when it ran
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Planned(_) => 0,
            Self::Finished(conversion) => conversion.exit_code(),
        }
    }
}

/// Output format from the flag, or from the menu when interactive
pub fn choose_output_kind<R: BufRead, W: Write>(
    format: Option<&str>,
    interactive: bool,
    input: &mut R,
    out: &mut W,
) -> ConvertResult<OutputKind> {
    match format {
        Some(format) => format.parse(),
        None if interactive => prompt::prompt_output_kind(input, out),
        None => Err(ConvertError::InvalidSelection(
            "no output format given (pass FORMAT or --format)".to_string(),
        )),
    }
}

/// NVENC preset; only asked for when it can matter (mp4 with nvenc)
pub fn choose_preset<R: BufRead, W: Write>(
    preset: Option<&str>,
    kind: OutputKind,
    capabilities: &HardwareCapabilities,
    interactive: bool,
    default: QualityPreset,
    input: &mut R,
    out: &mut W,
) -> ConvertResult<Option<QualityPreset>> {
    if let Some(preset) = preset {
        return preset.parse().map(Some);
    }
    if kind != OutputKind::Mp4 || !capabilities.has_nvenc() {
        return Ok(None);
    }
    if interactive {
        prompt::prompt_quality_preset(input, out).map(Some)
    } else {
        Ok(Some(default))
    }
}

/// Validate, ask for what is missing, plan, and run unless `dry_run`.
///
/// The input is checked before any menu or subprocess. Menus and progress
/// notes go to `out`.
pub fn run_convert<L, M, E, R, W>(
    converter: &Converter<L, M, E>,
    options: &ConvertOptions,
    defaults: &DefaultsConfig,
    input: &mut R,
    out: &mut W,
) -> ConvertResult<ConvertSession>
where
    L: ListingSource,
    M: MediaProber,
    E: Executor,
    R: BufRead,
    W: Write,
{
    ensure_regular_file(&options.input)?;

    let kind = choose_output_kind(options.format.as_deref(), options.interactive, input, out)?;
    let capabilities = converter.capabilities()?;
    let preset = choose_preset(
        options.preset.as_deref(),
        kind,
        &capabilities,
        options.interactive,
        defaults.quality_preset,
        input,
        out,
    )?;

    let overwrite = options.overwrite || defaults.overwrite;
    let request = ConversionRequest::validate(
        options.input.clone(),
        kind,
        options.destination.clone(),
        preset,
        overwrite,
    )?;
    let plan = converter.plan_with(&request, capabilities)?;

    if let Some(original) = &plan.output.corrected_from {
        writeln!(
            out,
            "Note: output extension changed to .{}: {} -> {}",
            kind.extension(),
            original.display(),
            plan.output.path.display()
        )?;
    }

    if options.dry_run {
        return Ok(ConvertSession::Planned(plan));
    }

    writeln!(
        out,
        "Converting {} -> {}",
        request.input.display(),
        plan.output.path.display()
    )?;
    tracing::info!("Running: {}", format_ffmpeg_cmd(&plan.invocation));
    converter.execute(plan, overwrite).map(ConvertSession::Finished)
}
