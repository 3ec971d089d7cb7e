//! Linear conversion pipeline: probe, select, resolve, build, execute.

use super::error::{ConvertError, ConvertResult};
use super::ffmpeg_cmd::{Executor, FfmpegInvocation, RunOutcome, build_ffmpeg_cmd, run_ffmpeg};
use super::output_path::resolve_output_path;
use super::selector::select_codecs;
use super::types::{
    CodecPlan, ConversionRequest, OutputKind, ResolvedOutputPath, ensure_regular_file,
};
use crate::engine::hardware::{HardwareCapabilities, ListingSource, probe_capabilities};
use crate::engine::probe::MediaProber;
use std::path::{Path, PathBuf};

/// Everything decided for a run, short of executing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    pub capabilities: HardwareCapabilities,
    pub codecs: CodecPlan,
    pub output: ResolvedOutputPath,
    pub invocation: FfmpegInvocation,
}

/// A finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub plan: ConversionPlan,
    pub outcome: RunOutcome,
}

impl Conversion {
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

/// Runs conversions against injected ffmpeg collaborators
pub struct Converter<L, M, E> {
    ffmpeg: PathBuf,
    listing: L,
    prober: M,
    executor: E,
}

impl<L, M, E> Converter<L, M, E>
where
    L: ListingSource,
    M: MediaProber,
    E: Executor,
{
    pub fn new(ffmpeg: impl Into<PathBuf>, listing: L, prober: M, executor: E) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            listing,
            prober,
            executor,
        }
    }

    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn listing(&self) -> &L {
        &self.listing
    }

    pub fn prober(&self) -> &M {
        &self.prober
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Query the ffmpeg build for hardware encoders/decoders
    pub fn capabilities(&self) -> ConvertResult<HardwareCapabilities> {
        probe_capabilities(&self.listing)
    }

    /// Plan a run, probing capabilities first
    pub fn plan(&self, request: &ConversionRequest) -> ConvertResult<ConversionPlan> {
        ensure_regular_file(&request.input)?;
        let caps = self.capabilities()?;
        self.plan_with(request, caps)
    }

    /// Plan a run against capabilities the caller already probed
    pub fn plan_with(
        &self,
        request: &ConversionRequest,
        capabilities: HardwareCapabilities,
    ) -> ConvertResult<ConversionPlan> {
        ensure_regular_file(&request.input)?;

        let input_codec = self.input_video_codec(request, &capabilities);
        let codecs = select_codecs(
            &capabilities,
            request.kind,
            request.preset,
            input_codec.as_deref(),
        );

        let output = resolve_output_path(
            &request.input,
            request.destination.as_deref(),
            request.kind.extension(),
        );

        let invocation = build_ffmpeg_cmd(
            &self.ffmpeg,
            &codecs,
            &request.input,
            &output.path,
            request.overwrite,
        );

        Ok(ConversionPlan {
            capabilities,
            codecs,
            output,
            invocation,
        })
    }

    /// Check the target, prepare its directory, and run ffmpeg
    pub fn execute(&self, plan: ConversionPlan, overwrite: bool) -> ConvertResult<Conversion> {
        let target = &plan.output.path;
        if target.exists() && !overwrite {
            return Err(ConvertError::OutputExists(target.clone()));
        }

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tracing::info!("Creating output directory {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }

        let outcome = run_ffmpeg(&self.executor, &plan.invocation, target)?;
        Ok(Conversion { plan, outcome })
    }

    /// Full run: plan then execute
    pub fn convert(&self, request: &ConversionRequest) -> ConvertResult<Conversion> {
        let plan = self.plan(request)?;
        self.execute(plan, request.overwrite)
    }

    /// Probed codec of the first video stream; only needed to pick a CUVID
    /// decoder, and a probe failure just means software decoding
    fn input_video_codec(
        &self,
        request: &ConversionRequest,
        capabilities: &HardwareCapabilities,
    ) -> Option<String> {
        if request.kind != OutputKind::Mp4 || !capabilities.has_nvenc() {
            return None;
        }

        match self.prober.probe(&request.input) {
            Ok(info) => info.video_codec().map(str::to_string),
            Err(e) => {
                tracing::warn!(
                    "Could not probe {}: {}; falling back to software decoding",
                    request.input.display(),
                    e
                );
                None
            }
        }
    }
}
