use super::error::{ConvertError, ConvertResult};
use super::types::CodecPlan;
use crate::engine::hardware::tool_name;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// A fully assembled ffmpeg call: program plus argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl FfmpegInvocation {
    /// Arguments as lossy UTF-8, for display and assertions
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Build a `std::process::Command` passing every argument as its own argv entry
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Assemble the ffmpeg argument vector.
///
/// ffmpeg is positional: everything before `-i` applies to the input, so the
/// decoder flags and decoder override must precede it. Paths are passed
/// through untouched; the argument vector keeps spaces and shell
/// metacharacters intact.
pub fn build_ffmpeg_cmd(
    ffmpeg: &Path,
    plan: &CodecPlan,
    input: &Path,
    output: &Path,
    overwrite: bool,
) -> FfmpegInvocation {
    let mut args: Vec<OsString> = Vec::new();

    // Never let ffmpeg stop on its interactive overwrite prompt
    args.push(OsString::from(if overwrite { "-y" } else { "-n" }));

    // Decoder side
    args.extend(plan.extra_decoder_flags.iter().map(OsString::from));
    if let Some(decoder) = &plan.decoder_override {
        args.push("-c:v".into());
        args.push(decoder.into());
    }

    // Input
    args.push("-i".into());
    args.push(input.as_os_str().to_owned());

    // Encoder side
    args.extend(plan.extra_encoder_flags.iter().map(OsString::from));
    if !plan.is_audio_only {
        if let Some(video) = &plan.video_codec {
            args.push("-c:v".into());
            args.push(video.into());
        }
    }
    if let Some(audio) = &plan.audio_codec {
        args.push("-c:a".into());
        args.push(audio.into());
    }

    args.push(output.as_os_str().to_owned());

    FfmpegInvocation {
        program: ffmpeg.to_path_buf(),
        args,
    }
}

/// Format an invocation as a shell-safe string for display
pub fn format_ffmpeg_cmd(invocation: &FfmpegInvocation) -> String {
    let program = invocation.program.to_string_lossy().into_owned();
    let words: Vec<String> = std::iter::once(program)
        .chain(invocation.args_lossy())
        .collect();

    shlex::try_join(words.iter().map(String::as_str)).unwrap_or_else(|_| words.join(" "))
}

// ============================================================================
// Execution
// ============================================================================

/// Result of running the conversion process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded { output: PathBuf },
    /// ffmpeg ran but reported failure; `code` is `None` when killed by a signal
    NonZeroExit { code: Option<i32>, output: PathBuf },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Exit code this process should finish with
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Succeeded { .. } => 0,
            Self::NonZeroExit { code, .. } => code.unwrap_or(1),
        }
    }

    pub fn from_exit_code(code: Option<i32>, output: &Path) -> Self {
        match code {
            Some(0) => Self::Succeeded {
                output: output.to_path_buf(),
            },
            code => Self::NonZeroExit {
                code,
                output: output.to_path_buf(),
            },
        }
    }
}

/// Something that can run an ffmpeg invocation to completion
pub trait Executor {
    /// Run and return the exit code (`None` when terminated by a signal).
    /// Failing to start the process is `ToolUnavailable`.
    fn run(&self, invocation: &FfmpegInvocation) -> ConvertResult<Option<i32>>;
}

/// Runs ffmpeg as a child process with inherited stdio, no shell involved
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn run(&self, invocation: &FfmpegInvocation) -> ConvertResult<Option<i32>> {
        let mut cmd = invocation.to_command();
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        tracing::debug!("Running {}", format_ffmpeg_cmd(invocation));

        let status = cmd
            .status()
            .map_err(|e| ConvertError::tool_unavailable(tool_name(&invocation.program), e))?;

        log_abnormal_exit(&status);
        Ok(status.code())
    }
}

#[cfg(unix)]
fn log_abnormal_exit(status: &ExitStatus) {
    use std::os::unix::process::ExitStatusExt;

    if let Some(signal) = status.signal() {
        tracing::warn!("ffmpeg was terminated by signal {}", signal);
    }
}

#[cfg(not(unix))]
fn log_abnormal_exit(_status: &ExitStatus) {}

/// Run an invocation and classify the exit status
pub fn run_ffmpeg<E: Executor + ?Sized>(
    executor: &E,
    invocation: &FfmpegInvocation,
    output: &Path,
) -> ConvertResult<RunOutcome> {
    let code = executor.run(invocation)?;
    let outcome = RunOutcome::from_exit_code(code, output);
    if let RunOutcome::NonZeroExit { code, .. } = &outcome {
        tracing::warn!(
            "ffmpeg exited with {}",
            code.map(|c| c.to_string())
                .unwrap_or_else(|| "no status".to_string())
        );
    }
    Ok(outcome)
}
