//! Error taxonomy for a conversion run.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures that stop a conversion run.
///
/// A non-zero exit from the conversion itself is not an error; it is
/// reported through [`crate::engine::RunOutcome`] because ffmpeg has
/// already printed its own diagnostics by then.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Input file not found or not a regular file: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to run {tool}. Is it installed and in PATH?")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Output file already exists: {} (pass --overwrite to replace it)", .0.display())]
    OutputExists(PathBuf),

    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParse(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ConvertError {
    pub(crate) fn tool_unavailable(tool: impl Into<String>, source: io::Error) -> Self {
        Self::ToolUnavailable {
            tool: tool.into(),
            source,
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
