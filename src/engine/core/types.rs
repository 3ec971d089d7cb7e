use super::error::{ConvertError, ConvertResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Container/format the operator asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Mp4,
    Webm,
    Mp3,
    Wav,
}

impl OutputKind {
    /// Menu order (1-4)
    pub const ALL: [OutputKind; 4] = [Self::Mp4, Self::Webm, Self::Mp3, Self::Wav];

    /// File extension mandated for this kind
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    pub fn is_audio_only(&self) -> bool {
        matches!(self, Self::Mp3 | Self::Wav)
    }

    /// Get user-friendly display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mp4 => "MP4 (H.264 + AAC)",
            Self::Webm => "WebM (VP9 + Opus)",
            Self::Mp3 => "MP3 (audio only)",
            Self::Wav => "WAV (uncompressed audio)",
        }
    }

    /// Map a 1-based menu choice
    pub fn from_menu_index(choice: usize) -> Option<Self> {
        choice.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> ConvertResult<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "webm" => Ok(Self::Webm),
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            other => Err(ConvertError::InvalidSelection(format!(
                "unsupported output format '{}' (expected mp4, webm, mp3 or wav)",
                other
            ))),
        }
    }
}

/// NVENC quality/speed tradeoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Best,
    #[default]
    Balanced,
    Fastest,
}

impl QualityPreset {
    /// Menu order (1-3)
    pub const ALL: [QualityPreset; 3] = [Self::Best, Self::Balanced, Self::Fastest];

    /// NVENC preset token: p1=fastest, p7=best quality
    pub fn nvenc_preset(&self) -> &'static str {
        match self {
            Self::Best => "p7",
            Self::Balanced => "p4",
            Self::Fastest => "p1",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Best => "Best quality (slowest)",
            Self::Balanced => "Balanced",
            Self::Fastest => "Fastest",
        }
    }

    /// Map a 1-based menu choice; anything unrecognized is balanced
    pub fn from_menu_choice(input: &str) -> Self {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or_default()
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Best => "best",
            Self::Balanced => "balanced",
            Self::Fastest => "fastest",
        };
        f.write_str(name)
    }
}

impl FromStr for QualityPreset {
    type Err = ConvertError;

    fn from_str(s: &str) -> ConvertResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "balanced" => Ok(Self::Balanced),
            "fastest" => Ok(Self::Fastest),
            other => Err(ConvertError::InvalidSelection(format!(
                "unknown quality preset '{}' (expected best, balanced or fastest)",
                other
            ))),
        }
    }
}

/// A fully validated conversion request.
///
/// Only [`ConversionRequest::validate`] builds one, so holding a request
/// means the input was an existing regular file at validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub kind: OutputKind,
    pub destination: Option<PathBuf>,
    pub preset: Option<QualityPreset>,
    pub overwrite: bool,
}

impl ConversionRequest {
    pub fn validate(
        input: impl Into<PathBuf>,
        kind: OutputKind,
        destination: Option<PathBuf>,
        preset: Option<QualityPreset>,
        overwrite: bool,
    ) -> ConvertResult<Self> {
        let input = input.into();
        ensure_regular_file(&input)?;
        Ok(Self {
            input,
            kind,
            destination,
            preset,
            overwrite,
        })
    }
}

/// Fail with `InputNotFound` unless `path` is an accessible regular file
pub fn ensure_regular_file(path: &Path) -> ConvertResult<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(ConvertError::InputNotFound(path.to_path_buf())),
    }
}

/// Encoder/decoder choices for one conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodecPlan {
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub decoder_override: Option<String>,
    /// Output-side flags placed after the input
    pub extra_encoder_flags: Vec<String>,
    /// Input-side flags placed before the input
    pub extra_decoder_flags: Vec<String>,
    pub is_audio_only: bool,
}

/// Where the output will be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputPath {
    pub path: PathBuf,
    /// Destination as given, when its extension had to be replaced
    pub corrected_from: Option<PathBuf>,
}
