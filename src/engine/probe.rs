// Input probing using ffprobe

use crate::engine::core::{ConvertError, ConvertResult};
use crate::engine::hardware::tool_name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

/// One stream as reported by ffprobe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub index: u32,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
}

/// Container-level probe result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub format_name: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    /// Bytes
    pub size: Option<u64>,
    /// Bits per second
    pub bit_rate: Option<u64>,
    pub streams: Vec<StreamInfo>,
}

impl MediaInfo {
    /// Codec name of the first video stream
    pub fn video_codec(&self) -> Option<&str> {
        self.streams_of("video")
            .find_map(|s| s.codec_name.as_deref())
    }

    pub fn streams_of<'a>(&'a self, codec_type: &'a str) -> impl Iterator<Item = &'a StreamInfo> {
        self.streams
            .iter()
            .filter(move |s| s.codec_type.as_deref() == Some(codec_type))
    }
}

// ffprobe reports most numbers as strings
#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
    size: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: u32,
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    channels: Option<u32>,
    sample_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

/// Parse `ffprobe -print_format json -show_format -show_streams` output
pub fn parse_probe_json(path: &Path, json: &str) -> ConvertResult<MediaInfo> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).map_err(|e| ConvertError::ProbeParse(e.to_string()))?;

    let (format_name, duration, size, bit_rate) = match probe.format {
        Some(f) => (
            f.format_name,
            f.duration.and_then(|d| d.parse::<f64>().ok()),
            f.size.and_then(|s| s.parse::<u64>().ok()),
            f.bit_rate.and_then(|b| b.parse::<u64>().ok()),
        ),
        None => (None, None, None, None),
    };

    let streams = probe
        .streams
        .into_iter()
        .map(|s| StreamInfo {
            index: s.index,
            codec_type: s.codec_type,
            codec_name: s.codec_name,
            width: s.width,
            height: s.height,
            channels: s.channels,
            sample_rate: s.sample_rate.and_then(|r| r.parse::<u32>().ok()),
        })
        .collect();

    Ok(MediaInfo {
        path: path.to_path_buf(),
        format_name,
        duration,
        size,
        bit_rate,
        streams,
    })
}

/// Media probe provider
pub trait MediaProber {
    fn probe(&self, path: &Path) -> ConvertResult<MediaInfo>;
}

/// Probes with a real ffprobe binary
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe: PathBuf,
}

impl FfprobeProber {
    pub fn new(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl MediaProber for FfprobeProber {
    fn probe(&self, path: &Path) -> ConvertResult<MediaInfo> {
        let output = Command::new(&self.ffprobe)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .output()
            .map_err(|e| ConvertError::tool_unavailable(tool_name(&self.ffprobe), e))?;

        if !output.status.success() {
            return Err(ConvertError::ToolFailed {
                tool: tool_name(&self.ffprobe),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_probe_json(path, &String::from_utf8_lossy(&output.stdout))
    }
}
