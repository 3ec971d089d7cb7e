//! Hardware acceleration detection from ffmpeg's encoder/decoder listings

use crate::engine::core::{ConvertError, ConvertResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Hardware acceleration tags recognized in ffmpeg's self-reported listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HwTag {
    Nvenc,
    Qsv,
    Amf,
    CudaDecode,
}

impl HwTag {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nvenc => "NVIDIA NVENC encoding",
            Self::Qsv => "Intel Quick Sync encoding",
            Self::Amf => "AMD AMF encoding",
            Self::CudaDecode => "NVIDIA CUDA/CUVID decoding",
        }
    }
}

impl fmt::Display for HwTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nvenc => "nvenc",
            Self::Qsv => "qsv",
            Self::Amf => "amf",
            Self::CudaDecode => "cuda_decode",
        };
        f.write_str(name)
    }
}

/// Which listing a tag is derived from, and the substrings that enable it
const ENCODER_PATTERNS: &[(HwTag, &[&str])] = &[
    (HwTag::Nvenc, &["h264_nvenc"]),
    (HwTag::Qsv, &["h264_qsv", "hevc_qsv"]),
    (HwTag::Amf, &["h264_amf", "hevc_amf"]),
];

const DECODER_PATTERNS: &[(HwTag, &[&str])] = &[(HwTag::CudaDecode, &["cuda", "cuvid"])];

/// Set of detected hardware acceleration tags.
///
/// Tags are additive: a pattern that does not match simply leaves its tag
/// out. An empty set means "probe succeeded, nothing found"; a failed probe
/// is an error and never produces a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardwareCapabilities {
    tags: BTreeSet<HwTag>,
}

impl HardwareCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the text of `ffmpeg -encoders` and `ffmpeg -decoders`.
    /// Matching is a case-sensitive substring search.
    pub fn from_listings(encoders: &str, decoders: &str) -> Self {
        let mut caps = Self::new();
        for (tag, patterns) in ENCODER_PATTERNS {
            if patterns.iter().any(|p| encoders.contains(p)) {
                caps.insert(*tag);
            }
        }
        for (tag, patterns) in DECODER_PATTERNS {
            if patterns.iter().any(|p| decoders.contains(p)) {
                caps.insert(*tag);
            }
        }
        caps
    }

    pub fn insert(&mut self, tag: HwTag) {
        self.tags.insert(tag);
    }

    pub fn contains(&self, tag: HwTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn has_nvenc(&self) -> bool {
        self.contains(HwTag::Nvenc)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = HwTag> + '_ {
        self.tags.iter().copied()
    }
}

impl FromIterator<HwTag> for HardwareCapabilities {
    fn from_iter<I: IntoIterator<Item = HwTag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

/// Source of the encoder/decoder listings.
///
/// Keeps the text heuristic replaceable: a structured capability query can
/// implement this without touching selection.
pub trait ListingSource {
    fn encoders(&self) -> ConvertResult<String>;
    fn decoders(&self) -> ConvertResult<String>;
}

/// Listings read from a real ffmpeg binary
#[derive(Debug, Clone)]
pub struct FfmpegListing {
    ffmpeg: PathBuf,
}

impl FfmpegListing {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    fn list(&self, what: &str) -> ConvertResult<String> {
        let output = Command::new(&self.ffmpeg)
            .args(["-hide_banner", what])
            .output()
            .map_err(|e| ConvertError::tool_unavailable(tool_name(&self.ffmpeg), e))?;

        if !output.status.success() {
            tracing::warn!(
                "{} {} exited with {}; classifying its output anyway",
                self.ffmpeg.display(),
                what,
                output.status
            );
        }

        // ffmpeg writes part of its informational output to stderr
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

impl Default for FfmpegListing {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl ListingSource for FfmpegListing {
    fn encoders(&self) -> ConvertResult<String> {
        self.list("-encoders")
    }

    fn decoders(&self) -> ConvertResult<String> {
        self.list("-decoders")
    }
}

/// Probe the listing source once and classify both listings
pub fn probe_capabilities<L: ListingSource + ?Sized>(
    source: &L,
) -> ConvertResult<HardwareCapabilities> {
    tracing::info!("Detecting hardware acceleration support");
    let encoders = source.encoders()?;
    let decoders = source.decoders()?;
    let caps = HardwareCapabilities::from_listings(&encoders, &decoders);

    if caps.is_empty() {
        tracing::info!("No hardware acceleration detected, using software codecs");
    }
    for tag in caps.iter() {
        tracing::info!("Detected {}", tag.display_name());
    }
    Ok(caps)
}

pub(crate) fn tool_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// GPU Inventory
// ============================================================================

/// Detected GPU vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuVendor {
    #[default]
    Unknown,
    Intel,
    Nvidia,
    Amd,
}

/// Detect NVIDIA GPU name and dedicated memory (MiB) using nvidia-smi
pub fn detect_nvidia_gpu() -> Option<(String, Option<u64>)> {
    let output = Command::new("nvidia-smi")
        .args(["--query-gpu=name,memory.total", "--format=csv,noheader,nounits"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_nvidia_smi_line(&String::from_utf8_lossy(&output.stdout))
}

fn parse_nvidia_smi_line(stdout: &str) -> Option<(String, Option<u64>)> {
    let line = stdout.lines().next()?;
    let mut parts = line.split(',').map(|s| s.trim());
    let name = parts.next().filter(|n| !n.is_empty())?;
    let memory_mib = parts.next().and_then(|m| m.parse::<u64>().ok());
    Some((name.to_string(), memory_mib))
}

/// Detect GPU info from lspci (any vendor)
pub fn detect_gpu_info() -> Option<String> {
    let output = Command::new("lspci").output().ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    find_display_controller(&stdout)
}

fn find_display_controller(lspci: &str) -> Option<String> {
    lspci
        .lines()
        .find(|line| {
            let lower = line.to_lowercase();
            lower.contains("vga") || lower.contains("display") || lower.contains("3d")
        })
        .map(|line| {
            // "01:00.0 VGA compatible controller: NVIDIA Corporation ..." -> device part
            line.split_once(": ")
                .map(|(_, device)| device)
                .unwrap_or(line)
                .trim()
                .to_string()
        })
}

/// Guess the vendor from a GPU description
pub fn vendor_from_name(name: &str) -> GpuVendor {
    let lower = name.to_lowercase();
    if lower.contains("nvidia") || lower.contains("geforce") || lower.contains("quadro") {
        GpuVendor::Nvidia
    } else if lower.contains("intel") {
        GpuVendor::Intel
    } else if lower.contains("amd")
        || lower.contains("radeon")
        || lower.contains("advanced micro devices")
    {
        GpuVendor::Amd
    } else {
        GpuVendor::Unknown
    }
}

/// Detect the primary GPU: nvidia-smi first (gives memory), lspci otherwise
pub fn detect_gpu() -> Option<(GpuVendor, String, Option<u64>)> {
    if let Some((name, memory)) = detect_nvidia_gpu() {
        return Some((GpuVendor::Nvidia, name, memory));
    }
    detect_gpu_info().map(|name| (vendor_from_name(&name), name, None))
}
