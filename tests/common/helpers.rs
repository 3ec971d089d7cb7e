#![allow(dead_code)]

use ffconvert::engine::probe::StreamInfo;
use ffconvert::engine::{
    ConvertError, ConvertResult, Converter, Executor, FfmpegInvocation, ListingSource, MediaInfo,
    MediaProber,
};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `ffmpeg -encoders` excerpt from a build with NVENC
pub const NVENC_ENCODERS: &str = "\
Encoders:
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC (codec h264)
 V....D h264_nvenc           NVIDIA NVENC H.264 encoder (codec h264)
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 A....D aac                  AAC (Advanced Audio Coding)
 A....D libopus              libopus Opus (codec opus)
";

/// `ffmpeg -encoders` excerpt from a software-only build
pub const SOFTWARE_ENCODERS: &str = "\
Encoders:
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC (codec h264)
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 A....D aac                  AAC (Advanced Audio Coding)
";

pub const CUVID_DECODERS: &str = "\
Decoders:
 V....D hevc                 HEVC (High Efficiency Video Coding)
 V..... hevc_cuvid           Nvidia CUVID HEVC decoder (codec hevc)
";

/// Canned listing output; counts how often ffmpeg would have been queried
#[derive(Default)]
pub struct FakeListing {
    pub encoders: String,
    pub decoders: String,
    pub fail: bool,
    pub calls: Cell<usize>,
}

impl FakeListing {
    pub fn software() -> Self {
        Self {
            encoders: SOFTWARE_ENCODERS.to_string(),
            ..Default::default()
        }
    }

    pub fn nvenc() -> Self {
        Self {
            encoders: NVENC_ENCODERS.to_string(),
            decoders: CUVID_DECODERS.to_string(),
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn listing(&self, text: &str) -> ConvertResult<String> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(ConvertError::ToolUnavailable {
                tool: "ffmpeg".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Ok(text.to_string())
    }
}

impl ListingSource for FakeListing {
    fn encoders(&self) -> ConvertResult<String> {
        self.listing(&self.encoders)
    }

    fn decoders(&self) -> ConvertResult<String> {
        self.listing(&self.decoders)
    }
}

/// Reports a single video stream with a fixed codec, or fails
#[derive(Default)]
pub struct FakeProber {
    pub video_codec: Option<String>,
    pub calls: Cell<usize>,
}

impl FakeProber {
    pub fn with_codec(codec: &str) -> Self {
        Self {
            video_codec: Some(codec.to_string()),
            ..Default::default()
        }
    }
}

impl MediaProber for FakeProber {
    fn probe(&self, path: &Path) -> ConvertResult<MediaInfo> {
        self.calls.set(self.calls.get() + 1);
        let codec = self
            .video_codec
            .clone()
            .ok_or_else(|| ConvertError::ProbeParse("no probe data".to_string()))?;
        Ok(MediaInfo {
            path: path.to_path_buf(),
            format_name: Some("matroska,webm".to_string()),
            duration: Some(42.0),
            size: None,
            bit_rate: None,
            streams: vec![StreamInfo {
                index: 0,
                codec_type: Some("video".to_string()),
                codec_name: Some(codec),
                width: Some(1920),
                height: Some(1080),
                channels: None,
                sample_rate: None,
            }],
        })
    }
}

/// Records invocations instead of spawning ffmpeg
pub struct RecordingExecutor {
    pub exit_code: Option<i32>,
    pub invocations: RefCell<Vec<FfmpegInvocation>>,
}

impl RecordingExecutor {
    pub fn exiting_with(exit_code: Option<i32>) -> Self {
        Self {
            exit_code,
            invocations: RefCell::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::exiting_with(Some(0))
    }

    pub fn run_count(&self) -> usize {
        self.invocations.borrow().len()
    }

    pub fn last_args(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .last()
            .map(FfmpegInvocation::args_lossy)
            .unwrap_or_default()
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, invocation: &FfmpegInvocation) -> ConvertResult<Option<i32>> {
        self.invocations.borrow_mut().push(invocation.clone());
        Ok(self.exit_code)
    }
}

pub type TestConverter = Converter<FakeListing, FakeProber, RecordingExecutor>;

pub fn test_converter(
    listing: FakeListing,
    prober: FakeProber,
    exit_code: Option<i32>,
) -> TestConverter {
    Converter::new(
        "ffmpeg",
        listing,
        prober,
        RecordingExecutor::exiting_with(exit_code),
    )
}

/// Create an input file (contents irrelevant) inside a fresh temp dir
pub fn temp_input(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, b"placeholder media").expect("Failed to write input");
    (dir, path)
}

/// Join program and args with spaces, the way a reader would type it
pub fn invocation_to_string(invocation: &FfmpegInvocation) -> String {
    let mut parts = vec![invocation.program.to_string_lossy().to_string()];
    parts.extend(invocation.args_lossy());
    parts.join(" ")
}
