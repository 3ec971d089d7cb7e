//! Codec selection from detected capabilities and requested output kind.

use super::types::{CodecPlan, OutputKind, QualityPreset};
use crate::engine::hardware::HardwareCapabilities;

/// Input codec -> NVIDIA hardware decoder
const CUVID_DECODERS: &[(&str, &str)] = &[
    ("h264", "h264_cuvid"),
    ("hevc", "hevc_cuvid"),
    ("vp9", "vp9_cuvid"),
    ("vp8", "vp8_cuvid"),
    ("mpeg2video", "mpeg2_cuvid"),
    ("mpeg4", "mpeg4_cuvid"),
    ("vc1", "vc1_cuvid"),
    ("av1", "av1_cuvid"),
];

/// Look up the CUVID decoder for an ffprobe codec name
pub fn cuvid_decoder_for(codec_name: &str) -> Option<&'static str> {
    CUVID_DECODERS
        .iter()
        .find(|(codec, _)| *codec == codec_name)
        .map(|(_, decoder)| *decoder)
}

/// Pick the codecs and flags for one run.
///
/// `input_video_codec` is the probed codec name of the input's first video
/// stream; it only matters for MP4 when NVENC is available. WebM never
/// consults the hardware path: VP9 hardware encoders are not selected
/// automatically.
pub fn select_codecs(
    caps: &HardwareCapabilities,
    kind: OutputKind,
    preset: Option<QualityPreset>,
    input_video_codec: Option<&str>,
) -> CodecPlan {
    let nvenc = caps.has_nvenc();
    let mut plan = CodecPlan::default();

    match kind {
        OutputKind::Mp4 => {
            if nvenc {
                plan.video_codec = Some("h264_nvenc".to_string());
                plan.decoder_override = input_video_codec
                    .and_then(cuvid_decoder_for)
                    .map(str::to_string);
                let preset = preset.unwrap_or_default();
                plan.extra_encoder_flags
                    .extend(["-preset".to_string(), preset.nvenc_preset().to_string()]);
            } else {
                plan.video_codec = Some("libx264".to_string());
            }
            plan.audio_codec = Some("aac".to_string());
        }
        OutputKind::Webm => {
            plan.video_codec = Some("libvpx-vp9".to_string());
            plan.audio_codec = Some("libopus".to_string());
        }
        OutputKind::Mp3 => {
            plan.is_audio_only = true;
            plan.audio_codec = Some("libmp3lame".to_string());
            plan.extra_encoder_flags.push("-vn".to_string());
        }
        OutputKind::Wav => {
            plan.is_audio_only = true;
            plan.audio_codec = Some("pcm_s16le".to_string());
            plan.extra_encoder_flags.push("-vn".to_string());
        }
    }

    // Generic CUDA decode even when no specific CUVID decoder matched
    if nvenc {
        plan.extra_decoder_flags.extend(
            ["-hwaccel", "cuda", "-hwaccel_output_format", "cuda"].map(str::to_string),
        );
    }

    match &plan.decoder_override {
        Some(decoder) => tracing::info!("Using hardware decoder {}", decoder),
        None if nvenc && kind == OutputKind::Mp4 => {
            tracing::info!("No CUVID decoder for input codec, using software decoding")
        }
        None => {}
    }

    plan
}
