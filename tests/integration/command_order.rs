// Property tests for codec selection, path resolution and argument order

use ffconvert::engine::{
    HardwareCapabilities, HwTag, OutputKind, QualityPreset, build_ffmpeg_cmd, resolve_output_path,
    select_codecs,
};
use proptest::prelude::*;
use std::path::{Path, PathBuf};

use crate::common::assertions::*;

// ============================================================================
// Strategies
// ============================================================================

fn any_kind() -> impl Strategy<Value = OutputKind> {
    prop::sample::select(OutputKind::ALL.to_vec())
}

fn any_preset() -> impl Strategy<Value = Option<QualityPreset>> {
    prop::option::of(prop::sample::select(QualityPreset::ALL.to_vec()))
}

fn any_caps() -> impl Strategy<Value = HardwareCapabilities> {
    prop::collection::vec(
        prop::sample::select(vec![HwTag::Nvenc, HwTag::Qsv, HwTag::Amf, HwTag::CudaDecode]),
        0..4,
    )
    .prop_map(|tags| tags.into_iter().collect())
}

fn any_codec() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec![
        "h264".to_string(),
        "hevc".to_string(),
        "vp9".to_string(),
        "prores".to_string(),
        "mpeg2video".to_string(),
    ]))
}

/// File stems including spaces and shell metacharacters
fn any_stem() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ;&$'()_-]{1,16}".prop_filter("no dot-only names", |s| {
        !s.trim().is_empty() && s != "." && s != ".."
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The listing heuristic sets nvenc exactly when h264_nvenc appears
    #[test]
    fn nvenc_tag_iff_listing_mentions_encoder(
        prefix in "[a-z0-9 \n]{0,40}",
        suffix in "[a-z0-9 \n]{0,40}",
        present in any::<bool>(),
    ) {
        let listing = if present {
            format!("{} h264_nvenc {}", prefix, suffix)
        } else {
            format!("{} {}", prefix, suffix)
        };
        prop_assume!(present || !listing.contains("h264_nvenc"));

        let caps = HardwareCapabilities::from_listings(&listing, "");
        prop_assert_eq!(caps.has_nvenc(), present);
    }

    /// WebM selection never depends on hardware, preset or input codec
    #[test]
    fn webm_plan_is_hardware_independent(
        caps in any_caps(),
        preset in any_preset(),
        codec in any_codec(),
    ) {
        let plan = select_codecs(&caps, OutputKind::Webm, preset, codec.as_deref());
        prop_assert_eq!(plan.video_codec.as_deref(), Some("libvpx-vp9"));
        prop_assert_eq!(plan.audio_codec.as_deref(), Some("libopus"));
        prop_assert_eq!(plan.decoder_override, None);
        prop_assert!(plan.extra_encoder_flags.is_empty());
    }

    /// Audio-only kinds disable video and never select a video codec
    #[test]
    fn audio_only_commands_have_no_video_codec(
        caps in any_caps(),
        kind in prop::sample::select(vec![OutputKind::Mp3, OutputKind::Wav]),
        codec in any_codec(),
    ) {
        let plan = select_codecs(&caps, kind, None, codec.as_deref());
        prop_assert!(plan.is_audio_only);

        let inv = build_ffmpeg_cmd(
            Path::new("ffmpeg"),
            &plan,
            Path::new("in.mkv"),
            Path::new("out"),
            false,
        );
        let args = inv.args_lossy();
        prop_assert!(args.iter().any(|a| a == "-vn"));
        prop_assert!(!args.iter().any(|a| a == "-c:v"));
    }

    /// Decoder-side flags always precede -i, the output path is always last
    #[test]
    fn argument_order_is_positional(
        caps in any_caps(),
        kind in any_kind(),
        preset in any_preset(),
        codec in any_codec(),
        overwrite in any::<bool>(),
    ) {
        let plan = select_codecs(&caps, kind, preset, codec.as_deref());
        let inv = build_ffmpeg_cmd(
            Path::new("ffmpeg"),
            &plan,
            Path::new("in.mkv"),
            Path::new("out.file"),
            overwrite,
        );
        let args = inv.args_lossy();
        let input_idx = input_flag_index(&args);

        prop_assert_eq!(args[0].as_str(), if overwrite { "-y" } else { "-n" });
        prop_assert_eq!(args[input_idx + 1].as_str(), "in.mkv");
        prop_assert_eq!(args.last().map(String::as_str), Some("out.file"));

        if let Some(pos) = args.iter().position(|a| a == "-hwaccel") {
            prop_assert!(pos < input_idx);
        }
        if let Some(decoder) = &plan.decoder_override {
            let pos = args.iter().position(|a| a == decoder).unwrap();
            prop_assert!(pos < input_idx);
        }
        for flag in &plan.extra_encoder_flags {
            let pos = args.iter().rposition(|a| a == flag).unwrap();
            prop_assert!(pos > input_idx);
        }
    }

    /// Resolving a resolved path again changes nothing
    #[test]
    fn resolved_file_path_is_a_fixed_point(
        stem in any_stem(),
        dest_ext in prop::sample::select(vec!["avi", "mp4", "MP3", "wav", "txt"]),
        kind in any_kind(),
    ) {
        let input = PathBuf::from(format!("/media/{}.mkv", stem));
        let dest = PathBuf::from(format!("/nonexistent-out/{}.{}", stem, dest_ext));

        let first = resolve_output_path(&input, Some(&dest), kind.extension());
        prop_assert_eq!(first.path.extension().and_then(|e| e.to_str()), Some(kind.extension()));

        let second = resolve_output_path(&input, Some(&first.path), kind.extension());
        prop_assert_eq!(&second.path, &first.path);
        prop_assert_eq!(second.corrected_from, None);
    }

    /// Paths with spaces or shell metacharacters stay single arguments
    #[test]
    fn odd_paths_are_single_arguments(stem in any_stem(), kind in any_kind()) {
        let input = PathBuf::from(format!("{}.mkv", stem));
        let output = resolve_output_path(&input, None, kind.extension()).path;
        let plan = select_codecs(&HardwareCapabilities::new(), kind, None, None);
        let inv = build_ffmpeg_cmd(Path::new("ffmpeg"), &plan, &input, &output, false);

        let args = inv.args_lossy();
        let input_idx = input_flag_index(&args);
        prop_assert_eq!(&args[input_idx + 1], &input.to_string_lossy().to_string());
        prop_assert_eq!(args.last().unwrap(), &output.to_string_lossy().to_string());
    }
}

#[test]
fn nvenc_mp4_sets_preset_for_every_choice() {
    let caps: HardwareCapabilities = [HwTag::Nvenc].into_iter().collect();
    for (preset, token) in [
        (QualityPreset::Best, "p7"),
        (QualityPreset::Balanced, "p4"),
        (QualityPreset::Fastest, "p1"),
    ] {
        let plan = select_codecs(&caps, OutputKind::Mp4, Some(preset), None);
        let inv = build_ffmpeg_cmd(
            Path::new("ffmpeg"),
            &plan,
            Path::new("a.mkv"),
            Path::new("a.mp4"),
            false,
        );
        assert_args_contain_sequence(&inv.args_lossy(), &["-preset", token]);
    }
}
