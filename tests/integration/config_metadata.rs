// Config file handling and the metadata report, driven through the public API

use ffconvert::config::Config;
use ffconvert::engine::metadata::{collect_metadata, default_metadata_path, write_metadata};
use ffconvert::engine::system::{HostSystemInfo, SystemInfoProvider, UNKNOWN};
use ffconvert::engine::{HardwareCapabilities, HwTag, QualityPreset};
use std::fs;
use tempfile::TempDir;

use crate::common::helpers::*;

#[test]
fn test_config_file_overrides_tool_paths() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[tools]
ffmpeg = "/opt/ffmpeg/bin/ffmpeg"
ffprobe = "/opt/ffmpeg/bin/ffprobe"

[defaults]
quality_preset = "fastest"
overwrite = true
log_level = "info"
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.tools.ffmpeg.to_str(), Some("/opt/ffmpeg/bin/ffmpeg"));
    assert_eq!(config.defaults.quality_preset, QualityPreset::Fastest);
    assert!(config.defaults.overwrite);
    assert_eq!(config.defaults.log_level, "info");
}

#[test]
fn test_config_unknown_sections_are_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[ui]\ntheme = \"dark\"\n").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_missing_config_file_is_an_error_for_load_from() {
    let dir = TempDir::new().unwrap();
    assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_metadata_report_written_next_to_input() {
    let (dir, input) = temp_input("holiday clip.mkv");
    let caps: HardwareCapabilities = [HwTag::Nvenc, HwTag::CudaDecode].into_iter().collect();

    let report = collect_metadata(&input, &FakeProber::with_codec("h264"), &HostSystemInfo, caps)
        .unwrap();
    let written = write_metadata(&report, None).unwrap();

    assert_eq!(written, dir.path().join("holiday clip_metadata.json"));
    assert_eq!(written, default_metadata_path(&input));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(json["capabilities"], serde_json::json!(["nvenc", "cuda_decode"]));
    assert_eq!(json["media"]["streams"][0]["codec_name"], "h264");
    assert!(json["generated_at"].as_str().unwrap().ends_with('Z'));
    assert!(json["hardware"]["cpu"]["name"].is_string());
}

#[test]
fn test_metadata_explicit_output_path() {
    let (dir, input) = temp_input("a.mov");
    let target = dir.path().join("reports").join("a.json");
    fs::create_dir_all(target.parent().unwrap()).unwrap();

    let report = collect_metadata(
        &input,
        &FakeProber::with_codec("prores"),
        &HostSystemInfo,
        HardwareCapabilities::new(),
    )
    .unwrap();
    assert_eq!(write_metadata(&report, Some(&target)).unwrap(), target);
    assert!(target.is_file());
}

#[test]
fn test_probe_failure_fails_metadata() {
    let (_dir, input) = temp_input("a.mov");
    let result = collect_metadata(
        &input,
        &FakeProber::default(),
        &HostSystemInfo,
        HardwareCapabilities::new(),
    );
    assert!(result.is_err());
}

#[test]
fn test_host_snapshot_uses_placeholder_for_memory_speed() {
    let snapshot = HostSystemInfo.snapshot();
    assert_eq!(snapshot.memory.speed, UNKNOWN);
}
