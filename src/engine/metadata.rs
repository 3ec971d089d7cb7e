//! JSON metadata artifact describing a source file and the machine that
//! probed it.

use crate::engine::core::{ConvertResult, ensure_regular_file};
use crate::engine::hardware::HardwareCapabilities;
use crate::engine::probe::{MediaInfo, MediaProber};
use crate::engine::system::{SystemInfoProvider, SystemSnapshot};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct MetadataReport {
    /// RFC 3339, UTC
    pub generated_at: String,
    pub source_file: PathBuf,
    pub hardware: SystemSnapshot,
    pub capabilities: HardwareCapabilities,
    pub media: MediaInfo,
}

impl MetadataReport {
    pub fn new(
        generated_at: DateTime<Utc>,
        source_file: &Path,
        hardware: SystemSnapshot,
        capabilities: HardwareCapabilities,
        media: MediaInfo,
    ) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            source_file: source_file.to_path_buf(),
            hardware,
            capabilities,
            media,
        }
    }

    pub fn to_json(&self) -> ConvertResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| std::io::Error::other(e).into())
    }
}

/// `<input dir>/<stem>_metadata.json`
pub fn default_metadata_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "output".into());
    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{}_metadata.json", stem))
}

/// Gather a report for `input` from the given providers
pub fn collect_metadata<M, S>(
    input: &Path,
    prober: &M,
    system: &S,
    capabilities: HardwareCapabilities,
) -> ConvertResult<MetadataReport>
where
    M: MediaProber + ?Sized,
    S: SystemInfoProvider + ?Sized,
{
    ensure_regular_file(input)?;
    let media = prober.probe(input)?;
    Ok(MetadataReport::new(
        Utc::now(),
        input,
        system.snapshot(),
        capabilities,
        media,
    ))
}

/// Write the report as pretty JSON, returning the path written
pub fn write_metadata(report: &MetadataReport, output: Option<&Path>) -> ConvertResult<PathBuf> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_metadata_path(&report.source_file));
    fs::write(&path, report.to_json()?)?;
    tracing::info!("Metadata written to {}", path.display());
    Ok(path)
}
