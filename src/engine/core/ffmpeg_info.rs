use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Check if ffmpeg is available and return its version line
pub fn ffmpeg_version(ffmpeg: &Path) -> Result<String> {
    tool_version(ffmpeg, "ffmpeg")
}

/// Check if ffprobe is available and return its version line
pub fn ffprobe_version(ffprobe: &Path) -> Result<String> {
    tool_version(ffprobe, "ffprobe")
}

fn tool_version(program: &Path, label: &str) -> Result<String> {
    let output = Command::new(program)
        .arg("-version")
        .output()
        .with_context(|| {
            format!(
                "Failed to execute {} ({}). Is it installed and in PATH?",
                label,
                program.display()
            )
        })?;

    if !output.status.success() {
        anyhow::bail!("{} command failed with status: {}", label, output.status);
    }

    Ok(first_line(&String::from_utf8_lossy(&output.stdout)))
}

fn first_line(version_output: &str) -> String {
    version_output
        .lines()
        .next()
        .unwrap_or("Unknown version")
        .to_string()
}
