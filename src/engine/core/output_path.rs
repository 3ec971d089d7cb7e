use super::types::ResolvedOutputPath;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

const CONVERTED_SUFFIX: &str = "_converted";

/// Compute the output path for a conversion.
///
/// - no destination: next to the input, named `<stem>_converted.<ext>`
/// - an existing directory, a path written with a trailing separator, or a
///   path with no file name (`""`, `foo/..`): `<dir>/<stem>_converted.<ext>`
/// - anything else is a file path; its extension is replaced when it is not
///   exactly `extension` (case-sensitive)
///
/// Existing files at the result are not checked here.
pub fn resolve_output_path(
    input: &Path,
    destination: Option<&Path>,
    extension: &str,
) -> ResolvedOutputPath {
    let Some(dest) = destination else {
        let dir = input.parent().unwrap_or_else(|| Path::new(""));
        return ResolvedOutputPath {
            path: dir.join(converted_file_name(input, extension)),
            corrected_from: None,
        };
    };

    if dest.is_dir() || has_trailing_separator(dest) || dest.file_name().is_none() {
        return ResolvedOutputPath {
            path: dest.join(converted_file_name(input, extension)),
            corrected_from: None,
        };
    }

    if dest.extension() == Some(OsStr::new(extension)) {
        return ResolvedOutputPath {
            path: dest.to_path_buf(),
            corrected_from: None,
        };
    }

    let corrected = dest.with_extension(extension);
    tracing::warn!(
        "Output extension does not match the selected format, writing {} instead of {}",
        corrected.display(),
        dest.display()
    );
    ResolvedOutputPath {
        path: corrected,
        corrected_from: Some(dest.to_path_buf()),
    }
}

fn converted_file_name(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "output".into());
    PathBuf::from(format!("{}{}.{}", stem, CONVERTED_SUFFIX, extension))
}

fn has_trailing_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}
