//! Export artifacts and saving them to disk.

use std::path::{Path, PathBuf};

use tabmerge_model::ExportFormat;

use crate::error::{OutputError, Result};

/// Serialized table plus what a client needs to store it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
    pub format: ExportFormat,
}

/// File name for a download.
///
/// Uses `requested` when given (directory parts dropped), otherwise
/// `default_name`. Characters outside `[A-Za-z0-9._ -]` become `_` and the
/// extension is replaced by the format's.
pub fn suggested_file_name(
    requested: Option<&str>,
    default_name: &str,
    format: ExportFormat,
) -> String {
    let raw = requested
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(default_name);
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = Path::new(&cleaned)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.chars().all(|c| c == '.'))
        .unwrap_or("export");

    format!("{stem}.{}", format.extension())
}

/// Writes the artifact into `dir` (created if missing) and returns its path.
pub fn save_artifact(artifact: &ExportArtifact, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| OutputError::Write {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes).map_err(|e| OutputError::Write {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "Saved export");
    Ok(path)
}
