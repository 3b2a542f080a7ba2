//! Dataset discovery in the data directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{IngestError, Result};

/// File extensions recognized as datasets (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "txt"];

/// One dataset file as reported by [`DatasetCatalog::list_datasets`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetEntry {
    pub name: String,
    pub size_bytes: u64,
    /// Lowercased extension including the leading dot, e.g. `.csv`.
    pub ext: String,
}

/// Datasets available under one directory. Scanned on every call, never cached.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    root: PathBuf,
}

impl DatasetCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(IngestError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }
        Ok(())
    }

    /// Lists every regular file with an allowed extension, sorted by name.
    pub fn list_datasets(&self) -> Result<Vec<DatasetEntry>> {
        self.ensure_root()?;

        let entries = std::fs::read_dir(&self.root).map_err(|e| IngestError::DirectoryRead {
            path: self.root.clone(),
            source: e,
        })?;

        let mut datasets = Vec::new();
        for entry_result in entries {
            let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
                path: self.root.clone(),
                source: e,
            })?;

            let path = entry.path();
            if !is_allowed_file(&path) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::debug!(path = %path.display(), "Skipping non UTF-8 file name");
                continue;
            };

            let metadata = entry.metadata().map_err(|e| IngestError::FileRead {
                path: path.clone(),
                source: e,
            })?;
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e.to_ascii_lowercase()))
                .unwrap_or_default();

            datasets.push(DatasetEntry {
                name: name.to_string(),
                size_bytes: metadata.len(),
                ext,
            });
        }

        datasets.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(root = %self.root.display(), count = datasets.len(), "Listed datasets");
        Ok(datasets)
    }

    /// Dataset names only, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self
            .list_datasets()?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Maps a dataset name to its path inside the data directory.
    ///
    /// The name must be a bare file name with an allowed extension. Anything
    /// that would escape the directory is rejected as [`IngestError::InvalidName`].
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let name = sanitize_name(name)?;
        self.ensure_root()?;

        let candidate = self.root.join(name);
        if !is_allowed_file(&candidate) {
            return Err(IngestError::DatasetNotFound {
                name: name.to_string(),
            });
        }

        let canonical_root = self.root.canonicalize().map_err(|e| IngestError::DirectoryRead {
            path: self.root.clone(),
            source: e,
        })?;
        let canonical = candidate.canonicalize().map_err(|e| IngestError::FileRead {
            path: candidate.clone(),
            source: e,
        })?;
        if canonical.parent() != Some(canonical_root.as_path()) {
            return Err(IngestError::InvalidName {
                name: name.to_string(),
            });
        }

        Ok(candidate)
    }
}

/// Rejects names that are empty or could refer outside the data directory.
pub fn sanitize_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || trimmed.contains("..")
    {
        return Err(IngestError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(trimmed)
}

/// True for regular files whose extension is in [`ALLOWED_EXTENSIONS`].
pub fn is_allowed_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ALLOWED_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
}

/// File name without its extension (`sales.csv` -> `sales`).
pub fn dataset_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}
