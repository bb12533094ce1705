// ABOUTME: Persister contract for handing a finished ExtractionResult to durable storage.
// ABOUTME: JsonFilePersister writes pretty JSON to a fixed path or a timestamped file in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::HarvestError;
use crate::result::ExtractionResult;

/// Accepts one result and stores it somewhere; returns where it went.
pub trait Persister {
    fn persist(&self, result: &ExtractionResult) -> Result<String, HarvestError>;
}

#[derive(Debug, Clone)]
enum Target {
    File(PathBuf),
    Directory { dir: PathBuf, prefix: String },
}

/// Writes results as pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct JsonFilePersister {
    target: Target,
}

impl JsonFilePersister {
    /// Always write to `path`, replacing any previous file.
    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::File(path.into()),
        }
    }

    /// Write to `<dir>/<prefix>_<YYYYMMDD_HHMMSS>.json`, named from the capture time.
    pub fn in_dir(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            target: Target::Directory {
                dir: dir.into(),
                prefix: prefix.into(),
            },
        }
    }

    /// The file a given result would be written to.
    pub fn path_for(&self, result: &ExtractionResult) -> PathBuf {
        match &self.target {
            Target::File(path) => path.clone(),
            Target::Directory { dir, prefix } => dir.join(format!(
                "{}_{}.json",
                prefix,
                result.captured_at.format("%Y%m%d_%H%M%S")
            )),
        }
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

impl Persister for JsonFilePersister {
    fn persist(&self, result: &ExtractionResult) -> Result<String, HarvestError> {
        let path = self.path_for(result);
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| HarvestError::persist(&result.url, "Serialize", Some(e.into())))?;

        ensure_parent(&path)
            .and_then(|_| fs::write(&path, json))
            .map_err(|e| {
                HarvestError::persist(
                    &result.url,
                    "Persist",
                    Some(anyhow::anyhow!("writing {}: {}", path.display(), e)),
                )
            })?;

        info!(path = %path.display(), records = result.record_count, "saved results");
        Ok(path.display().to_string())
    }
}
