//! JSON document storage
//!
//! Two documents are managed here: the candidate list owned by this tool and
//! the settings file owned by the wrapped program.

pub mod candidates;
pub mod settings;

pub use candidates::CandidateStore;
pub use settings::SettingsStore;

use crate::error::{AppError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// How a document came to be in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Read and parsed from disk
    Loaded,
    /// File was missing and has been created with defaults
    Created,
    /// File was corrupt and has been reset to defaults; carries the parse error
    Repaired(String),
}

/// A loaded document together with how it was obtained
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub status: LoadStatus,
}

impl<T> Loaded<T> {
    pub fn new(value: T, status: LoadStatus) -> Self {
        Self { value, status }
    }
}

/// Create the parent directory of `path` if it does not exist
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::storage(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// Serialize `value` as two-space indented JSON and write it to `path`
pub(crate) fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;

    let content = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("Failed to serialize '{}': {}", path.display(), e)))?;

    fs::write(path, content)
        .map_err(|e| AppError::storage(format!("Failed to write '{}': {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_nested_parent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("doc.json");

        write_json_pretty(&path, &serde_json::json!({ "k": [1] })).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"k\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_write_into_file_as_directory_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let result = write_json_pretty(&blocker.join("doc.json"), &serde_json::json!({}));
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
