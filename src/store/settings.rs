//! Wrapped program settings persistence (`settings.json`)

use super::write_json_pretty;
use crate::error::{AppError, Result};
use crate::models::{Config, TargetSettings};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads and writes the wrapped program's settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.settings_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory that holds the settings file
    pub fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Load the settings. A missing file reads as an empty object.
    pub fn load(&self) -> Result<TargetSettings> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TargetSettings::new()),
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to read '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        TargetSettings::from_json_str(&content).map_err(|e| {
            AppError::parse(format!("'{}' is not valid settings JSON: {}", self.path.display(), e))
        })
    }

    /// Write the full document back, creating the directory when needed
    pub fn save(&self, settings: &TargetSettings) -> Result<()> {
        write_json_pretty(&self.path, settings)
    }

    /// Create the directory and a skeleton file if missing.
    ///
    /// Returns true when the file was created.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&TargetSettings::skeleton())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> SettingsStore {
        SettingsStore::new(temp.path().join(".claude").join("settings.json"))
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let settings = store.load().unwrap();
        assert!(settings.as_map().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path(), "{ nope").unwrap();

        assert!(matches!(store.load(), Err(AppError::Parse(_))));
        // The foreign document is left alone
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ nope");
    }

    #[test]
    fn test_round_trip_preserves_unknown_fields() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let original = json!({
            "includeCoAuthoredBy": false,
            "env": { "ANTHROPIC_AUTH_TOKEN": "sk-123", "DISABLE_TELEMETRY": "1" },
            "ANTHROPIC_BASE_URL": "https://old.example",
            "statusLine": { "type": "command", "command": "echo hi" }
        });
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path(), serde_json::to_string_pretty(&original).unwrap()).unwrap();

        let mut settings = store.load().unwrap();
        settings.set_base_url("https://new.example").unwrap();
        store.save(&settings).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let mut expected = original;
        expected["env"]["ANTHROPIC_BASE_URL"] = json!("https://new.example");
        expected["ANTHROPIC_BASE_URL"] = json!("https://new.example");
        assert_eq!(written, expected);
    }

    #[test]
    fn test_ensure_exists_writes_skeleton_once() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        assert!(store.ensure_exists().unwrap());
        let settings = store.load().unwrap();
        assert_eq!(settings, TargetSettings::skeleton());

        fs::write(store.path(), "{\"env\": {\"X\": \"1\"}}").unwrap();
        assert!(!store.ensure_exists().unwrap());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{\"env\": {\"X\": \"1\"}}");
    }

    #[test]
    fn test_dir_of_bare_file_name() {
        let store = SettingsStore::new(PathBuf::from("settings.json"));
        assert_eq!(store.dir(), PathBuf::from("."));
    }
}
