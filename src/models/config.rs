//! Runtime configuration data model and validation

use crate::defaults;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
///
/// Every component receives the paths it works on through this struct, so
/// tests can point the whole tool at a temporary directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the candidate list (`config.json`)
    pub config_dir: PathBuf,

    /// Settings file of the wrapped program
    pub settings_path: PathBuf,

    /// Per-probe timeout
    pub timeout_seconds: u64,

    /// Wrapped program launched when no subcommand is given
    pub program: String,

    /// Enable colored terminal output
    pub enable_color: bool,

    /// Enable verbose output
    pub verbose: bool,

    /// Enable debug output
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_home(&home)
    }
}

impl Config {
    /// Create a configuration rooted at the given home directory
    pub fn with_home(home: &Path) -> Self {
        Self {
            config_dir: home.join(defaults::CONFIG_DIR_NAME),
            settings_path: home
                .join(defaults::SETTINGS_DIR_NAME)
                .join(defaults::SETTINGS_FILE_NAME),
            timeout_seconds: defaults::DEFAULT_TIMEOUT.as_secs(),
            program: defaults::DEFAULT_PROGRAM.to_string(),
            enable_color: defaults::DEFAULT_ENABLE_COLOR,
            verbose: false,
            debug: false,
        }
    }

    /// Path of the candidate list file
    pub fn candidates_path(&self) -> PathBuf {
        self.config_dir.join(defaults::CONFIG_FILE_NAME)
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > defaults::MAX_TIMEOUT_SECS {
            return Err(AppError::config(format!(
                "Timeout cannot exceed {} seconds",
                defaults::MAX_TIMEOUT_SECS
            )));
        }

        if self.program.trim().is_empty() {
            return Err(AppError::config("Program name cannot be empty"));
        }

        if self.config_dir.as_os_str().is_empty() {
            return Err(AppError::config("Config directory cannot be empty"));
        }

        if self.settings_path.file_name().is_none() {
            return Err(AppError::config(format!(
                "Settings path '{}' does not name a file",
                self.settings_path.display()
            )));
        }

        Ok(())
    }
}
