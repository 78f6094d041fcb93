//! Candidate list persistence (`config.json`)

use super::{write_json_pretty, LoadStatus, Loaded};
use crate::error::{AppError, Result};
use crate::models::{CandidateList, Config};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads and writes the candidate list file
#[derive(Debug, Clone)]
pub struct CandidateStore {
    path: PathBuf,
}

impl CandidateStore {
    /// Create a store for the given file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store for the candidate list named by the runtime configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.candidates_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the list.
    ///
    /// A missing file is created empty and a corrupt one is reset to empty and
    /// rewritten. Only an unreadable file (or an unwritable one while creating or
    /// repairing) is reported as an error.
    pub fn load(&self) -> Result<Loaded<CandidateList>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let list = CandidateList::new();
                self.save(&list)?;
                return Ok(Loaded::new(list, LoadStatus::Created));
            }
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to read '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        match serde_json::from_slice::<CandidateList>(&bytes) {
            Ok(list) => Ok(Loaded::new(list, LoadStatus::Loaded)),
            Err(parse_error) => {
                let list = CandidateList::new();
                self.save(&list)?;
                Ok(Loaded::new(list, LoadStatus::Repaired(parse_error.to_string())))
            }
        }
    }

    /// Write the list, creating the directory when needed
    pub fn save(&self, list: &CandidateList) -> Result<()> {
        write_json_pretty(&self.path, list)
    }
}
