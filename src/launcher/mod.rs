//! Child processes: the wrapped program and the desktop file browser

pub mod platform;

use crate::{
    error::{AppError, Result},
    models::Config,
};
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use tokio::process::Command;

/// Opens a directory for the user to browse
pub trait FileBrowser {
    fn open(&self, dir: &Path) -> Result<()>;
}

/// File browser backed by the platform's opener command
#[derive(Debug, Clone)]
pub struct SystemFileBrowser {
    command: String,
}

impl Default for SystemFileBrowser {
    fn default() -> Self {
        Self::with_command(platform::file_browser_command())
    }
}

impl SystemFileBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl FileBrowser for SystemFileBrowser {
    /// Spawn the opener detached; it is never waited on
    fn open(&self, dir: &Path) -> Result<()> {
        StdCommand::new(&self.command)
            .arg(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| {
                AppError::launch(format!(
                    "Failed to open '{}' with {}: {}",
                    dir.display(),
                    self.command,
                    e
                ))
            })
    }
}

/// Runs the wrapped program in the foreground
#[derive(Debug, Clone)]
pub struct ProgramRunner {
    program: String,
}

impl ProgramRunner {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.program.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the program with inherited stdio and wait for it.
    ///
    /// A non-zero exit becomes [`AppError::ChildExit`] carrying the code to mirror.
    pub async fn run(&self) -> Result<()> {
        let status = Command::new(&self.program)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| AppError::launch(format!("Failed to start '{}': {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(AppError::child_exit(
                self.program.clone(),
                platform::exit_code_of(&status),
            ))
        }
    }
}
