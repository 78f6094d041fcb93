//! cc-config
//!
//! Endpoint switcher for the `claude` command-line program. Keeps a list of
//! candidate base URLs, probes them concurrently for reachability and latency,
//! and writes the fastest one into the program's settings file.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod store;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{AddReport, CandidateList, Config, SettingKey, SettingUpdate, TargetSettings};
pub use probe::{Latency, ProbeObserver, ProbeReport, ProbeResult, Prober};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const MAX_TIMEOUT_SECS: u64 = 300;
    pub const DEFAULT_PROGRAM: &str = "claude";
    pub const USER_AGENT: &str = concat!("cc-config/", env!("CARGO_PKG_VERSION"));

    /// Candidate list lives in `~/.cc/config.json`
    pub const CONFIG_DIR_NAME: &str = ".cc";
    pub const CONFIG_FILE_NAME: &str = "config.json";

    /// Wrapped program settings live in `~/.claude/settings.json`
    pub const SETTINGS_DIR_NAME: &str = ".claude";
    pub const SETTINGS_FILE_NAME: &str = "settings.json";

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
