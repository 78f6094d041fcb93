//! Command-line interface

use crate::defaults;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Switch the claude CLI between candidate API base URLs.
///
/// Without a command, runs the wrapped program with the terminal attached.
#[derive(Parser, Debug, Clone)]
#[command(name = "cc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Probe timeout in seconds (1-300)
    #[arg(short, long, global = true, value_parser = parse_duration, default_value_t = defaults::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Directory holding the candidate list [default: ~/.cc]
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Settings file of the wrapped program [default: ~/.claude/settings.json]
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Program launched when no command is given
    #[arg(long, global = true, value_name = "NAME", default_value = defaults::DEFAULT_PROGRAM)]
    pub program: String,

    /// Force colored output
    #[arg(long, global = true, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Manage the candidate base URLs
    Url {
        #[command(subcommand)]
        action: UrlCommand,
    },

    /// Inspect or change the wrapped program's settings
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Probe every candidate and activate the fastest one
    Test,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum UrlCommand {
    /// Add URLs (separate several with commas, semicolons or spaces)
    Add {
        #[arg(required = true, num_args = 1.., value_name = "URL")]
        urls: Vec<String>,
    },

    /// Remove a URL
    #[command(alias = "remove")]
    Rm {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Remove every URL
    Clear,

    /// List the URLs
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Open the settings directory in the file browser
    Open,

    /// Show the token, the active base URL and the candidates
    List,

    /// Set token=<value> or url=<value>
    Set {
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },
}

impl Cli {
    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Name of the selected command for logs
    pub fn command_name(&self) -> &'static str {
        match &self.command {
            None => "run",
            Some(Command::Test) => "test",
            Some(Command::Url { action }) => match action {
                UrlCommand::Add { .. } => "url add",
                UrlCommand::Rm { .. } => "url rm",
                UrlCommand::Clear => "url clear",
                UrlCommand::List => "url list",
            },
            Some(Command::Config { action }) => match action {
                ConfigCommand::Open => "config open",
                ConfigCommand::List => "config list",
                ConfigCommand::Set { .. } => "config set",
            },
        }
    }
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > defaults::MAX_TIMEOUT_SECS {
                Err(format!(
                    "Duration cannot exceed {} seconds",
                    defaults::MAX_TIMEOUT_SECS
                ))
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    supports_color_with(|name| std::env::var(name).ok())
}

fn supports_color_with<F>(var: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if var("TERM").as_deref() == Some("dumb") {
        return false;
    }

    if var("NO_COLOR").is_some() {
        return false;
    }

    if var("FORCE_COLOR").is_some() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if var("ANSICON").is_some() || var("ConEmuANSI").is_some() {
            return true;
        }
    }

    cfg!(unix)
}
