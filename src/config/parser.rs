//! Build the runtime configuration from CLI arguments

use crate::{
    cli::Cli,
    error::{AppError, Result},
    models::Config,
};
use std::path::Path;

/// Turns parsed arguments into a validated [`Config`]
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse against the current user's home directory
    pub fn parse(&self) -> Result<Config> {
        self.parse_with_home(dirs::home_dir().as_deref())
    }

    /// Parse with an explicit home directory.
    ///
    /// The home directory is only needed for paths not given on the command line.
    pub fn parse_with_home(&self, home: Option<&Path>) -> Result<Config> {
        let mut config = match home {
            Some(home) => Config::with_home(home),
            None if self.cli.config_dir.is_some() && self.cli.settings.is_some() => {
                Config::with_home(Path::new("."))
            }
            None => {
                return Err(AppError::config(
                    "Cannot determine the home directory; pass --config-dir and --settings",
                ));
            }
        };

        self.apply_cli_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        config.timeout_seconds = self.cli.timeout;
        config.program = self.cli.program.trim().to_string();
        config.enable_color = self.cli.use_colors();
        config.verbose = self.cli.verbose || self.cli.debug;
        config.debug = self.cli.debug;

        if let Some(dir) = &self.cli.config_dir {
            config.config_dir = dir.clone();
        }
        if let Some(settings) = &self.cli.settings {
            config.settings_path = settings.clone();
        }
    }
}

/// Convenience function to load the configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for debug output
pub fn display_config_summary(config: &Config) -> String {
    let lines = [
        format!("Candidate list: {}", display_path(&config.candidates_path())),
        format!("Settings file: {}", display_path(&config.settings_path)),
        format!("Program: {}", config.program),
        format!("Timeout: {}s", config.timeout_seconds),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ];
    lines.join("\n")
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
