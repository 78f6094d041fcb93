//! Command dispatch
//!
//! Each command loads what it needs, prints its result and returns an error
//! for `main` to turn into an exit code.

use crate::{
    cli::{Command, ConfigCommand, UrlCommand},
    error::{AppError, ErrorContext, Result},
    launcher::{FileBrowser, ProgramRunner, SystemFileBrowser},
    logging::{ErrorEventLogger, LoggerFactory},
    models::{CandidateList, Config, SettingUpdate, TargetSettings},
    output::{OutputFormatter, OutputFormatterFactory, ProgressObserver},
    probe::{Prober, Selector},
    store::{CandidateStore, LoadStatus, SettingsStore},
};

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    command: Option<Command>,
    candidates: CandidateStore,
    settings: SettingsStore,
    formatter: Box<dyn OutputFormatter>,
    browser: Box<dyn FileBrowser>,
    prober: Option<Prober>,
    loggers: LoggerFactory,
}

impl App {
    pub fn new(config: Config, command: Option<Command>) -> Self {
        Self {
            candidates: CandidateStore::from_config(&config),
            settings: SettingsStore::from_config(&config),
            formatter: OutputFormatterFactory::for_config(&config),
            browser: Box::new(SystemFileBrowser::new()),
            prober: None,
            loggers: LoggerFactory::new(config.clone()),
            config,
            command,
        }
    }

    /// Use a different file browser for `config open`
    pub fn with_browser(mut self, browser: Box<dyn FileBrowser>) -> Self {
        self.browser = browser;
        self
    }

    /// Use a prebuilt prober for `test`
    pub fn with_prober(mut self, prober: Prober) -> Self {
        self.prober = Some(prober);
        self
    }

    /// Run the selected command
    pub async fn run(self) -> Result<()> {
        let error_logger = self.loggers.create_error_logger();
        let result = self.dispatch(&error_logger).await;

        if let Err(error) = &result {
            if !matches!(error, AppError::ChildExit { .. }) {
                error_logger.log_error(error, self.command_name());
            }
        }
        result
    }

    fn command_name(&self) -> &'static str {
        match &self.command {
            None => "run",
            Some(Command::Test) => "test",
            Some(Command::Url { .. }) => "url",
            Some(Command::Config { .. }) => "config",
        }
    }

    async fn dispatch(&self, error_logger: &ErrorEventLogger) -> Result<()> {
        match &self.command {
            None => self.run_program().await,
            Some(Command::Test) => self.test(error_logger).await,
            Some(Command::Url { action }) => match action {
                UrlCommand::Add { urls } => self.url_add(urls),
                UrlCommand::Rm { url } => self.url_rm(url),
                UrlCommand::Clear => self.url_clear(),
                UrlCommand::List => self.url_list(error_logger),
            },
            Some(Command::Config { action }) => match action {
                ConfigCommand::Open => self.config_open(error_logger),
                ConfigCommand::List => self.config_list(error_logger),
                ConfigCommand::Set { setting } => self.config_set(setting),
            },
        }
    }

    /// Load the candidate list for a command that will write it back
    fn load_candidates(&self) -> Result<CandidateList> {
        let loaded = self
            .candidates
            .load()
            .with_context(|| "Cannot update the URL list".to_string())?;
        self.report_load_status(&loaded.status);
        Ok(loaded.value)
    }

    /// Load the candidate list, falling back to an empty one if unreadable
    fn read_candidates(&self, error_logger: &ErrorEventLogger) -> CandidateList {
        match self.candidates.load() {
            Ok(loaded) => {
                self.report_load_status(&loaded.status);
                loaded.value
            }
            Err(error) => {
                println!("{}", self.formatter.format_error(&error.to_string()));
                error_logger.log_fallback(&error, "using an empty URL list");
                CandidateList::new()
            }
        }
    }

    fn report_load_status(&self, status: &LoadStatus) {
        if let LoadStatus::Repaired(reason) = status {
            println!(
                "{}",
                self.formatter.format_warning(&format!(
                    "URL list '{}' was corrupt and has been reset ({})",
                    self.candidates.path().display(),
                    reason
                ))
            );
        }
    }

    /// Load the settings for display, falling back to an empty object
    fn read_settings(&self, error_logger: &ErrorEventLogger) -> TargetSettings {
        match self.settings.load() {
            Ok(settings) => settings,
            Err(error) => {
                println!("{}", self.formatter.format_warning("Failed to read the settings file"));
                error_logger.log_fallback(&error, "showing empty settings");
                TargetSettings::new()
            }
        }
    }

    fn url_add(&self, raw: &[String]) -> Result<()> {
        let mut list = self.load_candidates()?;
        let report = list.add(raw);

        if report.added_count() == 0 && report.duplicate_count() == 0 {
            return Err(AppError::validation("No URLs given"));
        }

        if !report.is_noop() {
            self.candidates.save(&list)?;
        }
        println!("{}", self.formatter.format_add_report(&report));
        Ok(())
    }

    fn url_rm(&self, url: &str) -> Result<()> {
        let mut list = self.load_candidates()?;
        let removed = list.remove(url);
        if removed {
            self.candidates.save(&list)?;
        }
        println!("{}", self.formatter.format_removed(url, removed));
        Ok(())
    }

    fn url_clear(&self) -> Result<()> {
        let mut list = self.load_candidates()?;
        let count = list.clear();
        self.candidates.save(&list)?;
        println!("{}", self.formatter.format_cleared(count));
        Ok(())
    }

    fn url_list(&self, error_logger: &ErrorEventLogger) -> Result<()> {
        let list = self.read_candidates(error_logger);
        let settings = self.read_settings(error_logger);

        if !list.is_empty() {
            println!("{}", self.formatter.format_header("Candidate URLs"));
        }
        println!("{}", self.formatter.format_url_list(&list, settings.base_url()));
        Ok(())
    }

    fn config_open(&self, error_logger: &ErrorEventLogger) -> Result<()> {
        if self.settings.ensure_exists()? {
            println!(
                "{}",
                self.formatter
                    .format_info(&format!("Created {}", self.settings.path().display()))
            );
        }

        let dir = self.settings.dir();
        match self.browser.open(&dir) {
            Ok(()) => {
                println!(
                    "{}",
                    self.formatter
                        .format_success(&format!("Opened settings directory: {}", dir.display()))
                );
            }
            Err(error) => {
                println!("{}", self.formatter.format_error(&error.to_string()));
                println!(
                    "{}",
                    self.formatter
                        .format_hint(&format!("Settings directory: {}", dir.display()))
                );
                error_logger.log_fallback(&error, "printed the path instead");
            }
        }

        println!(
            "{}",
            self.formatter
                .format_hint(&format!("Settings file: {}", self.settings.path().display()))
        );
        Ok(())
    }

    fn config_list(&self, error_logger: &ErrorEventLogger) -> Result<()> {
        let settings = self.read_settings(error_logger);
        let list = self.read_candidates(error_logger);
        println!(
            "{}",
            self.formatter
                .format_settings_overview(&settings, &list, self.settings.path())
        );
        Ok(())
    }

    fn config_set(&self, raw: &str) -> Result<()> {
        let update = SettingUpdate::parse(raw)?;

        // A settings file that cannot be parsed is never overwritten
        let mut settings = self.settings.load()?;
        settings.apply(&update)?;
        self.settings.save(&settings)?;

        let message = match &update {
            SettingUpdate::Token(_) => "Auth token updated".to_string(),
            SettingUpdate::BaseUrl(url) => format!("Base URL updated: {}", url),
        };
        println!("{}", self.formatter.format_success(&message));
        Ok(())
    }

    async fn test(&self, error_logger: &ErrorEventLogger) -> Result<()> {
        let list = self.read_candidates(error_logger);
        if list.is_empty() {
            println!("{}", self.formatter.format_warning("No URLs configured"));
            println!(
                "{}",
                self.formatter.format_hint("Use 'cc url add url1,url2' to add URLs")
            );
            return Err(AppError::validation("The URL list is empty"));
        }

        let built;
        let prober = match &self.prober {
            Some(prober) => prober,
            None => {
                built = Prober::from_config(&self.config)?;
                &built
            }
        };

        let probe_logger = self.loggers.create_probe_logger();
        probe_logger.log_round_start(list.len(), prober.timeout());

        println!("{}", self.formatter.format_info("🔍 Testing URL response times..."));
        let observer = ProgressObserver::stdout(self.config.enable_color, self.config.verbose);
        let report = prober.probe_all(list.urls(), Some(&observer)).await?;
        probe_logger.log_report(&report);

        println!();
        println!("{}", self.formatter.format_probe_table(&report));

        if report.winner().is_none() {
            println!("{}", self.formatter.format_error("All URLs are unreachable"));
            println!(
                "{}",
                self.formatter
                    .format_hint("Check your network connection or the URL list")
            );
        } else {
            println!();
            println!("{}", self.formatter.format_info("Updating settings..."));
        }

        let winner = Selector::new(self.settings.clone()).select(&report)?;
        probe_logger.log_winner_applied(&winner.url, self.settings.path());

        println!(
            "{}",
            self.formatter
                .format_success(&format!("Base URL updated: {} ({})", winner.url, winner.latency))
        );
        Ok(())
    }

    async fn run_program(&self) -> Result<()> {
        let runner = ProgramRunner::from_config(&self.config);
        let result = runner.run().await;

        if let Err(AppError::Launch(_)) = &result {
            eprintln!(
                "{}",
                self.formatter.format_hint(&format!(
                    "Make sure '{}' is installed and on your PATH",
                    runner.program()
                ))
            );
        }
        result
    }
}
