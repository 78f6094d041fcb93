//! Error handling for the endpoint switcher

use thiserror::Error;

/// Custom error types for the endpoint switcher
#[derive(Error, Debug)]
pub enum AppError {
    /// Runtime configuration errors (missing home directory, bad option values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (bad key=value syntax, malformed URL, unsupported key)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parsing errors (JSON documents, URLs)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Storage errors (read/write failure, permission denied)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Every candidate URL was unreachable
    #[error("No reachable candidate: {0}")]
    NoReachableCandidate(String),

    /// A child process could not be started
    #[error("Launch error: {0}")]
    Launch(String),

    /// The wrapped program ran and exited with a non-zero status
    #[error("{program} exited with status {code}")]
    ChildExit { program: String, code: i32 },

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    /// Create a new "nothing reachable" error
    pub fn no_reachable_candidate<S: Into<String>>(message: S) -> Self {
        Self::NoReachableCandidate(message.into())
    }

    /// Create a new launch error
    pub fn launch<S: Into<String>>(message: S) -> Self {
        Self::Launch(message.into())
    }

    /// Create a child-exit error that mirrors the child's exit code
    pub fn child_exit<S: Into<String>>(program: S, code: i32) -> Self {
        Self::ChildExit { program: program.into(), code }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Parse(_) => "PARSE",
            Self::Storage(_) => "STORAGE",
            Self::NoReachableCandidate(_) => "PROBE",
            Self::Launch(_) => "LAUNCH",
            Self::ChildExit { .. } => "CHILD",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check the command line options (--config-dir, --settings, --timeout).", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Use 'cc config set token=<value>' or 'cc config set url=https://host'.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the JSON syntax of the file or fix it with 'cc config open'.", msg)
            }
            Self::Storage(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::NoReachableCandidate(msg) => {
                format!("No candidate URL responded: {}\n\nSuggestion: Check your network connection or the URL list ('cc url list').", msg)
            }
            Self::Launch(msg) => {
                format!("Could not start process: {}\n\nSuggestion: Make sure the program is installed and on your PATH.", msg)
            }
            Self::ChildExit { program, code } => {
                format!("{} exited with status {}", program, code)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,  // Invalid configuration/usage
            Self::NoReachableCandidate(_) => 2,
            Self::Launch(_) => 3,
            Self::Storage(_) => 5,
            Self::ChildExit { code, .. } => *code,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::NoReachableCandidate(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Launch(_) | Self::ChildExit { .. } => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::Storage(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::storage(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        Self::internal(format!("HTTP client error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error, keeping its category
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context = f();
            match e.into() {
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                AppError::Validation(msg) => AppError::Validation(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::Parse(format!("{}: {}", context, msg)),
                AppError::Storage(msg) => AppError::Storage(format!("{}: {}", context, msg)),
                AppError::Launch(msg) => AppError::Launch(format!("{}: {}", context, msg)),
                AppError::NoReachableCandidate(msg) => {
                    AppError::NoReachableCandidate(format!("{}: {}", context, msg))
                }
                AppError::Internal(msg) => AppError::Internal(format!("{}: {}", context, msg)),
                exit @ AppError::ChildExit { .. } => exit,
            }
        })
    }
}

/// Error reporter for user feedback at the command boundary
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        // The child already printed its own output; only mention the status
        if let AppError::ChildExit { .. } = error {
            if self.verbose {
                eprintln!("{}", error.format_for_console(self.use_color));
            }
            return;
        }

        eprintln!("{}", error.format_for_console(self.use_color));

        if self.verbose {
            eprintln!();
            eprintln!("{}", error.user_friendly_message());
        }
    }
}
