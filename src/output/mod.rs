//! Output formatting and display
//!
//! Command results are rendered to strings by an [`OutputFormatter`] and
//! printed by the caller; colors are applied only when enabled.

mod console;
mod formatter;
mod progress;

pub use console::{ColorScheme, ConsoleFormatter, PerformanceLevel, ACTIVE_MARKER};
pub use formatter::{
    align_text, Alignment, Column, FormattingOptions, OutputFormatter, RowData, TableFormat,
};
pub use progress::ProgressObserver;

use crate::models::Config;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };
        Box::new(ConsoleFormatter::new(options))
    }

    /// Formatter matching the runtime flags
    pub fn for_config(config: &Config) -> Box<dyn OutputFormatter> {
        Self::create_formatter(config.enable_color, config.verbose)
    }
}
