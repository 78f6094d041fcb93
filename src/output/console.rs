//! Terminal formatter with optional ANSI colors

use super::formatter::{Alignment, Column, FormattingOptions, OutputFormatter, RowData, TableFormat};
use crate::models::{mask_token, AddReport, CandidateList, TargetSettings};
use crate::probe::{Latency, ProbeReport};
use colored::*;
use std::path::Path;
use std::time::Duration;

/// Marker appended to the candidate that is currently active
pub const ACTIVE_MARKER: &str = "(active)";

const RULE_WIDTH: usize = 50;

/// Latency classification for color coding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceLevel {
    Excellent, // < 100ms
    Good,      // 100-300ms
    Fair,      // 300-1000ms
    Poor,      // >= 1000ms
    Unreachable,
}

impl PerformanceLevel {
    pub fn from_latency(latency: &Latency) -> Self {
        match latency.as_duration() {
            None => Self::Unreachable,
            Some(d) if d < Duration::from_millis(100) => Self::Excellent,
            Some(d) if d < Duration::from_millis(300) => Self::Good,
            Some(d) if d < Duration::from_millis(1000) => Self::Fair,
            Some(_) => Self::Poor,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::Unreachable => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub highlight: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,
            highlight: Color::Magenta,
            muted: Color::BrightBlack,
        }
    }
}

/// Console formatter; every style is a no-op when colors are disabled
pub struct ConsoleFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ConsoleFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.options.enable_color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str, color: Color) -> String {
        if self.options.enable_color {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn muted(&self, text: &str) -> String {
        self.colorize(text, self.color_scheme.muted)
    }

    fn rule(&self) -> String {
        self.muted(&"─".repeat(RULE_WIDTH))
    }

    /// Verbose mode shows why an unreachable candidate failed
    fn status_label(&self, report: &ProbeReport, index: usize) -> String {
        let result = &report.results()[index];
        if !result.is_reachable() {
            if self.options.verbose_mode {
                if let Some(cause) = &result.cause {
                    return cause.clone();
                }
            }
            return match result.status {
                Some(status) => format!("HTTP {}", status),
                None => "failed".to_string(),
            };
        }

        let status = result.status.map(|s| s.to_string()).unwrap_or_default();
        if index == 0 {
            format!("{} fastest", status)
        } else {
            status
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_header(&self, title: &str) -> String {
        self.bold(title, self.color_scheme.header)
    }

    fn format_add_report(&self, report: &AddReport) -> String {
        let mut lines = vec![self.format_success(&report.to_string())];
        for url in &report.added {
            lines.push(format!("  {} {}", self.colorize("+", self.color_scheme.success), url));
        }
        for url in &report.duplicates {
            lines.push(self.muted(&format!("  = {} (already listed)", url)));
        }
        lines.join("\n")
    }

    fn format_removed(&self, url: &str, removed: bool) -> String {
        if removed {
            self.format_success(&format!("Removed URL: {}", url))
        } else {
            self.format_warning(&format!("URL not found: {}", url))
        }
    }

    fn format_cleared(&self, count: usize) -> String {
        self.format_success(&format!("Cleared all URLs ({} removed)", count))
    }

    fn format_url_list(&self, list: &CandidateList, active: Option<&str>) -> String {
        if list.is_empty() {
            return [
                self.format_warning("No URLs configured"),
                self.format_hint("Use 'cc url add url1,url2' to add URLs"),
            ]
            .join("\n");
        }

        let mut lines = Vec::with_capacity(list.len());
        for (index, url) in list.iter().enumerate() {
            let entry = format!("  {}. {}", index + 1, url);
            if active == Some(url.as_str()) {
                lines.push(format!(
                    "{} {}",
                    self.colorize(&entry, self.color_scheme.success),
                    self.bold(ACTIVE_MARKER, self.color_scheme.success)
                ));
            } else {
                lines.push(entry);
            }
        }
        lines.join("\n")
    }

    fn format_settings_overview(
        &self,
        settings: &TargetSettings,
        list: &CandidateList,
        settings_path: &Path,
    ) -> String {
        let not_set = self.colorize("not set", self.color_scheme.warning);
        let mut lines = vec![
            self.format_header("Current settings"),
            self.rule(),
            self.muted(&format!("File: {}", settings_path.display())),
        ];

        if settings.has_env() {
            lines.push(self.colorize("Auth token:", self.color_scheme.success));
            lines.push(match settings.auth_token() {
                Some(token) => format!("   {}", mask_token(token)),
                None => format!("   {}", not_set),
            });
            lines.push(self.colorize("Base URL:", self.color_scheme.success));
            lines.push(match settings.base_url() {
                Some(url) => format!("   {}", url),
                None => format!("   {}", not_set),
            });
        } else {
            lines.push(self.format_warning("No settings found"));
        }

        lines.push(String::new());
        lines.push(self.format_header("Candidate URLs"));
        lines.push(self.rule());
        lines.push(self.format_url_list(list, settings.base_url()));
        lines.join("\n")
    }

    fn format_probe_table(&self, report: &ProbeReport) -> String {
        let format = TableFormat::new(
            vec![
                Column::new("#", Alignment::Right),
                Column::new("URL", Alignment::Left),
                Column::new("Latency", Alignment::Right),
                Column::new("Status", Alignment::Left),
            ],
            &self.options,
        );

        let rows: Vec<RowData> = report
            .results()
            .iter()
            .enumerate()
            .map(|(index, result)| {
                vec![
                    (index + 1).to_string(),
                    result.url.clone(),
                    result.latency.to_string(),
                    self.status_label(report, index),
                ]
            })
            .collect();

        let table = format.render(&rows, |row, col, cell| match row {
            None => self.bold(&cell, self.color_scheme.header),
            Some(index) => {
                let result = &report.results()[index];
                let level = PerformanceLevel::from_latency(&result.latency);
                match col {
                    2 => self.colorize(&cell, level.color()),
                    3 if index == 0 && result.is_reachable() => {
                        self.bold(&cell, self.color_scheme.highlight)
                    }
                    3 if !result.is_reachable() => self.colorize(&cell, self.color_scheme.error),
                    _ => cell,
                }
            }
        });

        let summary = self.muted(&format!(
            "{} reachable, {} unreachable, finished in {}ms",
            report.reachable_count(),
            report.unreachable_count(),
            report.elapsed.as_millis()
        ));

        format!("{}\n{}", table, summary)
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ {}", self.colorize(error, self.color_scheme.error))
    }

    fn format_warning(&self, warning: &str) -> String {
        format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning))
    }

    fn format_success(&self, message: &str) -> String {
        format!("✅ {}", self.colorize(message, self.color_scheme.success))
    }

    fn format_info(&self, message: &str) -> String {
        self.colorize(message, self.color_scheme.info)
    }

    fn format_hint(&self, message: &str) -> String {
        self.muted(message)
    }
}
