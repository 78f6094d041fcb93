//! Live progress lines while candidates are probed

use crate::probe::{Latency, ProbeObserver};
use colored::*;
use std::io::{self, Write};
use std::sync::Mutex;

/// Prints one line when a probe starts and, in verbose mode, one when it settles
pub struct ProgressObserver<W: Write> {
    out: Mutex<W>,
    enable_color: bool,
    verbose: bool,
}

impl ProgressObserver<io::Stdout> {
    pub fn stdout(enable_color: bool, verbose: bool) -> Self {
        Self::new(io::stdout(), enable_color, verbose)
    }
}

impl<W: Write> ProgressObserver<W> {
    pub fn new(out: W, enable_color: bool, verbose: bool) -> Self {
        Self {
            out: Mutex::new(out),
            enable_color,
            verbose,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_line(&self, line: String) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(out, "{}", line);
    }

    fn muted(&self, text: String) -> String {
        if self.enable_color {
            text.bright_black().to_string()
        } else {
            text
        }
    }
}

impl<W: Write> ProbeObserver for ProgressObserver<W> {
    fn on_probe_start(&self, url: &str) {
        self.write_line(self.muted(format!("  Testing: {}", url)));
    }

    fn on_probe_complete(&self, url: &str, latency: &Latency) {
        if self.verbose {
            self.write_line(self.muted(format!("  Done: {} ({})", url, latency)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_start_lines_always_printed() {
        let observer = ProgressObserver::new(Vec::new(), false, false);
        observer.on_probe_start("a.com");
        observer.on_probe_complete("a.com", &Latency::Unreachable);

        let output = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(output, "  Testing: a.com\n");
    }

    #[test]
    fn test_verbose_prints_completion() {
        let observer = ProgressObserver::new(Vec::new(), false, true);
        observer.on_probe_start("a.com");
        observer.on_probe_complete("a.com", &Latency::Reachable(Duration::from_millis(12)));

        let output = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(output, "  Testing: a.com\n  Done: a.com (12ms)\n");
    }
}
