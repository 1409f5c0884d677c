//! Output formatting.
//!
//! Results go to stdout; notifications and status lines go to stderr.

use calcusolve::core::history::HistoryEntry;
use calcusolve::session::notification::{Notification, Severity};
use console::{style, Term};

/// Writes results and notifications
#[derive(Debug)]
pub struct Reporter {
    out: Term,
    err: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print the display value
    pub fn display(&self, display: &str) {
        let line = if self.use_color {
            style(display).bold().to_string()
        } else {
            display.to_string()
        };
        let _ = self.out.write_line(&line);
    }

    /// Print a history entry
    pub fn entry(&self, entry: &HistoryEntry) {
        let _ = self.out.write_line(&self.format_entry(entry));
    }

    /// Print a notification; successes and info are suppressed in quiet mode
    pub fn notification(&self, notification: &Notification) {
        let severity = notification.severity();
        if self.quiet && severity != Severity::Error {
            return;
        }
        let line = format!("{} {}", self.prefix(severity), notification.message());
        let _ = self.err.write_line(&line);
    }

    /// Print an error line; never suppressed
    pub fn error(&self, message: &str) {
        let line = format!("{} {message}", self.prefix(Severity::Error));
        let _ = self.err.write_line(&line);
    }

    /// Print text to stdout as is
    pub fn raw(&self, text: &str) {
        let _ = self.out.write_line(text);
    }

    /// Print a status line
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let _ = self.err.write_line(message);
    }

    /// Renders `expression = result`, the result highlighted
    #[must_use]
    pub fn format_entry(&self, entry: &HistoryEntry) -> String {
        if self.use_color {
            format!(
                "{} {} {}",
                style(&entry.expression).dim(),
                style("=").dim(),
                style(&entry.result).cyan()
            )
        } else {
            entry.display()
        }
    }

    fn prefix(&self, severity: Severity) -> String {
        match (self.use_color, severity) {
            (true, Severity::Success) => style("✓").green().bold().to_string(),
            (true, Severity::Info) => style("ℹ").cyan().bold().to_string(),
            (true, Severity::Error) => style("✗").red().bold().to_string(),
            (false, Severity::Success) => "OK".to_string(),
            (false, Severity::Info) => "INFO".to_string(),
            (false, Severity::Error) => "ERROR".to_string(),
        }
    }
}
