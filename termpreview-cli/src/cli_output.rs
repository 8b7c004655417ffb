// ABOUTME: Centralized CLI output utilities for consistent user-facing messages
// ABOUTME: Formats warnings, hints and preview failures on stderr so stdout stays image-only

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use termpreview::PreviewError;

/// Centralized CLI output utilities for consistent formatting
pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    /// Create new CLI output utility with TTY detection
    pub fn new() -> Self {
        Self {
            use_color: std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Create CLI output utility with explicit color setting
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Display an error message
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.format_error(message));
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.format_warning(message));
    }

    /// Display an informational message
    pub fn info(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "info:".blue().bold(), message);
        } else {
            eprintln!("info: {}", message);
        }
    }

    /// Report a preview that did not reach the terminal, with a hint when one exists
    pub fn preview_failure(&self, err: &PreviewError) {
        if err.is_expected() {
            self.info(&format!("preview unavailable: {}", err));
        } else {
            self.warning(&format!("preview failed: {}", err));
        }
        if let Some(help) = err.help_text() {
            self.hint(help);
        }
    }

    pub fn hint(&self, message: &str) {
        if self.use_color {
            eprintln!("  {}", message.dimmed());
        } else {
            eprintln!("  {}", message);
        }
    }

    pub fn format_error(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "error:".red().bold(), message)
        } else {
            format!("error: {}", message)
        }
    }

    pub fn format_warning(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "warning:".yellow().bold(), message)
        } else {
            format!("warning: {}", message)
        }
    }
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new()
    }
}
