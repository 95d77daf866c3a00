//! Terminal output utilities for styled CLI output.
//!
//! Results go to stdout; errors and warnings go to stderr so piped output
//! stays clean.

use console::{Term, style};
use std::fmt::Display;

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
    err_term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.err_term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    /// Print a warning message with a yellow warning sign.
    pub fn warning(&self, message: impl Display) {
        drop(
            self.err_term
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    /// Print an info message with a blue info icon.
    pub fn info(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("ℹ").blue().bold(), message)),
        );
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    /// Print an empty line.
    pub fn newline(&self) {
        drop(self.term.write_line(""));
    }

    /// Print a header with emphasis.
    pub fn header(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&style(message).bold().cyan().to_string()),
        );
    }

    /// Print a subheader.
    pub fn subheader(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).bold().to_string()));
    }

    /// Print a divider line.
    pub fn divider(&self, width: usize) {
        drop(
            self.term
                .write_line(&style("─".repeat(width)).dim().to_string()),
        );
    }

    /// Print a labeled value with indentation.
    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        drop(
            self.term
                .write_line(&format!("{spaces}{}: {}", style(label).dim(), value)),
        );
    }

    /// Print a dim/muted message.
    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print a section title for schema/help output.
    pub fn section(&self, title: impl Display) {
        drop(
            self.term
                .write_line(&format!("  {}", style(title).yellow().bold())),
        );
    }

    /// Print section content with indentation.
    pub fn section_content(&self, content: impl Display) {
        drop(self.term.write_line(&format!("    {content}")));
    }

    /// Print a count summary.
    pub fn count(&self, label: impl Display, count: usize) {
        drop(self.term.write_line(&format!(
            "{}: {} item(s)",
            style(label).dim(),
            style(count).cyan().bold()
        )));
    }

    /// Print a total summary line, e.g. `Total: 3 organization(s)`.
    pub fn total(&self, label: impl Display, count: usize, noun: impl Display) {
        drop(self.term.write_line(&format!(
            "\n{}: {}",
            style(label).bold(),
            style(format!("{count} {noun}(s)")).cyan()
        )));
    }

    /// Print a numbered list of values.
    pub fn numbered(&self, values: impl IntoIterator<Item = impl Display>) {
        for (index, value) in values.into_iter().enumerate() {
            drop(
                self.term
                    .write_line(&format!("  {} {value}", style(format!("{index:>3}.")).dim())),
            );
        }
    }
}
