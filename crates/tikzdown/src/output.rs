//! Colored terminal output utilities.

use std::path::Path;

use console::{Style, Term};

/// Terminal output formatter writing to stderr.
///
/// Stdout is kept free for converted HTML.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    fn line(&self, msg: &str, style: Option<&Style>) {
        let _ = match style {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg, None);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        self.line(msg, Some(&self.green));
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(msg, Some(&self.red));
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        self.line(msg, Some(&self.cyan_bold));
    }

    /// Print diagram warnings (yellow), one per line.
    pub(crate) fn warnings(&self, warnings: &[String]) {
        for warning in warnings {
            self.line(&format!("Warning: {warning}"), Some(&self.yellow));
        }
    }

    /// Print a finished conversion as `input` followed by `  => output`.
    pub(crate) fn converted(&self, input: &Path, output: &Path) {
        self.info(&input.display().to_string());
        self.success(&format!("  => {}", output.display()));
    }
}
