//! Output formatting for the CLI.

use colored::*;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a banner line.
    pub fn title(&self, title: &str) -> String {
        if self.color_enabled {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Notice for a document that produced a result.
    pub fn document_succeeded(&self, filename: &str) -> String {
        format!("{}: {}", filename, self.colorize("✔ Success", "green"))
    }

    /// Notice for a skipped document.
    pub fn document_failed(&self, filename: &str, reason: &str) -> String {
        format!(
            "{}: {}",
            filename,
            self.colorize(&format!("✖ Failed: {}", reason), "red")
        )
    }

    /// Final tally after a batch.
    pub fn summary(&self, succeeded: usize, total: usize, output: &str) -> String {
        self.success(&format!(
            "Extracted {} of {} document(s), saved to {}",
            succeeded, total, output
        ))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
