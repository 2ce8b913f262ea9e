//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::pipeline::PipelineState;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message, starting one if none is running
    pub fn update_spinner(&mut self, message: &str) {
        match self.spinner {
            Some(ref spinner) => spinner.set_message(message.to_string()),
            None => self.start_spinner(message),
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spinner.is_some()
    }

    /// Reflect a pipeline transition in the spinner
    pub fn pipeline_state(&mut self, state: &PipelineState) {
        match state {
            PipelineState::Idle => {}
            PipelineState::Preprocessing => self.start_spinner("Preparing image..."),
            PipelineState::Requesting(_) => self.update_spinner("Describing..."),
            PipelineState::Done(_) => self.spinner_success("Description ready"),
            PipelineState::Failed(_) => self.spinner_fail("Description failed"),
            PipelineState::Cancelled => self.stop_spinner(),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (the description a screen reader speaks)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::HandleId;

    #[test]
    fn spinner_follows_cycle() {
        let mut presenter = Presenter::new();
        assert!(!presenter.is_spinning());

        presenter.pipeline_state(&PipelineState::Preprocessing);
        assert!(presenter.is_spinning());

        presenter.pipeline_state(&PipelineState::Requesting(HandleId(1)));
        assert!(presenter.is_spinning());

        presenter.pipeline_state(&PipelineState::Cancelled);
        assert!(!presenter.is_spinning());
    }

    #[test]
    fn update_without_spinner_starts_one() {
        let mut presenter = Presenter::new();
        presenter.update_spinner("Describing...");
        assert!(presenter.is_spinning());
        presenter.stop_spinner();
        assert!(!presenter.is_spinning());
    }
}
