//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use infrapipe::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Staging network");
//! ui.success("Applied");
//!
//! assert!(ui.messages().contains(&"Staging network".to_string()));
//! assert!(ui.successes().contains(&"Applied".to_string()));
//! ```

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    steps: Vec<(String, usize, usize)>,
    details: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all captured step lines as `(name, current, total)`.
    pub fn steps(&self) -> &[(String, usize, usize)] {
        &self.steps
    }

    /// Get all captured detail lines.
    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_step(&mut self, name: &str, current: usize, total: usize) {
        self.steps.push((name.to_string(), current, total));
    }

    fn show_detail(&mut self, msg: &str) {
        self.details.push(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_everything() {
        let mut ui = MockUI::with_mode(OutputMode::Verbose);
        ui.show_header("Applying");
        ui.show_step("network", 1, 2);
        ui.show_detail("staged");
        ui.warning("careful");
        ui.error("boom");

        assert_eq!(ui.output_mode(), OutputMode::Verbose);
        assert_eq!(ui.headers(), &["Applying".to_string()]);
        assert_eq!(ui.steps(), &[("network".to_string(), 1, 2)]);
        assert_eq!(ui.details(), &["staged".to_string()]);
        assert_eq!(ui.warnings(), &["careful".to_string()]);
        assert_eq!(ui.errors(), &["boom".to_string()]);
    }
}
