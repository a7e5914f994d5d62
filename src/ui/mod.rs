//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - Confirmation prompts and spinners
//!
//! # Example
//!
//! ```
//! use cairn::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("cairn");
//! ui.success("Bootstrap complete!");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use spinner::{live_output_callback, ProgressSpinner};
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, CairnTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question and return the answer.
    fn confirm(&mut self, confirm: &Confirm) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Start an indented spinner (for nested operations).
    fn start_spinner_indented(&mut self, message: &str, _indent: usize) -> Box<dyn SpinnerHandle> {
        self.start_spinner(message)
    }

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);

    /// Get the underlying progress bar for live-output callbacks, if any.
    fn progress_bar(&self) -> Option<indicatif::ProgressBar> {
        None
    }
}

/// A yes/no question posed to the operator.
///
/// Every prompt in the flow is a consent question, and every consent
/// question defaults to "no": a bare Enter never installs anything.
#[derive(Debug, Clone)]
pub struct Confirm {
    /// Unique key for the question (used by the mock UI and env overrides).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer assumed when the operator just presses Enter.
    pub default: bool,
}

impl Confirm {
    /// Create a confirmation that defaults to "no".
    pub fn new(key: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            default: false,
        }
    }
}

/// Format a duration for humans: `850ms`, `3.4s`, `2m 05s`.
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_ms = duration.as_millis();
    if total_ms < 1000 {
        return format!("{}ms", total_ms);
    }
    let total_secs = duration.as_secs_f64();
    if total_secs < 60.0 {
        return format!("{:.1}s", total_secs);
    }
    let mins = (total_secs / 60.0).floor() as u64;
    let secs = (total_secs % 60.0).round() as u64;
    format!("{}m {:02}s", mins, secs)
}
