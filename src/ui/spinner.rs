//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::shell::OutputLine;

use super::theme::CairnTheme;
use super::SpinnerHandle;

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
    indent: usize,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        Self::with_indent(message, 0)
    }

    /// Create a new spinner with indentation.
    pub fn with_indent(message: &str, indent: usize) -> Self {
        let bar = ProgressBar::new_spinner();
        let prefix = " ".repeat(indent);
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template(&format!("{}{{spinner:.magenta}} {{msg}}", prefix))
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar, indent }
    }

    /// Create a spinner that doesn't show (for silent mode).
    pub fn hidden() -> Self {
        let bar = ProgressBar::hidden();
        Self { bar, indent: 0 }
    }

    /// Replace the spinner with a final styled line.
    fn finish_styled(&mut self, line: &str) {
        let prefix = " ".repeat(self.indent);
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar.finish_with_message(format!("{}{}", prefix, line));
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish_styled(&CairnTheme::new().format_success(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish_styled(&CairnTheme::new().format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish_styled(&CairnTheme::new().format_skipped(msg));
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        Some(self.bar.clone())
    }
}

/// Create an output callback that updates a spinner with live output lines.
///
/// The callback maintains a ring buffer of the last `max_lines` output lines
/// and updates the spinner message to show the base message plus those lines.
/// Installers can run for minutes; this gives users feedback that a command
/// is actually making progress.
///
/// # Arguments
/// * `bar` - A cloned `ProgressBar` from the spinner
/// * `base_message` - The primary spinner message (e.g., "Running `xcode-select --install`...")
/// * `indent` - Number of spaces to indent live output lines
/// * `max_lines` - Maximum number of live output lines to show (2-3 typical)
pub fn live_output_callback(
    bar: ProgressBar,
    base_message: String,
    indent: usize,
    max_lines: usize,
) -> crate::shell::OutputCallback {
    let buffer: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
    let theme = CairnTheme::new();

    Box::new(move |line: OutputLine| {
        let text = match &line {
            OutputLine::Stdout(s) => s.trim_end().to_string(),
            OutputLine::Stderr(s) => s.trim_end().to_string(),
        };

        if text.is_empty() {
            return;
        }

        // Truncate long lines for display (char-wise; installer output is UTF-8)
        let display_text = if text.chars().count() > 72 {
            let head: String = text.chars().take(69).collect();
            format!("{}...", head)
        } else {
            text
        };

        let mut buf = buffer.lock().unwrap();
        buf.push_back(display_text);
        if buf.len() > max_lines {
            buf.pop_front();
        }

        // Base message on top, the newest lines dimmed underneath.
        let prefix = " ".repeat(indent);
        let tail: String = buf
            .iter()
            .map(|line| format!("\n{}{}", prefix, theme.dim.apply_to(format!("» {}", line))))
            .collect();

        bar.set_message(format!("{}{}", base_message, tail));
    })
}
