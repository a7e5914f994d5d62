//! Status command implementation.
//!
//! The `cairn status` command evaluates every probe read-only and reports
//! what is present, missing, or not applicable. It never installs.

use serde::Serialize;

use crate::checks::{catalog, DependencyCheck};
use crate::cli::args::StatusArgs;
use crate::error::Result;
use crate::pins::Pins;
use crate::shell;
use crate::ui::theme::CairnTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand {
    args: StatusArgs,
}

/// Read-only snapshot of one dependency check.
#[derive(Debug, Serialize)]
pub struct CheckState {
    pub name: &'static str,
    pub title: &'static str,
    pub applicable: bool,
    pub present: bool,
    /// `None` when the check has no health probe or is absent.
    pub healthy: Option<bool>,
    /// Installed version, when the tool reports one.
    pub version: Option<String>,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(args: StatusArgs) -> Self {
        Self { args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }
}

/// Evaluate every probe without changing anything.
fn evaluate(checks: &[DependencyCheck]) -> Vec<CheckState> {
    checks
        .iter()
        .map(|check| {
            let applicable = check.gate.is_open();
            let present = applicable && check.probe.is_satisfied();
            let healthy = match (&check.health, present) {
                (Some(health), true) => Some(health.probe.is_satisfied()),
                _ => None,
            };
            let version = if present {
                check.version_probe.and_then(probe_version)
            } else {
                None
            };
            CheckState {
                name: check.name,
                title: check.title,
                applicable,
                present,
                healthy,
                version,
            }
        })
        .collect()
}

/// Run a version command and pull a version number out of its output.
fn probe_version(command: &str) -> Option<String> {
    let result = shell::execute(command).ok()?;
    if !result.success {
        return None;
    }
    extract_version(&result.stdout)
}

/// Extract a version from command output.
fn extract_version(output: &str) -> Option<String> {
    let patterns = [r"(\d+\.\d+\.\d+)", r"version\s+(\d+\.\d+)", r"v(\d+\.\d+)"];

    for pattern in &patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            if let Some(caps) = re.captures(output) {
                if let Some(m) = caps.get(1) {
                    return Some(m.as_str().to_string());
                }
            }
        }
    }

    None
}

/// Exit-0 condition: everything applicable is present and healthy.
fn all_present_and_healthy(states: &[CheckState]) -> bool {
    states
        .iter()
        .all(|s| !s.applicable || (s.present && s.healthy.unwrap_or(true)))
}

fn format_state_line(theme: &CairnTheme, state: &CheckState) -> String {
    let label = format!("{:<12}", state.name);
    let line = if !state.applicable {
        theme.format_skipped(&format!("{} not applicable", label))
    } else if !state.present {
        theme.format_error(&format!("{} missing", label))
    } else if state.healthy == Some(false) {
        theme.format_warning(&format!("{} present, unhealthy", label))
    } else {
        let mut condition = match state.healthy {
            Some(true) => format!("{} present, healthy", label),
            _ => format!("{} present", label),
        };
        if let Some(version) = &state.version {
            condition.push_str(&format!(" ({})", version));
        }
        theme.format_success(&condition)
    };
    format!("  {}", line)
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(pins) = Pins::resolve() else {
            ui.error("Could not determine the home directory");
            return Ok(CommandResult::failure(1));
        };

        let checks = catalog(&pins);
        let states = evaluate(&checks);
        let ok = all_present_and_healthy(&states);

        if self.args.json {
            let doc = serde_json::json!({ "ok": ok, "checks": states });
            // Machine surface: plain stdout, never themed or suppressed.
            println!(
                "{}",
                serde_json::to_string_pretty(&doc).map_err(anyhow::Error::from)?
            );
            return Ok(if ok {
                CommandResult::success()
            } else {
                CommandResult::failure(1)
            });
        }

        let theme = CairnTheme::new();
        ui.show_header("Workstation status");
        for state in &states {
            ui.message(&format_state_line(&theme, state));
        }
        ui.message("");
        if ok {
            ui.success("Everything applicable is present and healthy");
        } else {
            ui.warning("Some dependencies are missing or unhealthy; run `cairn` to fix them");
        }

        Ok(if ok {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}
