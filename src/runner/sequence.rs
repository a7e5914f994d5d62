//! Bootstrap sequence orchestration.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::checks::{catalog, DependencyCheck, Installer, Probe};
use crate::error::{CairnError, Result};
use crate::install::PayloadFetcher;
use crate::pins::Pins;
use crate::shell::{self, CommandResult, OutputLine};
use crate::ui::spinner::live_output_callback;
use crate::ui::theme::CairnTheme;
use crate::ui::{format_duration, Confirm, OutputMode, UserInterface};

use super::report::{BootstrapReport, CheckStatus};

/// Launches 1Password without bringing a window to the foreground; the
/// agent comes up with the app.
const AGENT_LAUNCH_COMMAND: &str = "open -ga 1Password";

/// Options for a bootstrap run.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    /// Answer every consent prompt affirmatively without asking.
    pub assume_yes: bool,
    /// Probe and describe, never execute.
    pub dry_run: bool,
}

/// Walks the check catalog in order, remedying whatever is missing.
///
/// Strictly sequential and fail-fast: the first declined prompt, failed
/// installer, or unhealthy dependency aborts the run. The only recovery
/// path is re-invocation after manual remediation.
pub struct Sequencer<'a> {
    pins: &'a Pins,
    fetcher: PayloadFetcher,
}

impl<'a> Sequencer<'a> {
    pub fn new(pins: &'a Pins) -> Self {
        Self {
            fetcher: PayloadFetcher::new(pins.http_timeout),
            pins,
        }
    }

    /// Use a custom fetcher (tests point it at a scratch sandbox).
    pub fn with_fetcher(pins: &'a Pins, fetcher: PayloadFetcher) -> Self {
        Self { pins, fetcher }
    }

    /// Run the full sequence: every catalog check in order, then the two
    /// trailing actions.
    pub fn run(
        &self,
        ui: &mut dyn UserInterface,
        options: &RunOptions,
    ) -> Result<BootstrapReport> {
        let start = Instant::now();
        ui.show_header(concat!("cairn v", env!("CARGO_PKG_VERSION")));

        let checks = catalog(self.pins);
        let mut report = self.run_checks(&checks, ui, options)?;

        self.apply_dotfiles(ui, options)?;
        self.ensure_agent(ui, options)?;

        report.duration = start.elapsed();
        self.show_summary(ui, options, &report);
        Ok(report)
    }

    /// Process checks in order, accumulating a report.
    pub fn run_checks(
        &self,
        checks: &[DependencyCheck],
        ui: &mut dyn UserInterface,
        options: &RunOptions,
    ) -> Result<BootstrapReport> {
        let start = Instant::now();
        let theme = CairnTheme::new();
        let total = checks.len();
        let mut report = BootstrapReport::default();

        for (index, check) in checks.iter().enumerate() {
            // Blank line between checks
            if index > 0 {
                ui.message("");
            }
            ui.message(&check_heading(&theme, index, total, check));

            let check_start = Instant::now();
            let status = if !check.gate.is_open() {
                ui.message(&format!(
                    "    {}",
                    theme.format_skipped(&format!(
                        "Not applicable ({})",
                        check.gate.describe()
                    ))
                ));
                CheckStatus::NotApplicable
            } else if options.dry_run {
                self.describe_check(check, ui, &theme)
            } else {
                self.run_check(check, ui, options, &theme)?
            };

            report.record(check.name, status, check_start.elapsed());
        }

        report.duration = start.elapsed();
        Ok(report)
    }

    /// Probe, confirm, install, finalize. Carries the deep-health flow
    /// for checks with a `health` probe: one remedial attempt, then the
    /// guidance message and a fatal error.
    fn run_check(
        &self,
        check: &DependencyCheck,
        ui: &mut dyn UserInterface,
        options: &RunOptions,
        theme: &CairnTheme,
    ) -> Result<CheckStatus> {
        if check.probe.is_satisfied() {
            let Some(health) = &check.health else {
                ui.message(&format!(
                    "    {}",
                    theme.format_success("Detected, skipping")
                ));
                return Ok(CheckStatus::Detected);
            };

            if health.probe.is_satisfied() {
                ui.message(&format!(
                    "    {}",
                    theme.format_success("Detected and healthy, skipping")
                ));
                return Ok(CheckStatus::Detected);
            }

            // Present but failing its deep-health probe: one remedial
            // install, then one more health evaluation.
            ui.message(&format!(
                "    {}",
                theme.format_warning(&format!("{} is installed but unhealthy", check.title))
            ));
            self.request_consent(
                check,
                format!("Would you like to reinstall {}?", check.title),
                ui,
                options,
            )?;
            self.install(check, ui)?;
            self.apply_finalize(check, ui, theme)?;

            if health.probe.is_satisfied() {
                ui.message(&format!(
                    "    {}",
                    theme.format_success("Healthy after reinstall")
                ));
                return Ok(CheckStatus::Repaired);
            }
            ui.message(&format!("    {}", theme.hint.apply_to(health.guidance)));
            return Err(CairnError::Unhealthy {
                name: check.name.to_string(),
                guidance: health.guidance.to_string(),
            });
        }

        self.request_consent(
            check,
            format!("{} is missing. Would you like to install it?", check.title),
            ui,
            options,
        )?;
        self.install(check, ui)?;
        self.apply_finalize(check, ui, theme)?;

        if let Some(health) = &check.health {
            if !health.probe.is_satisfied() {
                ui.message(&format!("    {}", theme.hint.apply_to(health.guidance)));
                return Err(CairnError::Unhealthy {
                    name: check.name.to_string(),
                    guidance: health.guidance.to_string(),
                });
            }
        }
        Ok(CheckStatus::Installed)
    }

    /// Dry run: probes still execute, remedies are only described.
    fn describe_check(
        &self,
        check: &DependencyCheck,
        ui: &mut dyn UserInterface,
        theme: &CairnTheme,
    ) -> CheckStatus {
        if check.probe.is_satisfied() {
            if let Some(health) = &check.health {
                if !health.probe.is_satisfied() {
                    ui.message(&format!(
                        "    {}",
                        theme.format_warning(&format!(
                            "{} is installed but unhealthy",
                            check.title
                        ))
                    ));
                    ui.message(&would(theme, &check.installer.describe()));
                    return CheckStatus::Described;
                }
            }
            ui.message(&format!(
                "    {}",
                theme.format_success("Detected, skipping")
            ));
            return CheckStatus::Detected;
        }

        ui.message(&would(theme, &check.installer.describe()));
        if let Some(finalize) = &check.finalize {
            ui.message(&would(theme, &finalize.describe()));
        }
        CheckStatus::Described
    }

    fn request_consent(
        &self,
        check: &DependencyCheck,
        question: String,
        ui: &mut dyn UserInterface,
        options: &RunOptions,
    ) -> Result<()> {
        if options.assume_yes {
            debug!("Consent for '{}' assumed via --yes", check.name);
            return Ok(());
        }
        let key = format!("install_{}", check.name.replace('-', "_"));
        if ui.confirm(&Confirm::new(key, question))? {
            Ok(())
        } else {
            Err(CairnError::Declined {
                name: check.name.to_string(),
            })
        }
    }

    fn install(&self, check: &DependencyCheck, ui: &mut dyn UserInterface) -> Result<()> {
        match &check.installer {
            Installer::Command(command) => {
                run_streamed(check.name, command, ui)?;
                Ok(())
            }
            Installer::RemoteScript(script) => {
                let mut spinner = ui.start_spinner_indented(
                    &format!("Downloading {}...", script.payload.file_name),
                    4,
                );
                let path = match self.fetcher.fetch_verified(&script.payload) {
                    Ok(path) => {
                        spinner
                            .finish_success(&format!("Verified {}", script.payload.file_name));
                        path
                    }
                    Err(e) => {
                        spinner.finish_error(&format!(
                            "Could not fetch {}",
                            script.payload.file_name
                        ));
                        return Err(e);
                    }
                };
                run_streamed(check.name, &script.command_for(&path), ui)?;
                Ok(())
            }
            Installer::CommandThenWait {
                command,
                wait,
                poll_interval,
            } => {
                run_streamed(check.name, command, ui)?;
                wait_until_satisfied(check, wait, *poll_interval, ui);
                Ok(())
            }
        }
    }

    fn apply_finalize(
        &self,
        check: &DependencyCheck,
        ui: &mut dyn UserInterface,
        theme: &CairnTheme,
    ) -> Result<()> {
        let Some(finalize) = &check.finalize else {
            return Ok(());
        };
        let changed = finalize.apply()?;
        if changed {
            ui.message(&format!(
                "    {}",
                theme.format_success(&capitalize(&finalize.describe()))
            ));
        } else {
            ui.message(&format!(
                "    {}",
                theme.dim.apply_to("Configuration already in place")
            ));
        }
        Ok(())
    }

    /// Trailing action: hand the pinned dotfiles repository to chezmoi.
    fn apply_dotfiles(&self, ui: &mut dyn UserInterface, options: &RunOptions) -> Result<()> {
        let theme = CairnTheme::new();
        ui.message("");
        ui.message(&action_heading(&theme, "dotfiles", "apply the pinned repository"));

        let command = format!("chezmoi init --apply {}", self.pins.dotfiles_repo);
        if options.dry_run {
            ui.message(&would(&theme, &format!("run `{}`", command)));
            return Ok(());
        }
        run_streamed("dotfiles", &command, ui)?;
        Ok(())
    }

    /// Trailing action: make sure the 1Password agent is up. Launches the
    /// app when the socket is absent; does not wait for it to appear.
    fn ensure_agent(&self, ui: &mut dyn UserInterface, options: &RunOptions) -> Result<()> {
        let theme = CairnTheme::new();
        ui.message("");
        ui.message(&action_heading(
            &theme,
            "1password-agent",
            "ensure the secret agent is running",
        ));

        if options.dry_run {
            ui.message(&would(
                &theme,
                "launch 1Password when the agent socket is absent",
            ));
            return Ok(());
        }

        if self.pins.agent_socket.exists() {
            ui.message(&format!(
                "    {}",
                theme.format_success("Agent already running")
            ));
            return Ok(());
        }

        let result = shell::execute(AGENT_LAUNCH_COMMAND)?;
        if result.success {
            ui.message(&format!(
                "    {}",
                theme.format_success("Launched 1Password; the agent starts with the app")
            ));
        } else {
            // Not fatal: the app may simply not be installed yet.
            warn!("Could not launch 1Password: {:?}", result.exit_code);
            ui.warning("Could not launch 1Password; start it manually to enable the SSH agent");
        }
        Ok(())
    }

    fn show_summary(
        &self,
        ui: &mut dyn UserInterface,
        options: &RunOptions,
        report: &BootstrapReport,
    ) {
        let theme = CairnTheme::new();
        ui.message("");
        if options.dry_run {
            ui.message(&theme.format_skipped(&format!(
                "Dry run complete; nothing was executed ({})",
                format_duration(report.duration)
            )));
            return;
        }
        let summary = match report.installs() {
            0 => format!(
                "Everything already in place ({})",
                format_duration(report.duration)
            ),
            1 => format!(
                "Bootstrap complete; 1 check installed ({})",
                format_duration(report.duration)
            ),
            n => format!(
                "Bootstrap complete; {} checks installed ({})",
                n,
                format_duration(report.duration)
            ),
        };
        ui.success(&summary);
    }
}

/// Numbered check heading; short form when name and title match.
fn check_heading(
    theme: &CairnTheme,
    index: usize,
    total: usize,
    check: &DependencyCheck,
) -> String {
    let number = format!("[{}/{}]", index + 1, total);
    if check.name == check.title {
        format!(
            "{} {}",
            theme.check_number.apply_to(&number),
            theme.check_title.apply_to(check.name)
        )
    } else {
        format!(
            "{} {} {} {}",
            theme.check_number.apply_to(&number),
            theme.check_title.apply_to(check.name),
            theme.dim.apply_to("—"),
            theme.dim.apply_to(check.title)
        )
    }
}

fn action_heading(theme: &CairnTheme, name: &str, title: &str) -> String {
    format!(
        "{} {} {}",
        theme.check_title.apply_to(name),
        theme.dim.apply_to("—"),
        theme.dim.apply_to(title)
    )
}

fn would(theme: &CairnTheme, action: &str) -> String {
    format!(
        "    {} {}",
        theme.dim.apply_to("Would"),
        theme.command.apply_to(action)
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Poll the wait probe until it reports satisfied. Unbounded: the Xcode
/// CLT GUI flow finishes whenever the operator lets it.
fn wait_until_satisfied(
    check: &DependencyCheck,
    wait: &Probe,
    poll_interval: Duration,
    ui: &mut dyn UserInterface,
) {
    let mut spinner = ui.start_spinner_indented(
        &format!("Waiting for {} to finish installing...", check.title),
        4,
    );
    let start = Instant::now();
    loop {
        if wait.is_satisfied() {
            spinner.finish_success(&format!(
                "{} ready ({})",
                check.title,
                format_duration(start.elapsed())
            ));
            return;
        }
        std::thread::sleep(poll_interval);
    }
}

/// Run an installer command with a spinner and a live output tail.
fn run_streamed(name: &str, command: &str, ui: &mut dyn UserInterface) -> Result<CommandResult> {
    debug!("Running installer for '{}': {}", name, command);
    let label = format!("Running `{}`...", command);
    let mut spinner = ui.start_spinner_indented(&label, 4);

    // Live output: spinner ring buffer when interactive, direct stdout
    // in non-interactive verbose sessions, silence otherwise.
    let output_mode = ui.output_mode();
    let output_callback = spinner
        .progress_bar()
        .and_then(|bar| {
            let max_lines = match output_mode {
                OutputMode::Verbose => 3,
                OutputMode::Normal => 2,
                _ => return None,
            };
            Some(live_output_callback(bar, label.clone(), 6, max_lines))
        })
        .or_else(|| {
            if output_mode == OutputMode::Verbose {
                let cb: crate::shell::OutputCallback = Box::new(|line: OutputLine| {
                    let text = match &line {
                        OutputLine::Stdout(s) => s.trim_end(),
                        OutputLine::Stderr(s) => s.trim_end(),
                    };
                    if !text.is_empty() {
                        println!("      {text}");
                    }
                });
                Some(cb)
            } else {
                None
            }
        });

    let result = match output_callback {
        Some(callback) => shell::execute_streaming(command, callback)?,
        None => shell::execute(command)?,
    };

    let duration_str = format_duration(result.duration);
    if result.success {
        spinner.finish_success(&format!("Installed {} ({})", name, duration_str));
        Ok(result)
    } else {
        spinner.finish_error(&format!("Failed ({})", duration_str));
        warn!("Installer for '{}' failed: {:?}", name, result.exit_code);
        Err(CairnError::InstallFailed {
            name: name.to_string(),
            message: failure_message(command, &result),
        })
    }
}

fn failure_message(command: &str, result: &CommandResult) -> String {
    let mut message = match result.exit_code {
        Some(code) => format!("`{}` exited with status {}", command, code),
        None => format!("`{}` was terminated by a signal", command),
    };
    if let Some(line) = result.stderr.lines().rev().find(|l| !l.trim().is_empty()) {
        message.push_str(&format!(" ({})", line.trim()));
    }
    message
}
