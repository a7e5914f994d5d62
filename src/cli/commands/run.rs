//! Run command implementation.
//!
//! The `cairn run` command walks the full bootstrap sequence.

use crate::cli::args::RunArgs;
use crate::error::{CairnError, Result};
use crate::pins::Pins;
use crate::runner::{RunOptions, Sequencer};
use crate::shell;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(args: RunArgs) -> Self {
        Self { args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// The installers this command drives only make sense on macOS and
    /// must run as the login user, never root.
    fn guard_host(&self) -> Result<()> {
        if !shell::is_macos() {
            return Err(CairnError::UnsupportedHost {
                message: "cairn bootstraps macOS workstations; this host is not macOS"
                    .to_string(),
            });
        }
        if shell::is_elevated() {
            return Err(CairnError::UnsupportedHost {
                message: "refusing to run as root; invoke cairn as the login user".to_string(),
            });
        }
        Ok(())
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.guard_host()?;

        let Some(pins) = Pins::resolve() else {
            ui.error("Could not determine the home directory");
            return Ok(CommandResult::failure(1));
        };

        let options = RunOptions {
            assume_yes: self.args.yes,
            dry_run: self.args.dry_run,
        };

        let sequencer = Sequencer::new(&pins);
        sequencer.run(ui, &options)?;

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn refuses_non_macos_hosts() {
        let cmd = RunCommand::new(RunArgs::default());
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();

        assert!(matches!(err, CairnError::UnsupportedHost { .. }));
    }

    #[test]
    fn carries_flags_into_options() {
        let cmd = RunCommand::new(RunArgs {
            yes: true,
            dry_run: true,
            non_interactive: false,
        });
        assert!(cmd.args().yes);
        assert!(cmd.args().dry_run);
    }
}
