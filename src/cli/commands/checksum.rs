//! Checksum command implementation.
//!
//! The `cairn checksum` command writes or verifies a companion
//! `<file>.sha256` so a script's integrity can be checked before it is
//! executed. The companion uses the `shasum -a 256` line format:
//! `<hex digest>  <file name>`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::ChecksumArgs;
use crate::error::{CairnError, Result};
use crate::install::sha256_hex;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The checksum command implementation.
pub struct ChecksumCommand {
    args: ChecksumArgs,
}

impl ChecksumCommand {
    /// Create a new checksum command.
    pub fn new(args: ChecksumArgs) -> Self {
        Self { args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ChecksumArgs {
        &self.args
    }
}

/// `install.sh` gets `install.sh.sha256` next to it.
fn companion_path(file: &Path) -> PathBuf {
    let mut path = file.as_os_str().to_os_string();
    path.push(".sha256");
    PathBuf::from(path)
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

fn write_companion(file: &Path, ui: &mut dyn UserInterface) -> Result<CommandResult> {
    let bytes = fs::read(file)?;
    let digest = sha256_hex(&bytes);
    let companion = companion_path(file);
    fs::write(&companion, format!("{}  {}\n", digest, display_name(file)))?;
    ui.success(&format!("Wrote {}", companion.display()));
    Ok(CommandResult::success())
}

fn verify_companion(file: &Path, ui: &mut dyn UserInterface) -> Result<CommandResult> {
    let companion = companion_path(file);
    if !companion.exists() {
        ui.error(&format!(
            "No companion checksum file at {}",
            companion.display()
        ));
        return Ok(CommandResult::failure(1));
    }

    let recorded = fs::read_to_string(&companion)?;
    let expected = recorded.split_whitespace().next().unwrap_or("");

    let bytes = fs::read(file)?;
    let actual = sha256_hex(&bytes);

    if expected.eq_ignore_ascii_case(&actual) {
        ui.success(&format!("{}: OK", file.display()));
        Ok(CommandResult::success())
    } else {
        Err(CairnError::ChecksumMismatch {
            name: display_name(file),
            expected: expected.to_string(),
            actual,
        })
    }
}

impl Command for ChecksumCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.check {
            verify_companion(&self.args.file, ui)
        } else {
            write_companion(&self.args.file, ui)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn command(file: &Path, check: bool) -> ChecksumCommand {
        ChecksumCommand::new(ChecksumArgs {
            check,
            file: file.to_path_buf(),
        })
    }

    #[test]
    fn writes_shasum_format_companion() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("install.sh");
        fs::write(&script, "#!/bin/sh\necho ok\n").unwrap();

        let mut ui = MockUI::new();
        let result = command(&script, false).execute(&mut ui).unwrap();
        assert!(result.success);

        let companion = fs::read_to_string(temp.path().join("install.sh.sha256")).unwrap();
        let digest = sha256_hex(b"#!/bin/sh\necho ok\n");
        assert_eq!(companion, format!("{}  install.sh\n", digest));
    }

    #[test]
    fn write_then_check_round_trips() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("install.sh");
        fs::write(&script, "echo hello").unwrap();

        let mut ui = MockUI::new();
        command(&script, false).execute(&mut ui).unwrap();
        let result = command(&script, true).execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_success("OK"));
    }

    #[test]
    fn tampered_file_fails_verification() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("install.sh");
        fs::write(&script, "echo hello").unwrap();

        let mut ui = MockUI::new();
        command(&script, false).execute(&mut ui).unwrap();
        fs::write(&script, "echo tampered").unwrap();

        let err = command(&script, true).execute(&mut ui).unwrap_err();
        match err {
            CairnError::ChecksumMismatch { name, .. } => assert_eq!(name, "install.sh"),
            other => panic!("expected ChecksumMismatch, got {:?}", other),
        }
    }

    #[test]
    fn missing_companion_is_an_integrity_failure() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("install.sh");
        fs::write(&script, "echo hello").unwrap();

        let mut ui = MockUI::new();
        let result = command(&script, true).execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("No companion checksum file"));
    }

    #[test]
    fn verification_accepts_uppercase_digests() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("install.sh");
        fs::write(&script, "echo hello").unwrap();
        let digest = sha256_hex(b"echo hello").to_uppercase();
        fs::write(
            temp.path().join("install.sh.sha256"),
            format!("{}  install.sh\n", digest),
        )
        .unwrap();

        let mut ui = MockUI::new();
        let result = command(&script, true).execute(&mut ui).unwrap();

        assert!(result.success);
    }

    #[test]
    fn companion_path_appends_extension() {
        assert_eq!(
            companion_path(Path::new("/tmp/install.sh")),
            PathBuf::from("/tmp/install.sh.sha256")
        );
    }
}
