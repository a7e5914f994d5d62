//! Dependency presence probes.
//!
//! A probe answers one question: is this dependency already satisfied?
//! Probes run through the login shell (see `shell::execute_check`) so
//! that tools installed earlier in the same run are visible without
//! opening a new terminal.

use std::path::PathBuf;

use crate::shell;

/// How to test whether a dependency is present.
#[derive(Debug, Clone)]
pub enum Probe {
    /// Run a command and check exit code 0.
    CommandSucceeds(String),

    /// Check if a file or directory exists.
    PathExists(PathBuf),

    /// Any of the sub-probes passing is sufficient.
    Any(Vec<Probe>),
}

impl Probe {
    /// Probe via a shell command's exit status.
    pub fn command(cmd: impl Into<String>) -> Self {
        Self::CommandSucceeds(cmd.into())
    }

    /// Probe via path existence.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::PathExists(path.into())
    }

    /// Evaluate the probe against the live system.
    pub fn is_satisfied(&self) -> bool {
        match self {
            Self::CommandSucceeds(cmd) => shell::execute_check(cmd),
            Self::PathExists(path) => path.exists(),
            Self::Any(probes) => probes.iter().any(Probe::is_satisfied),
        }
    }

    /// Human-readable description, for status output and dry runs.
    pub fn describe(&self) -> String {
        match self {
            Self::CommandSucceeds(cmd) => format!("`{}`", cmd),
            Self::PathExists(path) => format!("{} exists", path.display()),
            Self::Any(probes) => {
                let parts: Vec<String> = probes.iter().map(Probe::describe).collect();
                parts.join(" or ")
            }
        }
    }
}
