//! Run reporting types.

use std::time::Duration;

/// Outcome of a single dependency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Probe succeeded (and the health probe, where present, passed).
    Detected,
    /// Probe failed; the installer ran to completion.
    Installed,
    /// Present but unhealthy; a remedial install brought it back.
    Repaired,
    /// The gate ruled the check out on this machine.
    NotApplicable,
    /// Dry run described the remedy without executing it.
    Described,
}

impl CheckStatus {
    /// Whether this outcome ran an installer.
    pub fn is_install(&self) -> bool {
        matches!(self, Self::Installed | Self::Repaired)
    }
}

/// Per-check record accumulated during a run.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub name: String,
    pub status: CheckStatus,
    pub duration: Duration,
}

/// Everything a completed run knows about itself.
#[derive(Debug, Default)]
pub struct BootstrapReport {
    /// One record per catalog check, in execution order.
    pub checks: Vec<CheckReport>,
    /// Total elapsed time, trailing actions included.
    pub duration: Duration,
}

impl BootstrapReport {
    pub fn record(&mut self, name: &str, status: CheckStatus, duration: Duration) {
        self.checks.push(CheckReport {
            name: name.to_string(),
            status,
            duration,
        });
    }

    /// Number of checks that ran an installer.
    pub fn installs(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_install()).count()
    }

    pub fn status_of(&self, name: &str) -> Option<CheckStatus> {
        self.checks
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.status)
    }
}
