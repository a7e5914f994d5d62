//! Host platform detection.

use std::path::PathBuf;

/// Check whether the process is running on macOS.
///
/// Runtime check (not `cfg!`) so the guard stays testable on other
/// platforms; the binary itself builds everywhere.
pub fn is_macos() -> bool {
    std::env::consts::OS == "macos"
}

/// Check whether the host is an Apple-silicon Mac.
///
/// Rosetta 2 only exists (and only matters) on these machines.
pub fn is_apple_silicon() -> bool {
    is_macos() && std::env::consts::ARCH == "aarch64"
}

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()` and to suppress noisy
/// progress spinners in [`NonInteractiveUI`](crate::ui::NonInteractiveUI).
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root/admin.
///
/// The installers this tool drives (Xcode CLT, Nix, Homebrew) refuse to
/// run under sudo or misbehave when they do; the run is rejected up
/// front instead.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// The current user's home directory, from `$HOME`.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_ci_detects_environment() {
        // Just ensure function doesn't panic
        let _ = is_ci();
    }

    #[test]
    fn apple_silicon_implies_macos() {
        assert!(!is_apple_silicon() || is_macos());
    }

    #[cfg(unix)]
    #[test]
    fn home_dir_reads_home() {
        if std::env::var_os("HOME").is_some() {
            assert!(home_dir().is_some());
        }
    }
}
