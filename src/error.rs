//! Error types for cairn operations.
//!
//! This module defines [`CairnError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `CairnError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `CairnError::Other`) for unexpected errors
//! - Every error is fatal for the run; recovery is operator re-invocation

use thiserror::Error;

/// Core error type for cairn operations.
#[derive(Debug, Error)]
pub enum CairnError {
    /// Operator answered a consent prompt negatively (or the run was
    /// non-interactive without --yes).
    #[error("'{name}' is required; stopping at your request")]
    Declined { name: String },

    /// A downloaded payload or checked file failed SHA-256 verification.
    #[error("Checksum mismatch for {name}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// A dependency is installed but its deep-health probe still fails
    /// after the one permitted remedial attempt.
    #[error("'{name}' is installed but unhealthy: {guidance}")]
    Unhealthy { name: String, guidance: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Installer for a dependency exited non-zero.
    #[error("Installer for '{name}' failed: {message}")]
    InstallFailed { name: String, message: String },

    /// Fetching a remote installer payload failed before verification.
    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    /// The host cannot run the bootstrap (wrong OS, or running as root).
    #[error("Unsupported host: {message}")]
    UnsupportedHost { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for cairn operations.
pub type Result<T> = std::result::Result<T, CairnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declined_displays_name() {
        let err = CairnError::Declined { name: "nix".into() };
        assert!(err.to_string().contains("nix"));
    }

    #[test]
    fn checksum_mismatch_displays_both_digests() {
        let err = CairnError::ChecksumMismatch {
            name: "homebrew installer".into(),
            expected: "aaaa".into(),
            actual: "bbbb".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("homebrew installer"));
        assert!(msg.contains("aaaa"));
        assert!(msg.contains("bbbb"));
    }

    #[test]
    fn unhealthy_displays_name_and_guidance() {
        let err = CairnError::Unhealthy {
            name: "nix".into(),
            guidance: "re-run cairn".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("nix"));
        assert!(msg.contains("re-run cairn"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = CairnError::CommandFailed {
            command: "xcode-select --install".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("xcode-select --install"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn install_failed_displays_name_and_message() {
        let err = CairnError::InstallFailed {
            name: "rosetta".into(),
            message: "softwareupdate exited with code 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("rosetta"));
        assert!(msg.contains("softwareupdate exited with code 1"));
    }

    #[test]
    fn download_failed_displays_url_and_message() {
        let err = CairnError::DownloadFailed {
            url: "https://example.com/install.sh".into(),
            message: "connection refused".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/install.sh"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn unsupported_host_displays_message() {
        let err = CairnError::UnsupportedHost {
            message: "this tool targets macOS".into(),
        };
        assert!(err.to_string().contains("this tool targets macOS"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CairnError = io_err.into();
        assert!(matches!(err, CairnError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(CairnError::Declined { name: "test".into() })
        }
        assert!(returns_error().is_err());
    }
}
