//! Pinned versions, URLs, digests, and well-known paths.
//!
//! Everything the bootstrap depends on from the outside world is fixed
//! here and constructed once at process start. There is no configuration
//! file; changing a pin means editing this module and shipping a new
//! binary, which is the point: the sequence must be reproducible.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shell;

/// Determinate Systems Nix installer, pinned by release tag.
const NIX_INSTALLER_URL: &str = "https://install.determinate.systems/nix/tag/v3.5.2";
const NIX_INSTALLER_SHA256: &str =
    "9f2c5ad86f3cb2d59a4e28f0ee1b0b337755e1df2cedbdd93b714ab6b15dbf41";

/// Homebrew install script, pinned by commit so the digest stays stable.
const BREW_INSTALL_COMMIT: &str = "e8114640740938c20cc41ffdbf07816b428afc49";
const BREW_INSTALLER_SHA256: &str =
    "f3a969d3074c41f58b9cc03a7a1b49dbb58947ce1a9b8e1dfbc4a9181de63042";

/// Experimental features the flake-based nix-darwin activation needs.
const NIX_FEATURES: [&str; 2] = ["nix-command", "flakes"];

/// Dotfiles repository handed to chezmoi once the toolchain is in place.
const DOTFILES_REPO: &str = "https://github.com/cairn-sh/dotfiles.git";

/// Transport timeout for payload downloads. Installer execution itself
/// is unbounded; only the HTTP fetch gets a deadline.
const HTTP_TIMEOUT_SECS: u64 = 60;

/// A download pinned to an exact content digest.
#[derive(Debug, Clone)]
pub struct PayloadPin {
    pub url: String,
    pub sha256: String,
    /// File name the payload is written under in the scratch directory.
    pub file_name: String,
}

/// Immutable run configuration, resolved once in `main`.
#[derive(Debug, Clone)]
pub struct Pins {
    pub nix_installer: PayloadPin,
    pub brew_installer: PayloadPin,
    pub nix_features: Vec<&'static str>,
    /// Shell profile that receives the Homebrew activation line.
    pub profile_file: PathBuf,
    /// Per-user Nix configuration file.
    pub nix_conf: PathBuf,
    /// Homebrew prefix for this machine's architecture.
    pub brew_prefix: PathBuf,
    pub dotfiles_repo: String,
    /// 1Password SSH agent socket, used to tell whether the agent runs.
    pub agent_socket: PathBuf,
    pub http_timeout: Duration,
}

impl Pins {
    /// Resolve pins against the current user's home directory.
    pub fn resolve() -> Option<Self> {
        let home = shell::home_dir()?;
        Some(Self::with_home(&home, shell::is_apple_silicon()))
    }

    /// Resolve pins against an explicit home directory.
    pub fn with_home(home: &Path, apple_silicon: bool) -> Self {
        let brew_prefix = if apple_silicon {
            PathBuf::from("/opt/homebrew")
        } else {
            PathBuf::from("/usr/local")
        };

        Self {
            nix_installer: PayloadPin {
                url: NIX_INSTALLER_URL.to_string(),
                sha256: NIX_INSTALLER_SHA256.to_string(),
                file_name: "nix-installer.sh".to_string(),
            },
            brew_installer: PayloadPin {
                url: format!(
                    "https://raw.githubusercontent.com/Homebrew/install/{BREW_INSTALL_COMMIT}/install.sh"
                ),
                sha256: BREW_INSTALLER_SHA256.to_string(),
                file_name: "brew-install.sh".to_string(),
            },
            nix_features: NIX_FEATURES.to_vec(),
            profile_file: home.join(".zprofile"),
            nix_conf: home.join(".config/nix/nix.conf"),
            brew_prefix,
            dotfiles_repo: DOTFILES_REPO.to_string(),
            agent_socket: home
                .join("Library/Group Containers/2BUA8C4S2C.com.1password/t/agent.sock"),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }

    /// The activation line persisted into the shell profile after a
    /// Homebrew install.
    pub fn brew_shellenv_line(&self) -> String {
        format!("eval \"$({}/bin/brew shellenv)\"", self.brew_prefix.display())
    }
}
