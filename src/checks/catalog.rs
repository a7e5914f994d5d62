//! The dependency catalog: what gets checked, in what order, and how
//! each missing piece is installed.
//!
//! The catalog is declarative. Every record is data; the sequencer in
//! `runner` is the only control flow. Order is load-bearing: Nix must
//! exist before nix-darwin can activate, nix-darwin before the 1Password
//! CLI is installed from nixpkgs, and Homebrew comes last because
//! nothing here depends on it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::pins::{PayloadPin, Pins};
use crate::shell;

use super::probe::Probe;

/// One entry in the bootstrap sequence.
pub struct DependencyCheck {
    /// Machine-friendly identifier (confirm keys, report entries).
    pub name: &'static str,
    /// Human-readable label shown in headers and summaries.
    pub title: &'static str,
    /// Presence probe; success means the check is already satisfied.
    pub probe: Probe,
    /// Deep-health probe, evaluated after presence (Nix only).
    pub health: Option<Health>,
    /// Command whose output carries the installed version, for `status`.
    pub version_probe: Option<&'static str>,
    /// How to remedy absence.
    pub installer: Installer,
    /// Whether the check applies on this machine at all.
    pub gate: Gate,
    /// Post-install environment edit.
    pub finalize: Option<Finalize>,
}

/// A secondary probe that distinguishes "installed" from "working".
pub struct Health {
    pub probe: Probe,
    /// Shown when the probe still fails after the one remedial attempt.
    pub guidance: &'static str,
}

/// Machine predicate deciding whether a check applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Applies on every machine.
    Always,
    /// Applies only on Apple-silicon hardware.
    AppleSilicon,
}

impl Gate {
    /// Evaluate the gate against the current host.
    pub fn is_open(&self) -> bool {
        match self {
            Self::Always => true,
            Self::AppleSilicon => shell::is_apple_silicon(),
        }
    }

    /// Why a closed gate skipped the check.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Always => "always applies",
            Self::AppleSilicon => "Apple silicon only",
        }
    }
}

/// How to remedy a missing dependency.
pub enum Installer {
    /// Run a shell command; non-zero exit is fatal.
    Command(String),

    /// Download a pinned remote script, verify it, and execute it.
    RemoteScript(RemoteScript),

    /// Run a command that returns before the install completes, then
    /// block polling `wait` until it reports satisfied. Unbounded: the
    /// Xcode CLT GUI flow finishes whenever the operator lets it.
    CommandThenWait {
        command: String,
        wait: Probe,
        poll_interval: Duration,
    },
}

impl Installer {
    /// Human-readable description, for dry runs.
    pub fn describe(&self) -> String {
        match self {
            Self::Command(cmd) => format!("run `{}`", cmd),
            Self::RemoteScript(script) => {
                format!("download and run {}", script.payload.url)
            }
            Self::CommandThenWait { command, .. } => {
                format!("run `{}` and wait for it to finish", command)
            }
        }
    }
}

/// A verified remote script plus how to execute it once on disk.
pub struct RemoteScript {
    pub payload: PayloadPin,
    /// Interpreter the script is handed to (`sh`, `/bin/bash`).
    pub interpreter: &'static str,
    /// Arguments appended after the script path.
    pub args: &'static [&'static str],
    /// Environment assignments ahead of the interpreter.
    pub env: &'static [(&'static str, &'static str)],
}

impl RemoteScript {
    /// Build the shell command that executes the downloaded script.
    pub fn command_for(&self, script_path: &Path) -> String {
        let mut cmd = String::new();
        for (key, value) in self.env {
            cmd.push_str(key);
            cmd.push('=');
            cmd.push_str(value);
            cmd.push(' ');
        }
        cmd.push_str(self.interpreter);
        cmd.push_str(&format!(" \"{}\"", script_path.display()));
        for arg in self.args {
            cmd.push(' ');
            cmd.push_str(arg);
        }
        cmd
    }
}

/// Post-install environment edit.
pub enum Finalize {
    /// Persist a line in the shell profile.
    ProfileLine { file: PathBuf, line: String },
    /// Enable experimental features in the Nix configuration.
    NixFeatures {
        file: PathBuf,
        features: Vec<&'static str>,
    },
}

impl Finalize {
    /// Apply the edit. Returns whether the file changed.
    pub fn apply(&self) -> Result<bool> {
        match self {
            Self::ProfileLine { file, line } => shell::ensure_line(file, line),
            Self::NixFeatures { file, features } => shell::ensure_nix_features(file, features),
        }
    }

    /// Human-readable description, for dry runs.
    pub fn describe(&self) -> String {
        match self {
            Self::ProfileLine { file, .. } => {
                format!("persist the activation line in {}", file.display())
            }
            Self::NixFeatures { file, features } => {
                format!("enable {} in {}", features.join(", "), file.display())
            }
        }
    }
}

/// Build the full catalog in its fixed execution order.
pub fn catalog(pins: &Pins) -> Vec<DependencyCheck> {
    vec![
        DependencyCheck {
            name: "xcode-clt",
            title: "Xcode Command Line Tools",
            probe: Probe::command("xcode-select -p"),
            health: None,
            version_probe: Some("clang --version"),
            installer: Installer::CommandThenWait {
                command: "xcode-select --install".to_string(),
                wait: Probe::command("xcode-select -p"),
                poll_interval: Duration::from_secs(10),
            },
            gate: Gate::Always,
            finalize: None,
        },
        DependencyCheck {
            name: "rosetta",
            title: "Rosetta 2",
            // oahd is the Rosetta launch daemon; the arch probe catches
            // machines where Rosetta works but the daemon name changed.
            probe: Probe::Any(vec![
                Probe::command("/usr/bin/pgrep -q oahd"),
                Probe::command("arch -x86_64 /usr/bin/true"),
            ]),
            health: None,
            version_probe: None,
            installer: Installer::Command(
                "softwareupdate --install-rosetta --agree-to-license".to_string(),
            ),
            gate: Gate::AppleSilicon,
            finalize: None,
        },
        DependencyCheck {
            name: "nix",
            title: "Nix",
            probe: Probe::command("command -v nix"),
            health: Some(Health {
                probe: Probe::command("nix store ping --store daemon"),
                guidance: "Nix is installed but the daemon is not healthy. \
                           Re-run `cairn` once the daemon is reachable.",
            }),
            version_probe: Some("nix --version"),
            installer: Installer::RemoteScript(RemoteScript {
                payload: pins.nix_installer.clone(),
                interpreter: "sh",
                args: &["install", "--determinate", "--no-confirm"],
                env: &[],
            }),
            gate: Gate::Always,
            finalize: Some(Finalize::NixFeatures {
                file: pins.nix_conf.clone(),
                features: pins.nix_features.clone(),
            }),
        },
        DependencyCheck {
            name: "nix-darwin",
            title: "nix-darwin",
            probe: Probe::command("command -v darwin-rebuild"),
            health: None,
            version_probe: None,
            installer: Installer::Command(
                "nix run nix-darwin/master#darwin-rebuild -- switch".to_string(),
            ),
            gate: Gate::Always,
            finalize: None,
        },
        DependencyCheck {
            name: "op",
            title: "1Password CLI",
            probe: Probe::command("command -v op"),
            health: None,
            version_probe: Some("op --version"),
            installer: Installer::Command(
                "nix profile install nixpkgs#_1password-cli".to_string(),
            ),
            gate: Gate::Always,
            finalize: None,
        },
        DependencyCheck {
            name: "homebrew",
            title: "Homebrew",
            // Both prefixes: a brew migrated from an Intel machine lives
            // under /usr/local even on Apple silicon.
            probe: Probe::Any(vec![
                Probe::command("command -v brew"),
                Probe::path("/opt/homebrew/bin/brew"),
                Probe::path("/usr/local/bin/brew"),
            ]),
            health: None,
            version_probe: Some("brew --version"),
            installer: Installer::RemoteScript(RemoteScript {
                payload: pins.brew_installer.clone(),
                interpreter: "/bin/bash",
                args: &[],
                env: &[("NONINTERACTIVE", "1")],
            }),
            gate: Gate::Always,
            finalize: Some(Finalize::ProfileLine {
                file: pins.profile_file.clone(),
                line: pins.brew_shellenv_line(),
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pins() -> Pins {
        Pins::with_home(Path::new("/Users/test"), true)
    }

    #[test]
    fn catalog_order_is_fixed() {
        let checks = catalog(&test_pins());
        let names: Vec<&str> = checks.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["xcode-clt", "rosetta", "nix", "nix-darwin", "op", "homebrew"]
        );
    }

    #[test]
    fn only_nix_carries_health() {
        let checks = catalog(&test_pins());
        for check in &checks {
            if check.name == "nix" {
                assert!(check.health.is_some());
            } else {
                assert!(check.health.is_none(), "{} should not have health", check.name);
            }
        }
    }

    #[test]
    fn only_rosetta_is_gated() {
        let checks = catalog(&test_pins());
        for check in &checks {
            if check.name == "rosetta" {
                assert_eq!(check.gate, Gate::AppleSilicon);
            } else {
                assert_eq!(check.gate, Gate::Always, "{} should always apply", check.name);
            }
        }
    }

    #[test]
    fn always_gate_is_open() {
        assert!(Gate::Always.is_open());
    }

    #[test]
    fn versioned_tools_carry_a_version_probe() {
        let checks = catalog(&test_pins());
        for check in &checks {
            match check.name {
                "rosetta" | "nix-darwin" => assert!(check.version_probe.is_none()),
                _ => assert!(
                    check.version_probe.is_some(),
                    "{} should report a version",
                    check.name
                ),
            }
        }
    }

    #[test]
    fn nix_finalize_enables_features() {
        let pins = test_pins();
        let checks = catalog(&pins);
        let nix = checks.iter().find(|c| c.name == "nix").unwrap();

        match nix.finalize.as_ref().unwrap() {
            Finalize::NixFeatures { file, features } => {
                assert_eq!(file, &pins.nix_conf);
                assert!(features.contains(&"nix-command"));
                assert!(features.contains(&"flakes"));
            }
            _ => panic!("nix finalize should be NixFeatures"),
        }
    }

    #[test]
    fn homebrew_finalize_persists_shellenv() {
        let pins = test_pins();
        let checks = catalog(&pins);
        let brew = checks.iter().find(|c| c.name == "homebrew").unwrap();

        match brew.finalize.as_ref().unwrap() {
            Finalize::ProfileLine { file, line } => {
                assert_eq!(file, &pins.profile_file);
                assert!(line.contains("brew shellenv"));
                assert!(line.contains("/opt/homebrew"));
            }
            _ => panic!("homebrew finalize should be ProfileLine"),
        }
    }

    #[test]
    fn remote_scripts_carry_pinned_digests() {
        let pins = test_pins();
        let checks = catalog(&pins);

        let nix = checks.iter().find(|c| c.name == "nix").unwrap();
        match &nix.installer {
            Installer::RemoteScript(script) => {
                assert_eq!(script.payload.sha256, pins.nix_installer.sha256);
                assert_eq!(script.interpreter, "sh");
                assert!(script.args.contains(&"--no-confirm"));
            }
            _ => panic!("nix installer should be RemoteScript"),
        }

        let brew = checks.iter().find(|c| c.name == "homebrew").unwrap();
        match &brew.installer {
            Installer::RemoteScript(script) => {
                assert_eq!(script.payload.sha256, pins.brew_installer.sha256);
                assert_eq!(script.env, &[("NONINTERACTIVE", "1")]);
            }
            _ => panic!("homebrew installer should be RemoteScript"),
        }
    }

    #[test]
    fn xcode_installer_waits_on_presence() {
        let checks = catalog(&test_pins());
        let xcode = checks.iter().find(|c| c.name == "xcode-clt").unwrap();

        match &xcode.installer {
            Installer::CommandThenWait { command, wait, .. } => {
                assert!(command.contains("xcode-select --install"));
                assert!(wait.describe().contains("xcode-select -p"));
            }
            _ => panic!("xcode installer should be CommandThenWait"),
        }
    }

    #[test]
    fn remote_script_command_includes_env_and_args() {
        let script = RemoteScript {
            payload: PayloadPin {
                url: "https://example.com/install.sh".to_string(),
                sha256: "0".repeat(64),
                file_name: "install.sh".to_string(),
            },
            interpreter: "/bin/bash",
            args: &["--flag"],
            env: &[("NONINTERACTIVE", "1")],
        };

        let cmd = script.command_for(Path::new("/tmp/scratch/install.sh"));
        assert_eq!(cmd, "NONINTERACTIVE=1 /bin/bash \"/tmp/scratch/install.sh\" --flag");
    }

    #[test]
    fn installer_describe_names_the_action() {
        let pins = test_pins();
        let checks = catalog(&pins);

        let by_name = |name: &str| checks.iter().find(|c| c.name == name).unwrap();

        assert!(by_name("op").installer.describe().contains("nix profile install"));
        assert!(by_name("nix").installer.describe().contains("install.determinate.systems"));
        assert!(by_name("xcode-clt").installer.describe().contains("wait"));
    }

    #[test]
    fn homebrew_probe_accepts_either_prefix() {
        let pins = test_pins();
        let checks = catalog(&pins);
        let brew = checks.iter().find(|c| c.name == "homebrew").unwrap();

        let description = brew.probe.describe();
        assert!(description.contains("command -v brew"));
        assert!(description.contains("/opt/homebrew/bin/brew"));
        assert!(description.contains("/usr/local/bin/brew"));
    }

    #[test]
    fn finalize_describe_mentions_target_file() {
        let pins = test_pins();
        let finalize = Finalize::ProfileLine {
            file: pins.profile_file.clone(),
            line: pins.brew_shellenv_line(),
        };
        assert!(finalize.describe().contains(".zprofile"));

        let features = Finalize::NixFeatures {
            file: pins.nix_conf.clone(),
            features: vec!["nix-command", "flakes"],
        };
        assert!(features.describe().contains("nix-command, flakes"));
        assert!(features.describe().contains("nix.conf"));
    }
}
