//! Cairn - macOS workstation bootstrap.
//!
//! Cairn replaces a hand-grown `bootstrap.sh` with a fixed, ordered
//! sequence of dependency checks: probe for each tool, ask before
//! installing it, download installer payloads only against pinned
//! SHA-256 digests, and finish by applying dotfiles and waking the
//! secret agent.
//!
//! # Modules
//!
//! - [`checks`] - The declarative dependency-check catalog and probes
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`install`] - Verified download of pinned installer payloads
//! - [`pins`] - Pinned URLs, digests, paths, and timeouts
//! - [`runner`] - Bootstrap sequencing and reporting
//! - [`shell`] - Shell command execution and profile edits
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```no_run
//! use cairn::pins::Pins;
//! use cairn::runner::{RunOptions, Sequencer};
//! use cairn::ui::{create_ui, OutputMode};
//!
//! let pins = Pins::resolve().expect("home directory");
//! let mut ui = create_ui(true, OutputMode::Normal);
//! let sequencer = Sequencer::new(&pins);
//! sequencer.run(ui.as_mut(), &RunOptions::default()).unwrap();
//! ```

pub mod checks;
pub mod cli;
pub mod error;
pub mod install;
pub mod pins;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{CairnError, Result};
