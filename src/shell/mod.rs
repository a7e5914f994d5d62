//! Shell command execution and environment management.

pub mod command;
pub mod platform;
pub mod profile;

pub use command::{
    execute, execute_check, execute_streaming, CommandResult, OutputCallback, OutputLine,
};
pub use platform::{home_dir, is_apple_silicon, is_ci, is_elevated, is_macos};
pub use profile::{ensure_line, ensure_nix_features};
