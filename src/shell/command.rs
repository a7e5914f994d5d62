//! Shell command execution.

use crate::error::{CairnError, Result};
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command exited 0.
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Output line from command execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

/// Execute a shell command and capture its output.
pub fn execute(command: &str) -> Result<CommandResult> {
    let start = Instant::now();

    let output = shell_invocation(command)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|_| CairnError::CommandFailed {
            command: command.to_string(),
            code: None,
        })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Execute a command and return success/failure.
pub fn execute_check(command: &str) -> bool {
    execute(command).map(|r| r.success).unwrap_or(false)
}

/// Execute a command, feeding each output line to `callback` as it
/// arrives while also capturing the full transcript.
pub fn execute_streaming(command: &str, callback: OutputCallback) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = shell_invocation(command);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|_| CairnError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    // Both pipes were requested above, so take() always succeeds.
    let stdout = child.stdout.take().unwrap();
    let stderr = child.stderr.take().unwrap();

    let (tx, rx) = mpsc::channel();
    let stdout_handle = drain_lines(stdout, OutputLine::Stdout, tx.clone());
    let stderr_handle = drain_lines(stderr, OutputLine::Stderr, tx);

    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|_| CairnError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(
            stdout_output,
            stderr_output,
            duration,
        ))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}

/// Read a child stream line by line, forwarding each line on `tx` and
/// returning the collected transcript when the stream closes.
fn drain_lines<R>(
    stream: R,
    wrap: fn(String) -> OutputLine,
    tx: mpsc::Sender<OutputLine>,
) -> thread::JoinHandle<String>
where
    R: std::io::Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        let mut collected = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            collected.push_str(&line);
            collected.push('\n');
            let _ = tx.send(wrap(line));
        }
        collected
    })
}

/// Build the shell invocation for a command string.
fn shell_invocation(command: &str) -> Command {
    let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
    let mut cmd = Command::new(shell);
    cmd.arg(shell_flag());
    cmd.arg(command);
    cmd
}

/// Get the flag to pass commands to the shell.
///
/// Uses `-lic` (interactive login shell) so that profile files are
/// re-read on every invocation. Installers in this sequence append PATH
/// activation to `.zprofile` (Nix's daemon profile hook, Homebrew's
/// shellenv line); probes that run later in the same process need a
/// login shell to see the freshly installed tools. Without it,
/// `command -v nix` keeps failing until the operator opens a new
/// terminal.
///
/// In CI environments, uses `-lc` (login, non-interactive) to avoid
/// `bash: cannot set terminal process group` errors caused by `-i`
/// trying to set up job control without a TTY.
fn shell_flag() -> &'static str {
    if super::is_ci() {
        "-lc"
    } else {
        "-lic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_captures_output() {
        let result = execute("echo hello").unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_reports_failure() {
        let result = execute("exit 3").unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_captures_stderr() {
        let result = execute("echo oops >&2").unwrap();

        assert!(result.success);
        assert!(result.stderr.contains("oops"));
    }

    #[test]
    fn signal_death_has_no_exit_code() {
        let result = execute("kill -KILL $$").unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, None);
    }

    #[test]
    fn execute_check_returns_bool() {
        assert!(execute_check("exit 0"));
        assert!(!execute_check("exit 1"));
    }

    #[test]
    fn command_result_tracks_duration() {
        let result = execute("echo fast").unwrap();

        assert!(result.duration.as_millis() < 5000);
    }

    #[test]
    fn execute_streaming_captures_output() {
        use std::sync::{Arc, Mutex};

        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);

        let callback: OutputCallback = Box::new(move |line| {
            lines_clone.lock().unwrap().push(line);
        });

        let result = execute_streaming("echo line1 && echo line2", callback).unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("line1"));
        assert!(result.stdout.contains("line2"));

        let captured = lines.lock().unwrap();
        assert!(captured.len() >= 2);
    }

    #[test]
    fn execute_streaming_sees_stderr() {
        use std::sync::{Arc, Mutex};

        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);

        let callback: OutputCallback = Box::new(move |line| {
            lines_clone.lock().unwrap().push(line);
        });

        let _ = execute_streaming("echo error >&2", callback);

        let captured = lines.lock().unwrap();
        assert!(captured.iter().any(|l| matches!(l, OutputLine::Stderr(_))));
    }
}
