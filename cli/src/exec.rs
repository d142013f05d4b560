//! Synchronous command execution behind an injectable [`Executor`].
use anyhow::{Context, Result, bail};
use std::borrow::Cow;
use std::path::Path;
use std::process::{Command, ExitStatus, Output};

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output, byte for byte (empty for interactive runs).
    pub stdout: Vec<u8>,
    /// Captured standard error (empty for interactive runs).
    pub stderr: String,
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// Standard output as text, for listings and flags. Content that must
    /// survive byte for byte should use [`stdout`](Self::stdout) directly.
    #[must_use]
    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl From<ExitStatus> for ExecResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: String::new(),
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Abstraction over running external programs.
///
/// Every external action (package manager, git, patch, shell installers) goes
/// through this trait so tasks and resources can be exercised with a mock.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command and capture its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command in `dir`. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command in `dir`, returning the result even on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_in_unchecked(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command attached to the terminal (inherited stdio), returning its
    /// exit status without checking it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Check if a program is resolvable on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// Production [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

fn command(program: &str, args: &[&str], dir: Option<&Path>) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    cmd
}

/// `program`, or `program in dir`, for error messages.
fn label(program: &str, dir: Option<&Path>) -> String {
    dir.map_or_else(
        || program.to_string(),
        |d| format!("{program} in {}", d.display()),
    )
}

/// Capture output; a non-zero exit is an error only when `checked`.
fn capture(
    program: &str,
    args: &[&str],
    dir: Option<&Path>,
    checked: bool,
) -> Result<ExecResult> {
    let label = label(program, dir);
    let result: ExecResult = command(program, args, dir)
        .output()
        .with_context(|| format!("failed to execute: {label}"))?
        .into();
    if checked && !result.success {
        bail!(
            "{label} failed (exit {}): {}",
            result.code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
            result.stderr.trim()
        );
    }
    Ok(result)
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        capture(program, args, None, true)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        capture(program, args, Some(dir), true)
    }

    fn run_in_unchecked(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        capture(program, args, Some(dir), false)
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let status = command(program, args, None)
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(status.into())
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Run a shell command line via `sh -c`, attached to the terminal.
///
/// # Errors
///
/// Returns an error only if `sh` cannot be spawned.
pub fn run_shell(executor: &dyn Executor, command: &str) -> Result<ExecResult> {
    executor.run_interactive("sh", &["-c", command])
}
