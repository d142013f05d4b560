// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed repository and home directory, a
// scripted executor, and a fluent builder so each integration test can set up
// an isolated environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dotstrap_cli::config::Config;
use dotstrap_cli::exec::{ExecResult, Executor};
use dotstrap_cli::logging::{Log, Logger};
use dotstrap_cli::operations::SystemFileSystemOps;
use dotstrap_cli::platform::Platform;
use dotstrap_cli::prompt::AssumeYes;
use dotstrap_cli::tasks::Context;

/// Executor that answers from a queue of `(success, stdout)` pairs and
/// records every command line. An exhausted queue answers with a failure.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<(bool, String)>>,
    calls: Mutex<Vec<String>>,
    on_path: bool,
}

impl ScriptedExecutor {
    pub fn new(responses: Vec<(bool, &str)>) -> Self {
        Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|(ok, out)| (ok, out.to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn next(&self, program: &str, args: &[&str]) -> ExecResult {
        let mut line = vec![program];
        line.extend_from_slice(args);
        self.calls.lock().expect("calls lock").push(line.join(" "));
        let (success, stdout) = self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or((false, String::new()));
        ExecResult {
            stdout: stdout.into_bytes(),
            stderr: String::new(),
            success,
            code: Some(i32::from(!success)),
        }
    }

    fn checked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let result = self.next(program, args);
        anyhow::ensure!(result.success, "{program} failed");
        Ok(result)
    }
}

impl Executor for ScriptedExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.checked(program, args)
    }

    fn run_in(&self, _: &Path, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.checked(program, args)
    }

    fn run_in_unchecked(
        &self,
        _: &Path,
        program: &str,
        args: &[&str],
    ) -> anyhow::Result<ExecResult> {
        Ok(self.next(program, args))
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.next(program, args))
    }

    fn which(&self, _: &str) -> bool {
        self.on_path
    }
}

/// An isolated repository and home directory, each backed by a
/// [`tempfile::TempDir`] that is deleted on drop.
pub struct IntegrationTestContext {
    /// Repository root holding `conf/` and the tracked files.
    pub root: tempfile::TempDir,
    /// Stand-in for the user's home directory.
    pub home: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a repository with an empty `conf/` directory.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp root");
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::create_dir_all(root.path().join("conf")).expect("create conf dir");
        Self { root, home }
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Path of `relative` inside the home directory.
    pub fn home_file(&self, relative: &str) -> PathBuf {
        self.home.path().join(relative)
    }

    /// Load both tables from the repository.
    pub fn load_config(&self) -> Config {
        Config::load(self.root.path()).expect("load config")
    }

    /// Build a [`Context`] over the real filesystem with `executor` standing
    /// in for every external program.
    pub fn context(&self, distro: &str, executor: Arc<ScriptedExecutor>) -> Context {
        self.context_with(distro, executor)
    }

    /// Like [`context`](Self::context) with any executor, e.g. the real one.
    pub fn context_with(&self, distro: &str, executor: Arc<dyn Executor>) -> Context {
        Context {
            config: Arc::new(self.load_config()),
            platform: Arc::new(Platform::new(distro)),
            log: Arc::new(Logger::new("test")) as Arc<dyn Log>,
            dry_run: false,
            home: self.home.path().to_path_buf(),
            executor,
            fs_ops: Arc::new(SystemFileSystemOps),
            prompt: Arc::new(AssumeYes),
            args: vec![],
        }
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `conf/<filename>`.
    pub fn with_config_file(self, filename: &str, content: &str) -> Self {
        let path = self.ctx.root.path().join("conf").join(filename);
        std::fs::write(path, content).expect("write config file");
        self
    }

    /// Write a tracked file at `name` relative to the repository root.
    pub fn with_tracked_file(self, name: &str, content: &str) -> Self {
        std::fs::write(self.ctx.root.path().join(name), content).expect("write tracked file");
        self
    }

    /// Write a file at `relative` inside the home directory.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.home.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create home parent");
        }
        std::fs::write(path, content).expect("write home file");
        self
    }

    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
