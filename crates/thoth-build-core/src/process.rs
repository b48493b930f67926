//! Spawning of external tools (npm, npx, dotnet).
//!
//! Every invocation receives an explicit [`ExecConfig`] describing where it
//! runs and whether a non-zero exit status is an error. There is no
//! process-wide switch.

use crate::errors::{BuildError, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use tracing::{debug, info, warn};

/// Arguments following one of these flags are masked when a command is displayed.
const SECRET_FLAGS: &[&str] = &["-k", "--api-key"];

/// Creates a `Command` that can resolve `.cmd` and `.bat` scripts on Windows.
///
/// On Windows, npm and npx are installed as `.cmd` batch scripts, which
/// `std::process::Command` does not resolve on its own (see rust-lang/rust#37519).
/// The invocation is wrapped through `cmd.exe /C` so PATHEXT is honoured.
pub fn command(program: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", program]);
        cmd
    } else {
        Command::new(program)
    }
}

/// Execution settings handed to every process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    /// Working directory of the spawned process.
    pub cwd: PathBuf,
    /// Extra environment variables exported to the child.
    pub envs: Vec<(String, String)>,
    /// When true, a non-zero exit status is turned into [`BuildError::Command`].
    pub fail_on_error: bool,
}

impl ExecConfig {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            envs: Vec::new(),
            fail_on_error: true,
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Report non-zero exits through the returned status instead of an error.
    pub fn allow_failure(mut self) -> Self {
        self.fail_on_error = false;
        self
    }

    /// Same settings, different working directory.
    pub fn in_dir(&self, cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            ..self.clone()
        }
    }
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<S: AsRef<str>>(program: &str, args: &[S]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.as_ref().to_string()).collect(),
        }
    }

    /// Render the command for logs, masking secrets passed after `-k`/`--api-key`.
    pub fn display(&self) -> String {
        let mut s = self.program.clone();
        let mut mask_next = false;
        for arg in &self.args {
            s.push(' ');
            if mask_next {
                s.push_str("***");
                mask_next = false;
                continue;
            }
            s.push_str(arg);
            mask_next = SECRET_FLAGS.contains(&arg.as_str());
        }
        s
    }

    fn to_command(&self, config: &ExecConfig) -> Command {
        let mut cmd = command(&self.program);
        cmd.args(&self.args).current_dir(&config.cwd);
        for (key, value) in &config.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

/// Run a command to completion with inherited stdio.
pub fn run(spec: &CommandSpec, config: &ExecConfig) -> Result<ExitStatus> {
    let mut cmd = spec.to_command(config);
    info!(cwd = %config.cwd.display(), "Running: {}", spec.display());
    let status = cmd.status().map_err(|err| spawn_error(spec, err))?;
    check_status(spec, status, config)
}

/// Start all commands, then wait for every one of them.
///
/// The children run side by side with no ordering between them. The first
/// failure (in the order of `specs`) is reported once all children exited.
pub fn run_concurrently(specs: &[CommandSpec], config: &ExecConfig) -> Result<()> {
    let mut children: Vec<(&CommandSpec, Child)> = Vec::with_capacity(specs.len());
    for spec in specs {
        info!(cwd = %config.cwd.display(), "Starting: {}", spec.display());
        match spec.to_command(config).spawn() {
            Ok(child) => children.push((spec, child)),
            Err(err) => {
                for (started, mut child) in children {
                    debug!("Stopping {} after spawn failure", started.display());
                    if let Err(e) = child.kill() {
                        warn!("Failed to stop {}: {}", started.display(), e);
                    }
                    let _ = child.wait();
                }
                return Err(spawn_error(spec, err));
            }
        }
    }

    let mut first_error = None;
    for (spec, mut child) in children {
        let outcome = child
            .wait()
            .map_err(BuildError::Io)
            .and_then(|status| check_status(spec, status, config));
        if let Err(err) = outcome
            && first_error.is_none()
        {
            first_error = Some(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn check_status(spec: &CommandSpec, status: ExitStatus, config: &ExecConfig) -> Result<ExitStatus> {
    if status.success() || !config.fail_on_error {
        debug!("{} exited with {}", spec.program, status);
        return Ok(status);
    }
    Err(BuildError::Command {
        command: spec.display(),
        message: match status.code() {
            Some(code) => format!("child exited with code {code}"),
            None => format!("child terminated by signal ({status})"),
        },
    })
}

fn spawn_error(spec: &CommandSpec, err: std::io::Error) -> BuildError {
    if err.kind() == std::io::ErrorKind::NotFound {
        BuildError::Command {
            command: spec.display(),
            message: format!(
                "{} not found in PATH; ensure it is installed",
                spec.program
            ),
        }
    } else {
        BuildError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_creates_valid_command() {
        let cmd = command("test-program");

        if cfg!(windows) {
            assert_eq!(cmd.get_program(), "cmd");
            let args: Vec<_> = cmd.get_args().collect();
            assert_eq!(args, ["/C", "test-program"]);
        } else {
            assert_eq!(cmd.get_program(), "test-program");
            assert_eq!(cmd.get_args().count(), 0);
        }
    }

    #[test]
    fn display_masks_api_keys() {
        let spec = CommandSpec::new(
            "dotnet",
            &["nuget", "push", "pkg.nupkg", "-s", "nuget.org", "-k", "secret"],
        );
        assert_eq!(
            spec.display(),
            "dotnet nuget push pkg.nupkg -s nuget.org -k ***"
        );
    }

    #[test]
    fn exec_config_in_dir_keeps_settings() {
        let base = ExecConfig::new("/repo").with_env("A", "1").allow_failure();
        let moved = base.in_dir("/repo/examples");
        assert_eq!(moved.cwd, PathBuf::from("/repo/examples"));
        assert_eq!(moved.envs, vec![("A".to_string(), "1".to_string())]);
        assert!(!moved.fail_on_error);
    }

    #[cfg(unix)]
    #[test]
    fn missing_program_reports_path_hint() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new::<&str>("thoth-build-definitely-missing-tool", &[]);
        let err = run(&spec, &ExecConfig::new(dir.path())).unwrap_err();
        match err {
            BuildError::Command { message, .. } => assert!(message.contains("not found in PATH")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_error_when_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("sh", &["-c", "exit 3"]);
        let err = run(&spec, &ExecConfig::new(dir.path())).unwrap_err();
        match err {
            BuildError::Command { message, .. } => assert_eq!(message, "child exited with code 3"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_returned_when_failure_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("sh", &["-c", "exit 3"]);
        let status = run(&spec, &ExecConfig::new(dir.path()).allow_failure()).unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn run_uses_working_directory_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("sh", &["-c", "printf %s \"$THOTH_TEST\" > out.txt"]);
        run(&spec, &ExecConfig::new(dir.path()).with_env("THOTH_TEST", "hello")).unwrap();
        let written = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(written, "hello");
    }

    #[cfg(unix)]
    #[test]
    fn run_concurrently_waits_for_every_child() {
        let dir = tempfile::tempdir().unwrap();
        let specs = [
            CommandSpec::new("sh", &["-c", "sleep 0.1; touch a"]),
            CommandSpec::new("sh", &["-c", "touch b"]),
        ];
        run_concurrently(&specs, &ExecConfig::new(dir.path())).unwrap();
        assert!(dir.path().join("a").exists());
        assert!(dir.path().join("b").exists());
    }

    #[cfg(unix)]
    #[test]
    fn run_concurrently_reports_failing_child() {
        let dir = tempfile::tempdir().unwrap();
        let specs = [
            CommandSpec::new("sh", &["-c", "exit 0"]),
            CommandSpec::new("sh", &["-c", "exit 2"]),
        ];
        let err = run_concurrently(&specs, &ExecConfig::new(dir.path())).unwrap_err();
        assert!(matches!(err, BuildError::Command { .. }));
    }
}
