use super::Publisher;
use crate::errors::{BuildError, Result};
use crate::process::{CommandSpec, ExecConfig, run};
use crate::types::VersionInfo;
use std::path::{Path, PathBuf};
use tracing::info;

/// Publishes the package in `package_dir` with `npm publish`.
#[derive(Debug, Clone)]
pub struct NpmPublisher {
    package_dir: PathBuf,
    exec: ExecConfig,
    extra_args: Vec<String>,
}

impl NpmPublisher {
    pub fn new(package_dir: &Path, exec: &ExecConfig) -> Self {
        Self {
            package_dir: package_dir.to_path_buf(),
            exec: exec.in_dir(package_dir),
            extra_args: Vec::new(),
        }
    }

    /// Extra flags forwarded to `npm publish` (e.g. `--tag beta`).
    pub fn with_args(mut self, args: &[String]) -> Self {
        self.extra_args.extend(args.iter().cloned());
        self
    }

    pub fn command(&self) -> CommandSpec {
        let mut args = vec!["publish".to_string()];
        args.extend(self.extra_args.iter().cloned());
        CommandSpec::new("npm", &args)
    }
}

impl Publisher for NpmPublisher {
    fn publish(&self, info: &VersionInfo) -> Result<()> {
        info!(
            "Publishing {} version {} to npm",
            self.package_dir.display(),
            info.version
        );
        run(&self.command(), &self.exec).map_err(|e| match e {
            BuildError::Command { message, .. } => {
                BuildError::Publish(format!("npm publish failed: {message}"))
            }
            other => other,
        })?;
        Ok(())
    }
}
