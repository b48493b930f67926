//! Build, watch and test tasks for the example project and the test suite.
//!
//! These only sequence external tools: `npm`, the Fable compiler (through
//! `dotnet fable`) and the configured bundler or test runner.

use crate::config::{Bundler, ExamplesConfig, TestsConfig};
use crate::errors::{Result, io_error_with_path};
use crate::process::{CommandSpec, ExecConfig, run, run_concurrently};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The example application built with Fable and a front-end bundler.
#[derive(Debug, Clone)]
pub struct ExamplesProject {
    root: PathBuf,
    config: ExamplesConfig,
    exec: ExecConfig,
}

impl ExamplesProject {
    pub fn new(repo_root: &Path, config: &ExamplesConfig, exec: &ExecConfig) -> Self {
        let root = repo_root.join(&config.root);
        Self {
            exec: exec.in_dir(&root),
            root,
            config: config.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories wiped before every build.
    pub fn clean_targets(&self) -> Vec<PathBuf> {
        vec![
            self.root.join(&self.config.out_dir),
            self.root.join("src").join("obj"),
            self.root.join("src").join("bin"),
            self.root.join("output"),
        ]
    }

    pub fn clean(&self) -> Result<()> {
        remove_dirs(&self.clean_targets())
    }

    pub fn compile_command(&self, watch: bool) -> CommandSpec {
        fable_command(None, &self.config.out_dir, watch)
    }

    pub fn bundle_command(&self) -> CommandSpec {
        match self.config.bundler {
            Bundler::Webpack => CommandSpec::new("npx", &["webpack", "--mode", "production"]),
            Bundler::Vite => CommandSpec::new("npx", &["vite", "build"]),
        }
    }

    pub fn dev_server_command(&self) -> CommandSpec {
        match self.config.bundler {
            Bundler::Webpack => {
                CommandSpec::new("npx", &["webpack", "serve", "--mode", "development"])
            }
            Bundler::Vite => CommandSpec::new("npx", &["vite"]),
        }
    }

    /// Production build: clean, install, compile, bundle.
    pub fn build(&self) -> Result<()> {
        self.clean()?;
        npm_install(&self.exec)?;
        run(&self.compile_command(false), &self.exec)?;
        run(&self.bundle_command(), &self.exec)?;
        info!("Examples built in {}", self.root.display());
        Ok(())
    }

    /// Clean and install, then run the dev server and the compiler in watch
    /// mode side by side until both exit.
    pub fn watch(&self) -> Result<()> {
        self.clean()?;
        npm_install(&self.exec)?;
        run_concurrently(
            &[self.dev_server_command(), self.compile_command(true)],
            &self.exec,
        )
    }
}

/// The Fable-compiled test suite.
#[derive(Debug, Clone)]
pub struct TestSuite {
    repo_root: PathBuf,
    config: TestsConfig,
    exec: ExecConfig,
}

impl TestSuite {
    pub fn new(repo_root: &Path, config: &TestsConfig, exec: &ExecConfig) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            config: config.clone(),
            exec: exec.in_dir(repo_root),
        }
    }

    fn compiled_dir(&self) -> String {
        format!("{}/{}", self.config.root, self.config.out_dir)
    }

    pub fn compile_command(&self, watch: bool) -> CommandSpec {
        fable_command(Some(self.config.root.as_str()), &self.compiled_dir(), watch)
    }

    pub fn runner_command(&self, watch: bool) -> CommandSpec {
        let compiled = self.compiled_dir();
        let mut args = vec![self.config.runner.as_str(), compiled.as_str()];
        if watch {
            args.push("--watch");
        }
        CommandSpec::new("npx", &args)
    }

    pub fn clean(&self) -> Result<()> {
        remove_dirs(&[self.repo_root.join(self.compiled_dir())])
    }

    /// Compile then run the tests once.
    pub fn run(&self) -> Result<()> {
        self.clean()?;
        npm_install(&self.exec)?;
        run(&self.compile_command(false), &self.exec)?;
        run(&self.runner_command(false), &self.exec)?;
        Ok(())
    }

    /// Compile once, then run compiler and runner in watch mode.
    pub fn watch(&self) -> Result<()> {
        self.clean()?;
        npm_install(&self.exec)?;
        // the runner needs compiled files before it starts watching them
        run(&self.compile_command(false), &self.exec)?;
        run_concurrently(
            &[self.compile_command(true), self.runner_command(true)],
            &self.exec,
        )
    }
}

fn npm_install(exec: &ExecConfig) -> Result<()> {
    run(&CommandSpec::new("npm", &["install"]), exec)?;
    Ok(())
}

fn fable_command(project: Option<&str>, out_dir: &str, watch: bool) -> CommandSpec {
    let mut args = vec!["fable"];
    args.extend(project);
    args.extend(["--outDir", out_dir]);
    if watch {
        args.push("--watch");
    }
    CommandSpec::new("dotnet", &args)
}

fn remove_dirs(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        if path.exists() {
            debug!("Removing {}", path.display());
            std::fs::remove_dir_all(path).map_err(|e| io_error_with_path(e, path))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examples(bundler: Bundler) -> ExamplesProject {
        let config = ExamplesConfig {
            bundler,
            ..ExamplesConfig::default()
        };
        ExamplesProject::new(Path::new("/repo"), &config, &ExecConfig::new("/repo"))
    }

    #[test]
    fn examples_run_in_configured_root() {
        let project = examples(Bundler::Webpack);
        assert_eq!(project.root(), Path::new("/repo/examples"));
        assert_eq!(project.exec.cwd, PathBuf::from("/repo/examples"));
    }

    #[test]
    fn webpack_commands() {
        let project = examples(Bundler::Webpack);
        assert_eq!(
            project.compile_command(false).display(),
            "dotnet fable --outDir fableBuild"
        );
        assert_eq!(
            project.compile_command(true).display(),
            "dotnet fable --outDir fableBuild --watch"
        );
        assert_eq!(
            project.bundle_command().display(),
            "npx webpack --mode production"
        );
        assert_eq!(
            project.dev_server_command().display(),
            "npx webpack serve --mode development"
        );
    }

    #[test]
    fn vite_commands() {
        let project = examples(Bundler::Vite);
        assert_eq!(project.bundle_command().display(), "npx vite build");
        assert_eq!(project.dev_server_command().display(), "npx vite");
    }

    #[test]
    fn clean_removes_build_outputs_only() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("examples");
        for dir in ["fableBuild/src", "src/obj", "src/bin", "output", "public"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        std::fs::write(root.join("src/App.fs"), "module App").unwrap();

        let project = ExamplesProject::new(
            temp.path(),
            &ExamplesConfig::default(),
            &ExecConfig::new(temp.path()),
        );
        project.clean().unwrap();

        assert!(!root.join("fableBuild").exists());
        assert!(!root.join("src/obj").exists());
        assert!(!root.join("src/bin").exists());
        assert!(!root.join("output").exists());
        assert!(root.join("public").exists());
        assert!(root.join("src/App.fs").exists());

        // nothing left to remove is fine
        project.clean().unwrap();
    }

    #[test]
    fn test_suite_commands() {
        let suite = TestSuite::new(
            Path::new("/repo"),
            &TestsConfig::default(),
            &ExecConfig::new("/repo"),
        );
        assert_eq!(
            suite.compile_command(false).display(),
            "dotnet fable tests --outDir tests/fableBuild"
        );
        assert_eq!(
            suite.runner_command(false).display(),
            "npx mocha tests/fableBuild"
        );
        assert_eq!(
            suite.runner_command(true).display(),
            "npx mocha tests/fableBuild --watch"
        );
    }
}
