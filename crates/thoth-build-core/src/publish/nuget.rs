use super::Publisher;
use crate::errors::{BuildError, Result, io_error_with_path};
use crate::process::{CommandSpec, ExecConfig, run};
use crate::types::VersionInfo;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Packs an MSBuild project and pushes the resulting `.nupkg`.
#[derive(Debug, Clone)]
pub struct NugetPublisher {
    project_dir: PathBuf,
    project_file_name: String,
    api_key: String,
    source: String,
    exec: ExecConfig,
}

impl NugetPublisher {
    pub fn new(
        project_dir: &Path,
        project_file_name: &str,
        api_key: String,
        source: &str,
        exec: &ExecConfig,
    ) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            project_file_name: project_file_name.to_string(),
            api_key,
            source: source.to_string(),
            exec: exec.in_dir(project_dir),
        }
    }

    /// Package id, i.e. the project file name without its extension.
    pub fn package_id(&self) -> &str {
        Path::new(&self.project_file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.project_file_name)
    }

    /// Path of the package produced by `dotnet pack`, relative to the project directory.
    pub fn package_path(&self, version: &str) -> String {
        format!("bin/Release/{}.{}.nupkg", self.package_id(), version)
    }

    pub fn pack_command(&self) -> CommandSpec {
        CommandSpec::new("dotnet", &["pack", "-c", "Release"])
    }

    pub fn push_command(&self, version: &str) -> CommandSpec {
        let package = self.package_path(version);
        CommandSpec::new(
            "dotnet",
            &[
                "nuget",
                "push",
                package.as_str(),
                "-s",
                self.source.as_str(),
                "-k",
                self.api_key.as_str(),
            ],
        )
    }

    /// Remove `bin/` and `obj/` so no stale package gets pushed.
    fn clean_outputs(&self) -> Result<()> {
        for dir in ["bin", "obj"] {
            let path = self.project_dir.join(dir);
            if path.exists() {
                debug!("Removing {}", path.display());
                std::fs::remove_dir_all(&path).map_err(|e| io_error_with_path(e, &path))?;
            }
        }
        Ok(())
    }
}

impl Publisher for NugetPublisher {
    fn publish(&self, info: &VersionInfo) -> Result<()> {
        self.clean_outputs()?;

        run(&self.pack_command(), &self.exec).map_err(|e| publish_error("Dotnet pack", e))?;

        info!("Pushing {} to {}", self.package_path(&info.version), self.source);
        run(&self.push_command(&info.version), &self.exec)
            .map_err(|e| publish_error("Dotnet push", e))?;

        info!("NuGet package published successfully");
        Ok(())
    }
}

fn publish_error(step: &str, err: BuildError) -> BuildError {
    match err {
        BuildError::Command { message, .. } => {
            BuildError::Publish(format!("{step} failed: {message}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publisher() -> NugetPublisher {
        NugetPublisher::new(
            Path::new("/repo/src"),
            "Thoth.Elmish.FormBuilder.fsproj",
            "secret".into(),
            "nuget.org",
            &ExecConfig::new("/repo"),
        )
    }

    #[test]
    fn package_path_uses_project_stem_and_version() {
        let p = publisher();
        assert_eq!(p.package_id(), "Thoth.Elmish.FormBuilder");
        assert_eq!(
            p.package_path("1.2.0"),
            "bin/Release/Thoth.Elmish.FormBuilder.1.2.0.nupkg"
        );
    }

    #[test]
    fn commands_run_in_project_dir_and_hide_key() {
        let p = publisher();
        assert_eq!(p.exec.cwd, PathBuf::from("/repo/src"));
        assert_eq!(p.pack_command().display(), "dotnet pack -c Release");

        let push = p.push_command("1.2.0");
        assert!(push.args.contains(&"secret".to_string()));
        assert_eq!(
            push.display(),
            "dotnet nuget push bin/Release/Thoth.Elmish.FormBuilder.1.2.0.nupkg -s nuget.org -k ***"
        );
    }

    #[test]
    fn clean_outputs_removes_bin_and_obj() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("bin/Release")).unwrap();
        std::fs::create_dir_all(temp.path().join("obj")).unwrap();
        std::fs::write(temp.path().join("App.fsproj"), "<Project />").unwrap();

        let p = NugetPublisher::new(
            temp.path(),
            "App.fsproj",
            "key".into(),
            "nuget.org",
            &ExecConfig::new(temp.path()),
        );
        p.clean_outputs().unwrap();

        assert!(!temp.path().join("bin").exists());
        assert!(!temp.path().join("obj").exists());
        assert!(temp.path().join("App.fsproj").exists());
    }
}
