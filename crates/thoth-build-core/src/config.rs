use crate::errors::{BuildError, Result, io_error_with_path};
use serde::Deserialize;
use std::path::Path;

/// Name of the optional configuration file at the repository root.
pub const CONFIG_FILE: &str = "thoth-build.toml";

/// Front-end bundler driving the example project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bundler {
    #[default]
    Webpack,
    Vite,
}

/// Configuration for thoth-build
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub examples: ExamplesConfig,
    pub tests: TestsConfig,
    pub github: GitHubConfig,
    pub nuget: NugetConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExamplesConfig {
    /// Example project directory, relative to the repository root.
    pub root: String,
    pub bundler: Bundler,
    /// Output directory of the F# compiler, relative to `root`.
    pub out_dir: String,
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            root: "examples".into(),
            bundler: Bundler::Webpack,
            out_dir: "fableBuild".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestsConfig {
    pub root: String,
    pub out_dir: String,
    /// npm binary running the compiled tests.
    pub runner: String,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            root: "tests".into(),
            out_dir: "fableBuild".into(),
            runner: "mocha".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    pub owner: String,
    pub repository: String,
    pub target_commitish: String,
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: "thoth-org".into(),
            repository: "Thoth.Elmish.FormBuilder".into(),
            target_commitish: "main".into(),
            api_url: "https://api.github.com".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NugetConfig {
    pub source: String,
}

impl Default for NugetConfig {
    fn default() -> Self {
        Self {
            source: "nuget.org".into(),
        }
    }
}

impl Config {
    /// Load configuration from `thoth-build.toml`, falling back to defaults
    /// when the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text =
            std::fs::read_to_string(&path).map_err(|e| io_error_with_path(e, &path))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BuildError::Config(format!("invalid {CONFIG_FILE}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.examples.root, "examples");
        assert_eq!(config.github.target_commitish, "main");
        assert_eq!(config.nuget.source, "nuget.org");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE),
            "[examples]\nbundler = \"vite\"\n\n[github]\nrepository = \"Thoth.Elmish.Toast\"\n",
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.examples.bundler, Bundler::Vite);
        assert_eq!(config.examples.out_dir, "fableBuild");
        assert_eq!(config.github.owner, "thoth-org");
        assert_eq!(config.github.repository, "Thoth.Elmish.Toast");
    }

    #[test]
    fn unreadable_file_error_names_the_path() {
        let temp = tempfile::tempdir().unwrap();
        // a directory in place of the file exists but cannot be read as text
        std::fs::create_dir(temp.path().join(CONFIG_FILE)).unwrap();

        let err = Config::load(temp.path()).unwrap_err();
        match err {
            BuildError::Io(e) => assert!(e.to_string().contains(CONFIG_FILE), "{e}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::parse("[examples]\nbundle = \"vite\"\n").unwrap_err();
        match err {
            BuildError::Config(msg) => assert!(msg.contains(CONFIG_FILE)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_bundler_is_rejected() {
        assert!(Config::parse("[examples]\nbundler = \"parcel\"\n").is_err());
    }
}
