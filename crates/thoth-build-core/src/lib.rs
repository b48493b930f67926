pub mod changelog;
pub mod config;
pub mod env;
pub mod errors;
pub mod glue;
pub mod manifest;
pub mod process;
pub mod publish;
pub mod release;
pub mod tasks;
pub mod types;

// Re-export commonly used items
pub use changelog::{Changelog, ChangelogEntry, parse_changelog, read_changelog};
pub use config::{Bundler, Config};
pub use errors::{BuildError, Result};
pub use glue::{GlueSpec, ScaffoldReport, scaffold_glue};
pub use manifest::{
    Manifest, ManifestKind, VersionField, VersionFieldError, VersionPattern, locate_version_field,
};
pub use process::{CommandSpec, ExecConfig};
pub use publish::{
    GitHubReleasePublisher, NpmPublisher, NugetPublisher, PublishPipeline, Publisher,
};
pub use release::{ReleaseConfig, run_release};
pub use tasks::{ExamplesProject, TestSuite};
pub use types::{ReleaseOutcome, VersionInfo};
