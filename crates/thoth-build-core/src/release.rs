use crate::changelog::{CHANGELOG_FILE, read_changelog};
use crate::errors::{BuildError, Result};
use crate::manifest::{Manifest, ManifestKind, VersionPattern};
use crate::publish::Publisher;
use crate::types::ReleaseOutcome;
use std::path::PathBuf;
use tracing::{error, info};

/// What to release and where its version lives.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Directory holding `CHANGELOG.md` and the manifest.
    pub base_directory: PathBuf,
    /// Manifest file name, relative to `base_directory`.
    pub project_file_name: String,
    pub version_pattern: VersionPattern,
}

impl ReleaseConfig {
    pub fn new(
        base_directory: impl Into<PathBuf>,
        project_file_name: impl Into<String>,
        version_pattern: VersionPattern,
    ) -> Self {
        Self {
            base_directory: base_directory.into(),
            project_file_name: project_file_name.into(),
            version_pattern,
        }
    }

    /// Configuration for one of the built-in manifest formats.
    pub fn for_kind(
        base_directory: impl Into<PathBuf>,
        project_file_name: impl Into<String>,
        kind: ManifestKind,
    ) -> Result<Self> {
        Ok(Self::new(
            base_directory,
            project_file_name,
            kind.version_pattern()?,
        ))
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.base_directory.join(CHANGELOG_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.base_directory.join(&self.project_file_name)
    }
}

/// Publish the version pending in the changelog.
///
/// The manifest is bumped on disk before `publisher` runs, since packaging
/// tools read the version from it. When the publisher fails, the content
/// read before the bump is written back. Side effects of the publisher
/// itself (an uploaded package, a created release) are not undone.
///
/// # Examples
/// ```no_run
/// use thoth_build_core::manifest::ManifestKind;
/// use thoth_build_core::release::{ReleaseConfig, run_release};
/// use thoth_build_core::types::VersionInfo;
///
/// let config = ReleaseConfig::for_kind("packages/form", "package.json", ManifestKind::PackageJson).unwrap();
/// let outcome = run_release(&config, &|info: &VersionInfo| -> thoth_build_core::Result<()> {
///     println!("publishing {}", info.version);
///     Ok(())
/// })
/// .unwrap();
/// println!("{outcome}");
/// ```
pub fn run_release(config: &ReleaseConfig, publisher: &dyn Publisher) -> Result<ReleaseOutcome> {
    let changelog = read_changelog(&config.changelog_path())?;
    let version_info = changelog.pending_release()?;

    let manifest = Manifest::load(&config.manifest_path(), &config.version_pattern)?;
    let previous = manifest.current_version().to_string();

    if previous == version_info.version {
        info!("Last version has already been published. Skipping...");
        return Ok(ReleaseOutcome::AlreadyPublished {
            version: previous,
        });
    }

    info!(
        "New version detected ({} -> {}), starting publishing",
        previous, version_info.version
    );
    manifest.write_version(&version_info.version)?;

    if let Err(err) = publisher.publish(&version_info) {
        error!("Something went wrong while publishing: {}", err);
        rollback(&manifest);
        return Err(into_publish_error(err));
    }

    info!("Version {} published successfully", version_info.version);
    Ok(ReleaseOutcome::Published {
        previous,
        version: version_info.version,
    })
}

fn rollback(manifest: &Manifest) {
    match manifest.restore() {
        Ok(()) => info!("Revert done"),
        Err(e) => error!("Failed to revert {}: {}", manifest.path().display(), e),
    }
}

fn into_publish_error(err: BuildError) -> BuildError {
    match err {
        BuildError::Publish(message) => BuildError::Publish(message),
        other => BuildError::Publish(other.to_string()),
    }
}
