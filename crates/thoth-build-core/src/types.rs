use std::fmt;

/// Version pending publication, taken from the changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: String,
    /// Markdown body of the changelog entry, used as release notes.
    pub body: String,
}

impl VersionInfo {
    /// A version carrying a pre-release suffix, e.g. `1.0.0-beta-001`.
    pub fn is_prerelease(&self) -> bool {
        self.version.contains('-')
    }
}

/// Result of a successful release run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The manifest already carries the changelog version; nothing was written.
    AlreadyPublished { version: String },
    /// The manifest was bumped and the publish action succeeded.
    Published { previous: String, version: String },
}

impl fmt::Display for ReleaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyPublished { version } => {
                write!(f, "version {version} has already been published")
            }
            Self::Published { previous, version } => {
                write!(f, "published version {version} (previously {previous})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prerelease_detection_uses_dash() {
        let stable = VersionInfo {
            version: "1.0.0".into(),
            body: String::new(),
        };
        let beta = VersionInfo {
            version: "1.0.0-beta-001".into(),
            body: String::new(),
        };
        assert!(!stable.is_prerelease());
        assert!(beta.is_prerelease());
    }
}
