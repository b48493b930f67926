use std::io;
use std::path::Path;

/// Canonical result type for thoth-build code
pub type Result<T> = std::result::Result<T, BuildError>;

/// Common error type for build and release operations
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed CHANGELOG.md file: {0}")]
    MalformedChangelog(String),

    #[error("Missing version tag in {0}")]
    MissingVersionTag(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable {0}")]
    MissingEnv(String),

    #[error("Command `{command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("GitHub error: {0}")]
    GitHub(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Helper to create an IO error with file path context
pub fn io_error_with_path<P: AsRef<Path>>(error: io::Error, path: P) -> io::Error {
    io::Error::new(
        error.kind(),
        format!("{}: {}", path.as_ref().display(), error),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_with_path_keeps_kind_and_prefixes_path() {
        let err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let wrapped = io_error_with_path(err, "some/CHANGELOG.md");
        assert_eq!(wrapped.kind(), io::ErrorKind::NotFound);
        assert_eq!(wrapped.to_string(), "some/CHANGELOG.md: no such file");
    }

    #[test]
    fn malformed_changelog_message_mentions_file() {
        let err = BuildError::MalformedChangelog("first version should be 'Unreleased'".into());
        assert!(err.to_string().starts_with("Malformed CHANGELOG.md file"));
    }
}
