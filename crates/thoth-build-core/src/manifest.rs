//! Locating and rewriting the version field of a project manifest.
//!
//! A manifest is treated as opaque text. A [`VersionPattern`] with three
//! capture groups `(prefix)(version)(suffix)` finds the version field, and
//! only the matched span is ever rewritten.

use crate::errors::{BuildError, Result, io_error_with_path};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// `"version": "X.Y.Z",` line of a `package.json`.
pub const PACKAGE_JSON_VERSION_PATTERN: &str = r#"(^\s*"version":\s*")(.+)(",\s*$)"#;

/// `<Version>X.Y.Z</Version>` element of an MSBuild project file.
pub const MSBUILD_VERSION_PATTERN: &str = r"(^\s*<Version>)(.*)(</Version>\s*$)";

/// Compiled version-field pattern.
///
/// Always compiled multi-line and case-insensitive, and must expose exactly
/// three capture groups.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    regex: Regex,
}

impl VersionPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .multi_line(true)
            .case_insensitive(true)
            .build()
            .map_err(|e| BuildError::InvalidData(format!("invalid version pattern: {e}")))?;

        // group 0 is the whole match
        let groups = regex.captures_len() - 1;
        if groups != 3 {
            return Err(BuildError::InvalidData(format!(
                "version pattern must have exactly 3 capture groups (prefix, version, suffix), found {groups}"
            )));
        }

        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// The version field found in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionField {
    pub prefix: String,
    pub value: String,
    pub suffix: String,
    /// Byte range of the whole match in the manifest text.
    pub span: Range<usize>,
}

impl VersionField {
    /// Manifest text with this field set to `version`, every other byte untouched.
    pub fn replace_in(&self, text: &str, version: &str) -> String {
        let mut out = String::with_capacity(text.len() + version.len());
        out.push_str(&text[..self.span.start]);
        out.push_str(&self.prefix);
        out.push_str(version);
        out.push_str(&self.suffix);
        out.push_str(&text[self.span.end..]);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionFieldError {
    #[error("no version field matches the pattern")]
    NotFound,
    #[error("{0} version fields match the pattern, expected exactly one")]
    Ambiguous(usize),
}

/// Find the single version field of `text`.
pub fn locate_version_field(
    text: &str,
    pattern: &VersionPattern,
) -> std::result::Result<VersionField, VersionFieldError> {
    let mut matches = pattern.regex.captures_iter(text);
    let caps = matches.next().ok_or(VersionFieldError::NotFound)?;
    let extra = matches.count();
    if extra > 0 {
        return Err(VersionFieldError::Ambiguous(extra + 1));
    }

    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
    let whole = caps.get(0).ok_or(VersionFieldError::NotFound)?;
    Ok(VersionField {
        prefix: group(1),
        value: group(2),
        suffix: group(3),
        span: whole.range(),
    })
}

/// Manifest formats with a built-in version pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PackageJson,
    MsBuild,
}

impl ManifestKind {
    /// Guess the manifest kind from its file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".json") {
            Some(Self::PackageJson)
        } else if [".fsproj", ".csproj", ".props", ".targets"]
            .iter()
            .any(|ext| lower.ends_with(ext))
        {
            Some(Self::MsBuild)
        } else {
            None
        }
    }

    pub fn pattern_str(self) -> &'static str {
        match self {
            Self::PackageJson => PACKAGE_JSON_VERSION_PATTERN,
            Self::MsBuild => MSBUILD_VERSION_PATTERN,
        }
    }

    pub fn version_pattern(self) -> Result<VersionPattern> {
        VersionPattern::new(self.pattern_str())
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PackageJson => f.write_str("package.json"),
            Self::MsBuild => f.write_str("MSBuild project"),
        }
    }
}

/// A manifest loaded from disk, holding its original content for rollback.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    original: String,
    field: VersionField,
}

impl Manifest {
    pub fn load(path: &Path, pattern: &VersionPattern) -> Result<Self> {
        let original = std::fs::read_to_string(path).map_err(|e| io_error_with_path(e, path))?;
        let field = locate_version_field(&original, pattern).map_err(|e| match e {
            VersionFieldError::NotFound => BuildError::MissingVersionTag(format!(
                "{} (pattern: {})",
                path.display(),
                pattern.as_str()
            )),
            VersionFieldError::Ambiguous(_) => {
                BuildError::InvalidData(format!("{}: {}", path.display(), e))
            }
        })?;
        debug!(path = %path.display(), version = %field.value, "Located version field");
        Ok(Self {
            path: path.to_path_buf(),
            original,
            field,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Version currently written in the manifest.
    pub fn current_version(&self) -> &str {
        &self.field.value
    }

    /// Content of the manifest with its version set to `version`.
    pub fn bumped_content(&self, version: &str) -> String {
        self.field.replace_in(&self.original, version)
    }

    pub fn write_version(&self, version: &str) -> Result<()> {
        info!(path = %self.path.display(), "Setting version {} (was {})", version, self.field.value);
        std::fs::write(&self.path, self.bumped_content(version))
            .map_err(|e| io_error_with_path(e, &self.path).into())
    }

    /// Write the content captured at load time back to disk.
    pub fn restore(&self) -> Result<()> {
        info!(path = %self.path.display(), "Reverting changes made to the manifest");
        std::fs::write(&self.path, &self.original)
            .map_err(|e| io_error_with_path(e, &self.path).into())
    }
}
