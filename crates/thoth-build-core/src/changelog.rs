//! Parsing of "Keep a Changelog" style markdown files.
//!
//! Every `## ` heading opens a version entry. The text before the first entry
//! (the `# Changelog` title and its description) is kept separately.

use crate::errors::{BuildError, Result, io_error_with_path};
use crate::types::VersionInfo;
use chrono::NaiveDate;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// File name of the changelog looked up in a release directory.
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Title of the placeholder entry collecting not-yet-versioned changes.
pub const UNRELEASED: &str = "Unreleased";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    /// Heading text as written, e.g. `Unreleased` or `[1.2.0] - 2024-03-01`.
    pub title: String,
    /// First semver version found in the title.
    pub version: Option<String>,
    pub date: Option<NaiveDate>,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    pub title: Option<String>,
    pub description: String,
    pub entries: Vec<ChangelogEntry>,
}

impl Changelog {
    /// The finished version waiting to be published.
    ///
    /// Requires the `Unreleased` entry first, followed by an entry whose title
    /// is a semver version.
    pub fn pending_release(&self) -> Result<VersionInfo> {
        if self.entries.len() < 2 {
            return Err(BuildError::MalformedChangelog(
                "no version to publish, expected an 'Unreleased' entry followed by a released version"
                    .into(),
            ));
        }

        let unreleased = &self.entries[0];
        if unreleased.title != UNRELEASED {
            return Err(BuildError::MalformedChangelog(format!(
                "the first version should be '{}', found '{}'",
                UNRELEASED, unreleased.title
            )));
        }

        let entry = &self.entries[1];
        let version = entry.version.clone().ok_or_else(|| {
            BuildError::MalformedChangelog(format!(
                "please verify the last version format, '{}' is not SEMVER compliant",
                entry.title
            ))
        })?;

        Ok(VersionInfo {
            version,
            body: entry.body.clone(),
        })
    }
}

/// Collapse CRLF line endings into LF.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Read and parse a changelog file.
pub fn read_changelog(path: &Path) -> Result<Changelog> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error_with_path(e, path))?;
    Ok(parse_changelog(&text))
}

/// Parse changelog markdown into its ordered entries.
pub fn parse_changelog(text: &str) -> Changelog {
    let text = normalize_line_endings(text);
    let mut changelog = Changelog::default();
    let mut preamble: Vec<&str> = Vec::new();
    let mut current: Option<(ChangelogEntry, Vec<&str>)> = None;
    let mut in_fence = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }

        if !in_fence && let Some(heading) = line.strip_prefix("## ") {
            if let Some((entry, body)) = current.take() {
                changelog.entries.push(finish_entry(entry, &body));
            }
            current = Some((parse_heading(heading), Vec::new()));
            continue;
        }

        match current.as_mut() {
            Some((_, body)) => {
                if !is_link_definition(line) {
                    body.push(line);
                }
            }
            None => {
                if changelog.title.is_none()
                    && let Some(title) = line.strip_prefix("# ")
                {
                    changelog.title = Some(title.trim().to_string());
                } else {
                    preamble.push(line);
                }
            }
        }
    }

    if let Some((entry, body)) = current.take() {
        changelog.entries.push(finish_entry(entry, &body));
    }
    changelog.description = preamble.join("\n").trim().to_string();
    changelog
}

fn finish_entry(mut entry: ChangelogEntry, body: &[&str]) -> ChangelogEntry {
    entry.body = body.join("\n").trim().to_string();
    entry
}

fn parse_heading(heading: &str) -> ChangelogEntry {
    let title = heading.trim();

    let found = version_regex().captures(title).and_then(|caps| caps.get(1));
    let version = found
        .map(|m| m.as_str())
        .filter(|v| semver::Version::parse(v).is_ok())
        .map(str::to_string);

    // a date is looked up after the version so prerelease tags cannot match
    let rest = &title[found.map_or(0, |m| m.end())..];
    let date = date_regex()
        .find(rest)
        .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());

    ChangelogEntry {
        title: title.to_string(),
        version,
        date,
        body: String::new(),
    }
}

fn is_link_definition(line: &str) -> bool {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(r"^\[[^\]]+\]:\s*\S+").expect("valid link regex"))
        .is_match(line)
}

/// First semver-looking token of a heading, with an optional leading `v`.
fn version_regex() -> &'static Regex {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    VERSION.get_or_init(|| {
        Regex::new(concat!(
            r"(?:^|[^0-9A-Za-z.])v?",
            r"(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]*[0-9A-Za-z])?(?:\+[0-9A-Za-z.-]*[0-9A-Za-z])?)"
        ))
        .expect("valid version regex")
    })
}

fn date_regex() -> &'static Regex {
    static DATE: OnceLock<Regex> = OnceLock::new();
    DATE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid date regex"))
}
