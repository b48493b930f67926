use super::Publisher;
use crate::config::GitHubConfig;
use crate::errors::{BuildError, Result};
use crate::types::VersionInfo;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

const USER_AGENT: &str = concat!("thoth-build/", env!("CARGO_PKG_VERSION"));

/// Body of `POST /repos/{owner}/{repo}/releases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReleaseRequest<'a> {
    pub tag_name: &'a str,
    pub target_commitish: &'a str,
    pub name: &'a str,
    pub body: &'a str,
    pub prerelease: bool,
}

/// Creates a GitHub release named and tagged after the published version.
#[derive(Debug, Clone)]
pub struct GitHubReleasePublisher {
    config: GitHubConfig,
    token: String,
}

impl GitHubReleasePublisher {
    pub fn new(config: &GitHubConfig, token: String) -> Self {
        Self {
            config: config.clone(),
            token,
        }
    }

    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repository
        )
    }

    pub fn request<'a>(&'a self, info: &'a VersionInfo) -> CreateReleaseRequest<'a> {
        CreateReleaseRequest {
            tag_name: &info.version,
            target_commitish: &self.config.target_commitish,
            name: &info.version,
            body: &info.body,
            prerelease: info.is_prerelease(),
        }
    }
}

impl Publisher for GitHubReleasePublisher {
    fn publish(&self, info: &VersionInfo) -> Result<()> {
        let url = self.releases_url();
        info!("Creating GitHub release {} on {}", info.version, url);

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", USER_AGENT)
            .timeout(Duration::from_secs(30))
            .json(&self.request(info))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let snippet: String = body.chars().take(300).collect();
            return Err(BuildError::GitHub(format!(
                "failed to create release {} ({}): {}",
                info.version, status, snippet
            )));
        }

        info!("GitHub release {} created", info.version);
        Ok(())
    }
}
