use crate::errors::{BuildError, Result};

/// NuGet API key used by `dotnet nuget push`.
pub const NUGET_KEY: &str = "NUGET_KEY";

/// Token used to create GitHub releases.
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Read a required environment variable, rejecting blank values.
pub fn require_env(key: &str) -> Result<String> {
    require_env_with(key, |k| std::env::var(k).ok())
}

/// Testable version of [`require_env`] with an injected lookup.
pub fn require_env_with<F>(key: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BuildError::MissingEnv(key.to_string()))
}
