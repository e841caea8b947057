//! Repository URL validation and display helpers.

use std::sync::OnceLock;

use regex_lite::Regex;
use reqwest::Url;

use crate::errors::AppError;

/// Owner and name parsed from a validated repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

fn repo_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://(?:www\.)?github\.com/([\w-]+)/([\w.-]+)/?$")
            .expect("repository URL pattern is valid")
    })
}

/// Checks `url` against the permissive `https://github.com/<owner>/<name>` pattern.
pub fn validate_repo_url(url: &str) -> Result<RepoRef, AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::Validation(
            "Please enter a GitHub repository URL".to_string(),
        ));
    }

    let caps = repo_url_regex().captures(url).ok_or_else(|| {
        AppError::Validation(
            "Please enter a valid GitHub repository URL (e.g., https://github.com/username/repo)"
                .to_string(),
        )
    })?;

    Ok(RepoRef {
        owner: caps[1].to_string(),
        name: caps[2].to_string(),
    })
}

/// "owner/name" for display. Falls back to the input when it is not a URL
/// with at least two path segments.
pub fn short_repo_name(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let parts: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if parts.len() >= 2 {
        format!("{}/{}", parts[0], parts[1])
    } else {
        url.to_string()
    }
}
