//! GitHub profile analysis.
//!
//! Fetches a user's profile and full repository list from the GitHub REST
//! API, aggregates per-repository statistics, and scores the result. Any
//! failure (unknown user, network error, bad payload) is logged and reported
//! as "no analysis", never as an error to the caller.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod score;

pub use score::ScoreBreakdown;

const GITHUB_API_URL: &str = "https://api.github.com";
const REPOS_PER_PAGE: usize = 100;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("user not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Basic profile attributes from `GET /users/{username}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInfo {
    #[serde(rename = "login")]
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub blog: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
}

/// One repository as returned by `GET /users/{username}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoData {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub html_url: String,
}

/// A high-star repository surfaced in the analysis output.
#[derive(Debug, Clone, Serialize)]
pub struct TopRepo {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub url: String,
}

/// Aggregated repository statistics for one user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoSummary {
    pub total_repos: usize,
    /// Primary language → number of repositories using it. Repositories with
    /// no declared language are excluded here but still count toward totals.
    pub languages: BTreeMap<String, u32>,
    pub total_stars: u64,
    pub total_forks: u64,
    pub top_repos: Vec<TopRepo>,
}

/// Full analysis of one GitHub profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileAnalysis {
    pub profile: ProfileInfo,
    pub repositories: RepoSummary,
    pub score: ScoreBreakdown,
}

/// Thin client over the GitHub REST API. A token is optional; without one the
/// same requests run unauthenticated at lower rate limits.
pub struct GithubClient {
    http: Client,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("screener/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        if config.github_token.is_some() {
            info!("using authenticated GitHub API");
        } else {
            info!("using unauthenticated GitHub API (lower rate limits)");
        }

        Self {
            http,
            token: config.github_token.clone(),
        }
    }

    /// Analyzes a profile end to end. Returns `None` when the user does not
    /// exist or any part of the fetch fails.
    pub async fn analyze(&self, username: &str) -> Option<ProfileAnalysis> {
        match self.analyze_inner(username).await {
            Ok(analysis) => Some(analysis),
            Err(GithubError::NotFound(user)) => {
                warn!("GitHub user not found: {user}");
                None
            }
            Err(e) => {
                warn!("GitHub analysis for '{username}' failed: {e}");
                None
            }
        }
    }

    async fn analyze_inner(&self, username: &str) -> Result<ProfileAnalysis, GithubError> {
        let profile = self.fetch_user(username).await?;
        let repos = self.fetch_repos(username).await?;
        debug!(
            "fetched {} repos for {username} ({} followers)",
            repos.len(),
            profile.followers
        );

        let repositories = summarize_repos(&repos);
        let score = score::compute(&profile, &repositories);

        Ok(ProfileAnalysis {
            profile,
            repositories,
            score,
        })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .http
            .get(url)
            .header("accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_user(&self, username: &str) -> Result<ProfileInfo, GithubError> {
        let url = format!("{GITHUB_API_URL}/users/{username}");
        let response = self.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GithubError::NotFound(username.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GithubError::Api { status, message });
        }

        Ok(response.json().await?)
    }

    /// Fetches the complete repository list, following pagination until a
    /// short page signals the end.
    async fn fetch_repos(&self, username: &str) -> Result<Vec<RepoData>, GithubError> {
        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{GITHUB_API_URL}/users/{username}/repos?per_page={REPOS_PER_PAGE}&page={page}"
            );
            let response = self.get(&url).send().await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let message = response.text().await.unwrap_or_default();
                return Err(GithubError::Api { status, message });
            }

            let batch: Vec<RepoData> = response.json().await?;
            let done = batch.len() < REPOS_PER_PAGE;
            repos.extend(batch);
            if done {
                return Ok(repos);
            }
            page += 1;
        }
    }
}

/// Aggregates raw repository rows into the summary used for scoring.
pub fn summarize_repos(repos: &[RepoData]) -> RepoSummary {
    let mut summary = RepoSummary {
        total_repos: repos.len(),
        ..RepoSummary::default()
    };

    for repo in repos {
        if let Some(language) = &repo.language {
            *summary.languages.entry(language.clone()).or_insert(0) += 1;
        }
        summary.total_stars += repo.stargazers_count;
        summary.total_forks += repo.forks_count;
    }

    // Stable sort: equal-star repositories keep their API ordering.
    let mut by_stars: Vec<&RepoData> = repos.iter().collect();
    by_stars.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    summary.top_repos = by_stars
        .into_iter()
        .take(5)
        .map(|repo| TopRepo {
            name: repo.name.clone(),
            description: repo.description.clone(),
            language: repo.language.clone(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            url: repo.html_url.clone(),
        })
        .collect();

    summary
}
