use std::collections::BTreeMap;
use std::time::Duration;

use dossier_core::DossierError;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::metrics::{Contributor, LanguageStats, Repo, RepoMetrics};

const API_BASE: &str = "https://api.github.com";
const CONTRIBUTOR_LIMIT: u32 = 30;
const USER_AGENT: &str = concat!("dossier/", env!("CARGO_PKG_VERSION"));

/// Parse a GitHub URL into `(owner, repo)`.
///
/// Accepts `https://github.com/owner/repo`, trailing `.git`, trailing slash,
/// and the `git@github.com:owner/repo.git` SSH form.
///
/// # Errors
///
/// Returns [`DossierError::GitHub`] if no pattern matches.
///
/// # Examples
///
/// ```
/// use dossier_github::client::parse_github_url;
///
/// let (owner, repo) = parse_github_url("https://github.com/rust-lang/cargo").unwrap();
/// assert_eq!(owner, "rust-lang");
/// assert_eq!(repo, "cargo");
///
/// let (owner, repo) = parse_github_url("git@github.com:serde-rs/serde.git").unwrap();
/// assert_eq!(owner, "serde-rs");
/// assert_eq!(repo, "serde");
/// ```
pub fn parse_github_url(url: &str) -> Result<(String, String), DossierError> {
    let patterns = [
        r"github\.com[:/]([^/\s]+)/([^/\s]+?)(?:\.git)?/?$",
        r"github\.com/([^/\s]+)/([^/\s]+)",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("static pattern");
        if let Some(caps) = re.captures(url) {
            return Ok((caps[1].to_string(), caps[2].to_string()));
        }
    }

    Err(DossierError::GitHub(format!(
        "invalid GitHub URL format: {url}"
    )))
}

/// Returns `true` if `source` looks like a GitHub URL rather than a local path.
///
/// # Examples
///
/// ```
/// use dossier_github::client::is_github_url;
///
/// assert!(is_github_url("https://github.com/owner/repo"));
/// assert!(!is_github_url("./my-project"));
/// ```
pub fn is_github_url(source: &str) -> bool {
    source.to_lowercase().contains("github.com")
}

/// GitHub API rate-limit status for the core resource.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimit {
    /// Requests allowed per window.
    pub limit: u64,
    /// Requests remaining in the current window.
    pub remaining: u64,
    /// Unix timestamp when the window resets.
    pub reset: u64,
}

#[derive(Deserialize)]
struct RateLimitResponse {
    rate: RateLimit,
}

/// GitHub REST client for repository metadata.
///
/// Sends a bearer token when one is configured. Contributor and language
/// fetches degrade to empty results on failure; the core repository fetch
/// propagates errors.
pub struct GithubClient {
    http: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GithubClient {
    /// Create a client with an optional API token.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::GitHub`] if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_github::client::GithubClient;
    ///
    /// let client = GithubClient::new(None).unwrap();
    /// ```
    pub fn new(token: Option<String>) -> Result<Self, DossierError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DossierError::GitHub(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            token,
            base_url: API_BASE.to_string(),
        })
    }

    /// Override the API base URL. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
    }

    /// Fetch repository attributes.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::GitHub`] on network failure, non-success
    /// status, or an unexpected response body.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repo, DossierError> {
        let url = format!("{}/repos/{owner}/{repo}", self.base_url);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| DossierError::GitHub(format!("failed to fetch {owner}/{repo}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DossierError::GitHub(format!(
                "GitHub API error {status}: {body}"
            )));
        }

        response
            .json::<Repo>()
            .await
            .map_err(|e| DossierError::GitHub(format!("failed to parse repository: {e}")))
    }

    /// Fetch up to 30 contributors, newest request first.
    ///
    /// Failures degrade to an empty list and are logged.
    pub async fn get_contributors(&self, owner: &str, repo: &str) -> Vec<Contributor> {
        let url = format!(
            "{}/repos/{owner}/{repo}/contributors?per_page={CONTRIBUTOR_LIMIT}",
            self.base_url
        );
        let response = match self.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("failed to fetch contributors for {owner}/{repo}: {e}");
                return Vec::new();
            }
        };
        if !response.status().is_success() {
            warn!(
                "contributor fetch for {owner}/{repo} returned {}",
                response.status()
            );
            return Vec::new();
        }
        match response.json::<Vec<Contributor>>().await {
            Ok(contributors) => contributors,
            Err(e) => {
                warn!("failed to parse contributors for {owner}/{repo}: {e}");
                Vec::new()
            }
        }
    }

    /// Fetch the per-language byte histogram.
    ///
    /// Failures degrade to empty stats and are logged.
    pub async fn get_language_stats(&self, owner: &str, repo: &str) -> LanguageStats {
        let url = format!("{}/repos/{owner}/{repo}/languages", self.base_url);
        let response = match self.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("failed to fetch language stats for {owner}/{repo}: {e}");
                return LanguageStats::default();
            }
        };
        if !response.status().is_success() {
            warn!(
                "language fetch for {owner}/{repo} returned {}",
                response.status()
            );
            return LanguageStats::default();
        }
        match response.json::<BTreeMap<String, u64>>().await {
            Ok(languages) => LanguageStats::new(languages),
            Err(e) => {
                warn!("failed to parse language stats for {owner}/{repo}: {e}");
                LanguageStats::default()
            }
        }
    }

    /// Fetch the aggregated metrics for a repository URL.
    ///
    /// The repository fetch is a hard error; contributors and languages
    /// degrade gracefully.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::GitHub`] if the URL cannot be parsed or the
    /// repository attributes cannot be fetched.
    pub async fn fetch_metrics(&self, github_url: &str) -> Result<RepoMetrics, DossierError> {
        let (owner, repo) = parse_github_url(github_url)?;
        debug!("fetching GitHub metrics for {owner}/{repo}");

        let repository = self.get_repository(&owner, &repo).await?;
        let contributors = self.get_contributors(&owner, &repo).await;
        let language_stats = self.get_language_stats(&owner, &repo).await;

        Ok(RepoMetrics {
            repository,
            contributors,
            language_stats,
            clone_url: format!("https://github.com/{owner}/{repo}.git"),
        })
    }

    /// Check the current API rate-limit status.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::GitHub`] on network or parse failure.
    pub async fn check_rate_limit(&self) -> Result<RateLimit, DossierError> {
        let url = format!("{}/rate_limit", self.base_url);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| DossierError::GitHub(format!("failed to check rate limit: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DossierError::GitHub(format!(
                "GitHub API error {status} checking rate limit"
            )));
        }

        response
            .json::<RateLimitResponse>()
            .await
            .map(|r| r.rate)
            .map_err(|e| DossierError::GitHub(format!("failed to parse rate limit: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_https_url() {
        let (owner, repo) = parse_github_url("https://github.com/rust-lang/cargo").unwrap();
        assert_eq!(owner, "rust-lang");
        assert_eq!(repo, "cargo");
    }

    #[test]
    fn parse_url_with_git_suffix_and_slash() {
        let (owner, repo) = parse_github_url("https://github.com/serde-rs/serde.git").unwrap();
        assert_eq!(owner, "serde-rs");
        assert_eq!(repo, "serde");

        let (owner, repo) = parse_github_url("https://github.com/serde-rs/serde/").unwrap();
        assert_eq!(owner, "serde-rs");
        assert_eq!(repo, "serde");
    }

    #[test]
    fn parse_ssh_url() {
        let (owner, repo) = parse_github_url("git@github.com:tokio-rs/tokio.git").unwrap();
        assert_eq!(owner, "tokio-rs");
        assert_eq!(repo, "tokio");
    }

    #[test]
    fn parse_rejects_non_github_url() {
        assert!(parse_github_url("https://gitlab.com/owner/repo").is_err());
        assert!(parse_github_url("not a url").is_err());
    }

    #[test]
    fn is_github_url_matches_case_insensitively() {
        assert!(is_github_url("https://GitHub.com/owner/repo"));
        assert!(!is_github_url("/home/me/project"));
    }

    #[tokio::test]
    async fn contributor_fetch_degrades_on_network_error() {
        // Port 1 is unroutable; the fetch must degrade rather than error.
        let client = GithubClient::new(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let contributors = client.get_contributors("owner", "repo").await;
        assert!(contributors.is_empty());
    }

    #[tokio::test]
    async fn language_fetch_degrades_on_network_error() {
        let client = GithubClient::new(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let stats = client.get_language_stats("owner", "repo").await;
        assert!(stats.languages.is_empty());
        assert_eq!(stats.total_bytes, 0);
    }

    #[tokio::test]
    async fn repository_fetch_propagates_network_error() {
        let client = GithubClient::new(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let result = client.get_repository("owner", "repo").await;
        assert!(result.is_err());
    }
}
