use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DossierError;

/// Top-level configuration loaded from `.dossier.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
///
/// # Examples
///
/// ```
/// use dossier_core::DossierConfig;
///
/// let config = DossierConfig::default();
/// assert_eq!(config.ingest.max_commits, 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DossierConfig {
    /// Reasoning backend settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// GitHub API settings.
    #[serde(default)]
    pub github: GithubConfig,
    /// Repository ingestion settings.
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl DossierConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::Io`] if the file cannot be read, or
    /// [`DossierError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dossier_core::DossierConfig;
    /// use std::path::Path;
    ///
    /// let config = DossierConfig::from_file(Path::new(".dossier.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, DossierError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_core::DossierConfig;
    ///
    /// let toml = r#"
    /// [ingest]
    /// max_commits = 25
    /// "#;
    /// let config = DossierConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.ingest.max_commits, 25);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, DossierError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Reasoning backend configuration.
///
/// # Examples
///
/// ```
/// use dossier_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.provider, "auto");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (`"auto"`, `"openai"`, `"anthropic"`, `"ollama"`,
    /// `"rules"`, `"mock"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier; each provider has its own default.
    pub model: Option<String>,
    /// API key for hosted providers.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "auto".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            api_key: None,
            base_url: None,
        }
    }
}

/// GitHub API configuration.
///
/// # Examples
///
/// ```
/// use dossier_core::GithubConfig;
///
/// let config = GithubConfig::default();
/// assert!(config.token.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// API token; falls back to the `GITHUB_TOKEN` env var when unset.
    pub token: Option<String>,
}

/// Repository ingestion configuration.
///
/// # Examples
///
/// ```
/// use dossier_core::IngestConfig;
///
/// let config = IngestConfig::default();
/// assert_eq!(config.max_commits, 10);
/// assert_eq!(config.content_budget, 10_000);
/// assert_eq!(config.max_file_size, 1_048_576);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum number of recent commits to read (default: 10).
    #[serde(default = "default_max_commits")]
    pub max_commits: usize,
    /// Character budget for the reasoning content digest (default: 10000).
    #[serde(default = "default_content_budget")]
    pub content_budget: usize,
    /// Maximum file size to read, in bytes (default: 1 MiB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_max_commits() -> usize {
    10
}

fn default_content_budget() -> usize {
    10_000
}

fn default_max_file_size() -> u64 {
    1_048_576
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_commits: default_max_commits(),
            content_budget: default_content_budget(),
            max_file_size: default_max_file_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = DossierConfig::default();
        assert_eq!(config.llm.provider, "auto");
        assert!(config.llm.model.is_none());
        assert!(config.llm.api_key.is_none());
        assert!(config.github.token.is_none());
        assert_eq!(config.ingest.max_commits, 10);
        assert_eq!(config.ingest.content_budget, 10_000);
        assert_eq!(config.ingest.max_file_size, 1_048_576);
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[llm]
provider = "rules"
"#;
        let config = DossierConfig::from_toml(toml).unwrap();
        assert_eq!(config.llm.provider, "rules");
        assert_eq!(config.ingest.max_commits, 10);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[llm]
provider = "anthropic"
model = "claude-3-haiku-20240307"
api_key = "sk-test"
base_url = "https://api.anthropic.com"

[github]
token = "ghp_test"

[ingest]
max_commits = 5
content_budget = 4000
max_file_size = 524288
"#;
        let config = DossierConfig::from_toml(toml).unwrap();
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.model.as_deref(), Some("claude-3-haiku-20240307"));
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(config.ingest.max_commits, 5);
        assert_eq!(config.ingest.content_budget, 4000);
        assert_eq!(config.ingest.max_file_size, 524_288);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = DossierConfig::from_toml("").unwrap();
        assert_eq!(config.llm.provider, "auto");
        assert_eq!(config.ingest.content_budget, 10_000);
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = DossierConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }
}
