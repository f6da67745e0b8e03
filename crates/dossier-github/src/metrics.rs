use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Repository attributes fetched from the GitHub repos endpoint.
///
/// # Examples
///
/// ```
/// use dossier_github::metrics::Repo;
///
/// let json = r#"{
///     "name": "dossier",
///     "full_name": "dossier-dev/dossier",
///     "description": null,
///     "stargazers_count": 12,
///     "forks_count": 3,
///     "open_issues_count": 1,
///     "language": "Rust",
///     "topics": [],
///     "created_at": "2024-01-01T00:00:00Z",
///     "updated_at": "2024-06-01T00:00:00Z",
///     "pushed_at": "2024-06-01T00:00:00Z",
///     "size": 420,
///     "default_branch": "main",
///     "license": {"name": "MIT License"},
///     "has_wiki": true,
///     "has_pages": false,
///     "has_projects": false,
///     "archived": false,
///     "disabled": false
/// }"#;
/// let repo: Repo = serde_json::from_str(json).unwrap();
/// assert_eq!(repo.stars, 12);
/// assert_eq!(repo.license.as_deref(), Some("MIT License"));
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    /// Repository name.
    pub name: String,
    /// `owner/name` slug.
    pub full_name: String,
    /// Short description, if set.
    pub description: Option<String>,
    /// Star count.
    #[serde(rename = "stargazers_count")]
    pub stars: u64,
    /// Fork count.
    #[serde(rename = "forks_count")]
    pub forks: u64,
    /// Open issue count.
    #[serde(rename = "open_issues_count")]
    pub open_issues: u64,
    /// Primary language as reported by GitHub.
    pub language: Option<String>,
    /// Repository topics.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last metadata update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Last push timestamp.
    pub pushed_at: DateTime<Utc>,
    /// Repository size in KiB.
    pub size: u64,
    /// Default branch name.
    pub default_branch: String,
    /// SPDX-ish license name, if any.
    #[serde(deserialize_with = "license_name", default)]
    pub license: Option<String>,
    /// Wiki enabled.
    pub has_wiki: bool,
    /// GitHub Pages enabled.
    pub has_pages: bool,
    /// Projects enabled.
    pub has_projects: bool,
    /// Repository archived.
    pub archived: bool,
    /// Repository disabled.
    pub disabled: bool,
}

fn license_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct License {
        name: String,
    }
    let license: Option<License> = Option::deserialize(deserializer)?;
    Ok(license.map(|l| l.name))
}

/// A repository contributor.
///
/// # Examples
///
/// ```
/// use dossier_github::metrics::Contributor;
///
/// let c: Contributor =
///     serde_json::from_str(r#"{"login":"alice","contributions":42,"type":"User"}"#).unwrap();
/// assert_eq!(c.contributions, 42);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Contributor {
    /// GitHub login.
    pub login: String,
    /// Number of contributions.
    pub contributions: u64,
    /// `User` or `Bot`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Per-language byte counts from the languages endpoint.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use dossier_github::metrics::LanguageStats;
///
/// let stats = LanguageStats::new(BTreeMap::from([("Rust".to_string(), 900_u64)]));
/// assert_eq!(stats.total_bytes, 900);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LanguageStats {
    /// Language name to byte count.
    pub languages: BTreeMap<String, u64>,
    /// Sum of all byte counts.
    pub total_bytes: u64,
}

impl LanguageStats {
    /// Build stats from a language-to-bytes map, computing the total.
    pub fn new(languages: BTreeMap<String, u64>) -> Self {
        let total_bytes = languages.values().sum();
        Self {
            languages,
            total_bytes,
        }
    }
}

/// Remote-activity bucket derived from days since the last push.
///
/// # Examples
///
/// ```
/// use dossier_github::metrics::ActivityTier;
///
/// assert_eq!(ActivityTier::VeryActive.to_string(), "very_active");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityTier {
    /// Pushed within the last 7 days.
    VeryActive,
    /// Pushed within the last 30 days.
    Active,
    /// Pushed within the last 90 days.
    Moderate,
    /// No push for 90+ days.
    Inactive,
}

impl fmt::Display for ActivityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityTier::VeryActive => "very_active",
            ActivityTier::Active => "active",
            ActivityTier::Moderate => "moderate",
            ActivityTier::Inactive => "inactive",
        };
        write!(f, "{s}")
    }
}

/// Maturity indicators derived from repository attributes.
#[derive(Debug, Clone)]
pub struct MaturityIndicators {
    /// A license is declared.
    pub has_license: bool,
    /// The wiki is enabled.
    pub has_wiki: bool,
    /// GitHub Pages is enabled.
    pub has_pages: bool,
    /// More than one contributor.
    pub multiple_contributors: bool,
    /// Repository is older than 90 days.
    pub established: bool,
    /// More than 10 stars.
    pub popular: bool,
}

/// Aggregated GitHub metrics for one repository.
///
/// The derived scores take an explicit `now` so they stay pure and testable.
#[derive(Debug, Clone)]
pub struct RepoMetrics {
    /// Repository attributes.
    pub repository: Repo,
    /// Contributor list (capped at 30 by the client).
    pub contributors: Vec<Contributor>,
    /// Per-language byte counts.
    pub language_stats: LanguageStats,
    /// HTTPS clone URL.
    pub clone_url: String,
}

impl RepoMetrics {
    /// Popularity score: `stars * 1.0 + forks * 0.5 + contributors * 0.3`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::collections::BTreeMap;
    /// # use chrono::Utc;
    /// # use dossier_github::metrics::{Contributor, LanguageStats, Repo, RepoMetrics};
    /// # fn sample(stars: u64, forks: u64, contributors: usize) -> RepoMetrics {
    /// #     let now = Utc::now();
    /// #     RepoMetrics {
    /// #         repository: Repo {
    /// #             name: "x".into(), full_name: "o/x".into(), description: None,
    /// #             stars, forks, open_issues: 0, language: None, topics: vec![],
    /// #             created_at: now, updated_at: now, pushed_at: now, size: 0,
    /// #             default_branch: "main".into(), license: None, has_wiki: false,
    /// #             has_pages: false, has_projects: false, archived: false, disabled: false,
    /// #         },
    /// #         contributors: (0..contributors).map(|i| Contributor {
    /// #             login: format!("u{i}"), contributions: 1, kind: "User".into(),
    /// #         }).collect(),
    /// #         language_stats: LanguageStats::new(BTreeMap::new()),
    /// #         clone_url: "https://github.com/o/x.git".into(),
    /// #     }
    /// # }
    /// let metrics = sample(100, 20, 3);
    /// assert!((metrics.popularity_score() - 110.9).abs() < f64::EPSILON);
    /// ```
    pub fn popularity_score(&self) -> f64 {
        self.repository.stars as f64 * 1.0
            + self.repository.forks as f64 * 0.5
            + self.contributors.len() as f64 * 0.3
    }

    /// Activity tier from days between `now` and the last push.
    pub fn activity_tier(&self, now: DateTime<Utc>) -> ActivityTier {
        let days = (now - self.repository.pushed_at).num_days();
        if days <= 7 {
            ActivityTier::VeryActive
        } else if days <= 30 {
            ActivityTier::Active
        } else if days <= 90 {
            ActivityTier::Moderate
        } else {
            ActivityTier::Inactive
        }
    }

    /// Maturity indicators derived from attributes and contributor count.
    pub fn maturity_indicators(&self, now: DateTime<Utc>) -> MaturityIndicators {
        MaturityIndicators {
            has_license: self.repository.license.is_some(),
            has_wiki: self.repository.has_wiki,
            has_pages: self.repository.has_pages,
            multiple_contributors: self.contributors.len() > 1,
            established: (now - self.repository.created_at).num_days() > 90,
            popular: self.repository.stars > 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_metrics(stars: u64, forks: u64, contributors: usize) -> RepoMetrics {
        let now = Utc::now();
        RepoMetrics {
            repository: Repo {
                name: "sample".into(),
                full_name: "owner/sample".into(),
                description: Some("a sample".into()),
                stars,
                forks,
                open_issues: 2,
                language: Some("Rust".into()),
                topics: vec!["tooling".into()],
                created_at: now - Duration::days(400),
                updated_at: now,
                pushed_at: now,
                size: 100,
                default_branch: "main".into(),
                license: Some("MIT License".into()),
                has_wiki: true,
                has_pages: false,
                has_projects: false,
                archived: false,
                disabled: false,
            },
            contributors: (0..contributors)
                .map(|i| Contributor {
                    login: format!("user{i}"),
                    contributions: 10,
                    kind: "User".into(),
                })
                .collect(),
            language_stats: LanguageStats::new(BTreeMap::from([("Rust".to_string(), 1000)])),
            clone_url: "https://github.com/owner/sample.git".into(),
        }
    }

    #[test]
    fn popularity_score_formula() {
        let metrics = sample_metrics(100, 20, 3);
        assert!((metrics.popularity_score() - 110.9).abs() < f64::EPSILON);
    }

    #[test]
    fn popularity_score_zero_repo() {
        let metrics = sample_metrics(0, 0, 0);
        assert_eq!(metrics.popularity_score(), 0.0);
    }

    #[test]
    fn activity_tier_buckets() {
        let now = Utc::now();
        let mut metrics = sample_metrics(1, 0, 1);

        metrics.repository.pushed_at = now - Duration::days(1);
        assert_eq!(metrics.activity_tier(now), ActivityTier::VeryActive);

        metrics.repository.pushed_at = now - Duration::days(20);
        assert_eq!(metrics.activity_tier(now), ActivityTier::Active);

        metrics.repository.pushed_at = now - Duration::days(40);
        assert_eq!(metrics.activity_tier(now), ActivityTier::Moderate);

        metrics.repository.pushed_at = now - Duration::days(120);
        assert_eq!(metrics.activity_tier(now), ActivityTier::Inactive);
    }

    #[test]
    fn maturity_indicators_reflect_attributes() {
        let now = Utc::now();
        let metrics = sample_metrics(15, 2, 3);
        let indicators = metrics.maturity_indicators(now);
        assert!(indicators.has_license);
        assert!(indicators.has_wiki);
        assert!(!indicators.has_pages);
        assert!(indicators.multiple_contributors);
        assert!(indicators.established);
        assert!(indicators.popular);

        let fresh = sample_metrics(1, 0, 1);
        let mut repo = fresh.clone();
        repo.repository.created_at = now - Duration::days(5);
        repo.repository.license = None;
        let indicators = repo.maturity_indicators(now);
        assert!(!indicators.has_license);
        assert!(!indicators.multiple_contributors);
        assert!(!indicators.established);
        assert!(!indicators.popular);
    }

    #[test]
    fn language_stats_totals_bytes() {
        let stats = LanguageStats::new(BTreeMap::from([
            ("Rust".to_string(), 700),
            ("Python".to_string(), 300),
        ]));
        assert_eq!(stats.total_bytes, 1000);
    }

    #[test]
    fn repo_parses_null_license() {
        let json = r#"{
            "name": "x", "full_name": "o/x", "description": null,
            "stargazers_count": 0, "forks_count": 0, "open_issues_count": 0,
            "language": null, "topics": [],
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "pushed_at": "2024-01-01T00:00:00Z",
            "size": 0, "default_branch": "main", "license": null,
            "has_wiki": false, "has_pages": false, "has_projects": false,
            "archived": false, "disabled": false
        }"#;
        let repo: Repo = serde_json::from_str(json).unwrap();
        assert!(repo.license.is_none());
    }
}
