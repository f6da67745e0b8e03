//! GitHub metadata enrichment and repository cloning.
//!
//! Fetches repository attributes, contributors, and per-language byte counts
//! from the GitHub REST API, derives popularity/activity/maturity scores, and
//! shallow-clones remote repositories into scratch directories for ingestion.

pub mod client;
pub mod cloner;
pub mod metrics;

pub use client::{is_github_url, parse_github_url, GithubClient, RateLimit};
pub use cloner::{clone_to_temp, CloneGuard};
pub use metrics::{ActivityTier, Contributor, LanguageStats, Repo, RepoMetrics};
