use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of project inferred from repository structure.
///
/// # Examples
///
/// ```
/// use dossier_core::ProjectType;
///
/// let t: ProjectType = serde_json::from_str("\"web_app\"").unwrap();
/// assert_eq!(t, ProjectType::WebApp);
/// assert_eq!(t.to_string(), "web_app");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// Command-line tool.
    Cli,
    /// Backend service exposing endpoints.
    Api,
    /// User-facing web application.
    WebApp,
    /// Machine-learning project.
    Ml,
    /// Scripts and task automation.
    Automation,
    /// Reusable library or SDK.
    Library,
    /// Anything that matched no heuristic.
    Other,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectType::Cli => "cli",
            ProjectType::Api => "api",
            ProjectType::WebApp => "web_app",
            ProjectType::Ml => "ml",
            ProjectType::Automation => "automation",
            ProjectType::Library => "library",
            ProjectType::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cli" => Ok(ProjectType::Cli),
            "api" => Ok(ProjectType::Api),
            "web_app" => Ok(ProjectType::WebApp),
            "ml" => Ok(ProjectType::Ml),
            "automation" => Ok(ProjectType::Automation),
            "library" => Ok(ProjectType::Library),
            "other" => Ok(ProjectType::Other),
            other => Err(format!("unknown project type: {other}")),
        }
    }
}

/// Maturity stage of a project.
///
/// Tiers are ordered: `Prototype < Mvp < Production`.
///
/// # Examples
///
/// ```
/// use dossier_core::ProjectStatus;
///
/// assert!(ProjectStatus::Prototype < ProjectStatus::Production);
/// assert_eq!(ProjectStatus::Mvp.to_string(), "mvp");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Early exploration, few guarantees.
    Prototype,
    /// Tested and documented, but not hardened.
    Mvp,
    /// Tests, CI, docs, and versioning all present.
    Production,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectStatus::Prototype => "prototype",
            ProjectStatus::Mvp => "mvp",
            ProjectStatus::Production => "production",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prototype" => Ok(ProjectStatus::Prototype),
            "mvp" => Ok(ProjectStatus::Mvp),
            "production" => Ok(ProjectStatus::Production),
            other => Err(format!("unknown project status: {other}")),
        }
    }
}

/// Commit-recency bucket derived from the newest commit date.
///
/// # Examples
///
/// ```
/// use dossier_core::ActivityLevel;
///
/// assert_eq!(ActivityLevel::High.to_string(), "high");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Newest commit is less than 30 days old.
    High,
    /// Newest commit is less than 90 days old.
    Medium,
    /// Newest commit is 90+ days old, or there are no commits.
    Low,
    /// The newest commit date could not be parsed.
    Unknown,
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityLevel::High => "high",
            ActivityLevel::Medium => "medium",
            ActivityLevel::Low => "low",
            ActivityLevel::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use dossier_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_type_roundtrips_through_json() {
        let json = serde_json::to_string(&ProjectType::WebApp).unwrap();
        assert_eq!(json, "\"web_app\"");

        let parsed: ProjectType = serde_json::from_str("\"automation\"").unwrap();
        assert_eq!(parsed, ProjectType::Automation);
    }

    #[test]
    fn project_type_from_str() {
        assert_eq!("cli".parse::<ProjectType>().unwrap(), ProjectType::Cli);
        assert_eq!(
            "WEB_APP".parse::<ProjectType>().unwrap(),
            ProjectType::WebApp
        );
        assert!("desktop".parse::<ProjectType>().is_err());
    }

    #[test]
    fn project_status_ordering() {
        assert!(ProjectStatus::Prototype < ProjectStatus::Mvp);
        assert!(ProjectStatus::Mvp < ProjectStatus::Production);
    }

    #[test]
    fn project_status_from_str() {
        assert_eq!(
            "production".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::Production
        );
        assert!("stable".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn activity_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ActivityLevel::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
