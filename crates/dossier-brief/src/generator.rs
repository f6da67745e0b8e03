use std::path::Path;

use tracing::info;

use dossier_core::DossierError;
use dossier_ingest::RepositorySnapshot;
use dossier_insight::Insights;
use dossier_signals::TechnicalSignals;

use crate::schema::{Brief, Metadata};

/// Maximum one-liner length before truncation.
const ONE_LINER_LIMIT: usize = 200;

/// Infer the project name from the highest-priority README heading.
///
/// Scans README-like files in snapshot order (priority-descending) for a
/// level-1 markdown heading within the first 10 lines; falls back to the
/// root directory name.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dossier_brief::generator::infer_project_name;
/// use dossier_ingest::{FileEntry, RepositorySnapshot};
///
/// let snapshot = RepositorySnapshot {
///     root_path: PathBuf::from("/work/fallback-name"),
///     files: vec![FileEntry {
///         path: PathBuf::from("README.md"),
///         content: "# Actual Name\n\nBody.".into(),
///         priority: 10,
///     }],
///     recent_commits: vec![],
///     is_version_controlled: false,
///     origin_url: None,
///     is_remote_clone: false,
/// };
/// assert_eq!(infer_project_name(&snapshot), "Actual Name");
/// ```
pub fn infer_project_name(snapshot: &RepositorySnapshot) -> String {
    for file in &snapshot.files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !name.contains("readme") {
            continue;
        }
        for line in file.content.lines().take(10) {
            if let Some(heading) = line.trim().strip_prefix("# ") {
                return heading.trim().to_string();
            }
        }
    }

    snapshot
        .root_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string())
}

/// One-line summary: the value proposition, truncated with an ellipsis.
pub fn generate_one_liner(insights: &Insights) -> String {
    let value = &insights.value_proposition;
    if value.chars().count() > ONE_LINER_LIMIT {
        let truncated: String = value.chars().take(ONE_LINER_LIMIT).collect();
        format!("{truncated}...")
    } else {
        value.clone()
    }
}

/// Assemble the brief from snapshot, signals, and insights.
///
/// Stamps the current schema version and a UTC generation timestamp.
pub fn generate_brief(
    snapshot: &RepositorySnapshot,
    signals: &TechnicalSignals,
    insights: &Insights,
) -> Brief {
    Brief {
        project_name: infer_project_name(snapshot),
        one_liner: generate_one_liner(insights),
        problem: insights.problem.clone(),
        solution: insights.solution.clone(),
        value_proposition: insights.value_proposition.clone(),
        tech_stack: signals.tech_stack.clone(),
        project_type: signals.project_type,
        status: signals.maturity,
        key_features: insights.key_features.clone(),
        target_users: insights.target_users.clone(),
        current_focus: insights.current_focus.clone(),
        future_plans: insights.future_plans.clone(),
        // Risk derivation is not implemented; the field stays null.
        risks_or_gaps: None,
        metadata: Metadata::now(),
    }
}

/// Serialize a brief to YAML at `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`DossierError::Io`] on write failure or [`DossierError::Yaml`]
/// on serialization failure.
pub fn save_brief(brief: &Brief, path: &Path) -> Result<(), DossierError> {
    let yaml = serde_yaml::to_string(brief)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, yaml)?;
    info!("brief saved to {}", path.display());
    Ok(())
}

/// Load and validate a brief from a YAML file.
///
/// # Errors
///
/// Returns [`DossierError::Io`] if the file cannot be read, or
/// [`DossierError::Validation`] if required fields are absent, an enum value
/// is unrecognized, or an invariant fails.
pub fn load_brief(path: &Path) -> Result<Brief, DossierError> {
    let content = std::fs::read_to_string(path)?;
    let brief: Brief = serde_yaml::from_str(&content)
        .map_err(|e| DossierError::Validation(format!("malformed brief: {e}")))?;
    brief.validate()?;
    Ok(brief)
}
