use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dossier_core::{DossierError, ProjectStatus, ProjectType};

/// Current schema version stamped into generated briefs.
pub const SCHEMA_VERSION: &str = "1.0";

/// Generation metadata attached to every brief.
///
/// # Examples
///
/// ```
/// use dossier_brief::schema::Metadata;
///
/// let metadata = Metadata::now();
/// assert_eq!(metadata.version, "1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Schema version.
    pub version: String,
    /// UTC generation timestamp.
    pub generated_at: DateTime<Utc>,
}

impl Metadata {
    /// Metadata stamped with the current schema version and time.
    pub fn now() -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
        }
    }
}

/// The structured project brief, serialized to YAML.
///
/// `project_type` and `status` are restricted to their enumerations;
/// `tech_stack` holds no duplicates. Both invariants are re-checked by
/// [`Brief::validate`] when a persisted brief is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    /// Project name.
    pub project_name: String,
    /// One-line summary (value proposition, truncated).
    pub one_liner: String,
    /// Problem the project solves.
    pub problem: String,
    /// How the project solves it.
    pub solution: String,
    /// Value proposition for users.
    pub value_proposition: String,
    /// De-duplicated technologies in use.
    pub tech_stack: Vec<String>,
    /// Project type tag.
    pub project_type: ProjectType,
    /// Maturity status tag.
    pub status: ProjectStatus,
    /// Key features, at most five.
    pub key_features: Vec<String>,
    /// Target user base.
    pub target_users: String,
    /// Current development focus.
    pub current_focus: String,
    /// Likely future plans.
    pub future_plans: String,
    /// Known risks or gaps, when any were identified.
    pub risks_or_gaps: Option<String>,
    /// Generation metadata.
    pub metadata: Metadata,
}

impl Brief {
    /// Re-validate invariants that the type system cannot enforce alone.
    ///
    /// Checks that required text fields are non-empty and that `tech_stack`
    /// carries no duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<(), DossierError> {
        let required = [
            ("project_name", &self.project_name),
            ("one_liner", &self.one_liner),
            ("problem", &self.problem),
            ("solution", &self.solution),
            ("value_proposition", &self.value_proposition),
            ("target_users", &self.target_users),
            ("current_focus", &self.current_focus),
            ("future_plans", &self.future_plans),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DossierError::Validation(format!("{name} is empty")));
            }
        }

        if self.metadata.version.trim().is_empty() {
            return Err(DossierError::Validation("metadata.version is empty".into()));
        }

        let mut seen = std::collections::BTreeSet::new();
        for tech in &self.tech_stack {
            if !seen.insert(tech) {
                return Err(DossierError::Validation(format!(
                    "tech_stack contains duplicate entry: {tech}"
                )));
            }
        }

        Ok(())
    }
}
