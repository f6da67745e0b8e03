use std::path::PathBuf;

/// Errors that can occur across the dossier pipeline.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate reports it through `miette` at the boundary.
///
/// # Examples
///
/// ```
/// use dossier_core::DossierError;
///
/// let err = DossierError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DossierError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git operation failure (clone, history walk).
    #[error("git error: {0}")]
    Git(String),

    /// GitHub API or URL failure.
    #[error("GitHub error: {0}")]
    GitHub(String),

    /// Reasoning backend API or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization / deserialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A persisted brief failed schema validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The repository path does not exist or is not a directory.
    #[error("not a repository directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DossierError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = DossierError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn not_a_directory_shows_path() {
        let err = DossierError::NotADirectory(PathBuf::from("/tmp/missing"));
        assert!(err.to_string().contains("/tmp/missing"));
    }

    #[test]
    fn validation_error_displays_message() {
        let err = DossierError::Validation("project_name is empty".into());
        assert_eq!(err.to_string(), "validation error: project_name is empty");
    }
}
