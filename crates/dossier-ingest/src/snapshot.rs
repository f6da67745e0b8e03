use std::path::{Path, PathBuf};

use dossier_core::{DossierError, IngestConfig};
use dossier_github::{clone_to_temp, is_github_url};
use tracing::info;

use crate::history::{recent_commits, CommitRecord};
use crate::walker::{collect_files, FileEntry};

/// Snapshot of repository content, built once per run.
///
/// Files are ordered priority-descending; commits newest-first. The only
/// mutation after construction is [`RepositorySnapshot::mark_remote`], called
/// once when the snapshot came from a remote clone.
#[derive(Debug, Clone)]
pub struct RepositorySnapshot {
    /// Absolute path the files were read from.
    pub root_path: PathBuf,
    /// Collected files, priority-descending.
    pub files: Vec<FileEntry>,
    /// Recent commits, newest-first.
    pub recent_commits: Vec<CommitRecord>,
    /// Whether commit history was readable.
    pub is_version_controlled: bool,
    /// Remote origin URL, when ingested from one.
    pub origin_url: Option<String>,
    /// Whether the content came from a scratch clone.
    pub is_remote_clone: bool,
}

impl RepositorySnapshot {
    /// Attach remote provenance after a clone-based ingestion.
    pub fn mark_remote(&mut self, url: impl Into<String>) {
        self.origin_url = Some(url.into());
        self.is_remote_clone = true;
    }
}

/// Ingest a repository from a local path or a GitHub URL.
///
/// A GitHub URL is shallow-cloned into a scratch directory that is removed
/// once its contents have been read, on every exit path.
///
/// # Errors
///
/// Returns [`DossierError::NotADirectory`] for a bad local path,
/// [`DossierError::GitHub`] for a malformed URL, or [`DossierError::Git`] if
/// the clone fails.
///
/// # Examples
///
/// ```no_run
/// use dossier_core::IngestConfig;
/// use dossier_ingest::ingest_repository;
///
/// let snapshot = ingest_repository(".", &IngestConfig::default()).unwrap();
/// println!("{} files", snapshot.files.len());
/// ```
pub fn ingest_repository(
    source: &str,
    config: &IngestConfig,
) -> Result<RepositorySnapshot, DossierError> {
    if is_github_url(source) {
        ingest_remote(source, config)
    } else {
        ingest_local(Path::new(source), config)
    }
}

/// Ingest a local repository directory.
///
/// # Errors
///
/// Returns [`DossierError::NotADirectory`] if `root` does not exist or is
/// not a directory.
pub fn ingest_local(
    root: &Path,
    config: &IngestConfig,
) -> Result<RepositorySnapshot, DossierError> {
    if !root.is_dir() {
        return Err(DossierError::NotADirectory(root.to_path_buf()));
    }
    let root = root.canonicalize()?;

    info!("ingesting repository at {}", root.display());
    let files = collect_files(&root, config.max_file_size);
    let commits = recent_commits(&root, config.max_commits);
    let is_version_controlled = !commits.is_empty();

    Ok(RepositorySnapshot {
        root_path: root,
        files,
        recent_commits: commits,
        is_version_controlled,
        origin_url: None,
        is_remote_clone: false,
    })
}

fn ingest_remote(url: &str, config: &IngestConfig) -> Result<RepositorySnapshot, DossierError> {
    let clone = clone_to_temp(url)?;
    let mut snapshot = ingest_local(clone.path(), config)?;
    snapshot.mark_remote(url);
    info!("ingested remote repository {url}");
    Ok(snapshot)
    // `clone` drops here and the scratch directory is removed.
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn local_ingestion_builds_ordered_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "# Demo").unwrap();
        fs::write(dir.path().join("tool.py"), "print('x')").unwrap();

        let snapshot = ingest_local(dir.path(), &IngestConfig::default()).unwrap();
        assert_eq!(snapshot.files.len(), 2);
        assert_eq!(snapshot.files[0].path, PathBuf::from("README.md"));
        assert!(!snapshot.is_version_controlled);
        assert!(snapshot.recent_commits.is_empty());
        assert!(snapshot.origin_url.is_none());
        assert!(!snapshot.is_remote_clone);
    }

    #[test]
    fn missing_path_is_an_input_error() {
        let result = ingest_local(Path::new("/definitely/not/here"), &IngestConfig::default());
        assert!(matches!(result, Err(DossierError::NotADirectory(_))));
    }

    #[test]
    fn file_path_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let result = ingest_local(&file, &IngestConfig::default());
        assert!(matches!(result, Err(DossierError::NotADirectory(_))));
    }

    #[test]
    fn mark_remote_attaches_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let mut snapshot = ingest_local(dir.path(), &IngestConfig::default()).unwrap();
        snapshot.mark_remote("https://github.com/owner/repo");
        assert_eq!(
            snapshot.origin_url.as_deref(),
            Some("https://github.com/owner/repo")
        );
        assert!(snapshot.is_remote_clone);
    }

    #[test]
    fn github_source_routes_through_url_parsing() {
        let result = ingest_repository("https://github.com/owner", &IngestConfig::default());
        // One path segment cannot be owner/repo.
        assert!(result.is_err());
    }
}
