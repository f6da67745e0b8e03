use std::path::Path;

use dossier_core::DossierError;
use tracing::{debug, info};

use crate::client::parse_github_url;

/// A shallow clone in a scratch directory.
///
/// The directory is deleted when the guard is dropped, on every exit path
/// including panics. Callers must finish reading the clone before dropping.
pub struct CloneGuard {
    dir: tempfile::TempDir,
}

impl CloneGuard {
    /// Path to the root of the cloned repository.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Shallow-clone a GitHub repository into a scratch directory.
///
/// Clones depth-1, single branch, over HTTPS. The returned guard removes the
/// directory on drop.
///
/// # Errors
///
/// Returns [`DossierError::GitHub`] if the URL cannot be parsed, or
/// [`DossierError::Git`] if the clone fails.
///
/// # Examples
///
/// ```no_run
/// use dossier_github::cloner::clone_to_temp;
///
/// let clone = clone_to_temp("https://github.com/rust-lang/cargo").unwrap();
/// assert!(clone.path().join("Cargo.toml").exists());
/// // the scratch directory is removed here
/// drop(clone);
/// ```
pub fn clone_to_temp(github_url: &str) -> Result<CloneGuard, DossierError> {
    let (owner, repo) = parse_github_url(github_url)?;
    let clone_url = format!("https://github.com/{owner}/{repo}.git");

    let dir = tempfile::Builder::new()
        .prefix(&format!("dossier-{repo}-"))
        .tempdir()
        .map_err(DossierError::Io)?;

    info!("cloning {clone_url} to {}", dir.path().display());

    let mut fetch_options = git2::FetchOptions::new();
    fetch_options.depth(1);

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch_options);

    builder
        .clone(&clone_url, dir.path())
        .map_err(|e| DossierError::Git(format!("failed to clone {clone_url}: {e}")))?;

    debug!("clone of {owner}/{repo} complete");
    Ok(CloneGuard { dir })
}
