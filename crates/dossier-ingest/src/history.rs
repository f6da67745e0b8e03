use std::path::Path;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use git2::{Repository, Sort};
use tracing::debug;

/// A commit from the repository's recent history.
///
/// # Examples
///
/// ```
/// use dossier_ingest::history::CommitRecord;
///
/// let record = CommitRecord {
///     hash: "a1b2c3".into(),
///     message: "fix: walker tiebreak".into(),
///     author: "alice".into(),
///     date: "2024-06-01T12:00:00+00:00".into(),
/// };
/// assert_eq!(record.author, "alice");
/// ```
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// Full commit hash.
    pub hash: String,
    /// Trimmed commit message.
    pub message: String,
    /// Author name.
    pub author: String,
    /// Author time as an RFC 3339 string.
    pub date: String,
}

/// Read up to `limit` most-recent commits from the repository at `root`.
///
/// Commits are returned newest-first. Any failure (not a repository, unborn
/// HEAD, walk error) yields an empty list; callers treat an empty list as
/// "not version-controlled".
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use dossier_ingest::history::recent_commits;
///
/// let commits = recent_commits(Path::new("."), 10);
/// for c in &commits {
///     println!("{}: {}", &c.hash[..7], c.message);
/// }
/// ```
pub fn recent_commits(root: &Path, limit: usize) -> Vec<CommitRecord> {
    match read_commits(root, limit) {
        Ok(commits) => commits,
        Err(e) => {
            debug!("no commit history at {}: {e}", root.display());
            Vec::new()
        }
    }
}

fn read_commits(root: &Path, limit: usize) -> Result<Vec<CommitRecord>, git2::Error> {
    let repo = Repository::open(root)?;
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head()?;

    let mut commits = Vec::new();
    for oid_result in revwalk.take(limit) {
        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;
        let author = commit.author();

        commits.push(CommitRecord {
            hash: oid.to_string(),
            message: commit.message().unwrap_or("").trim().to_string(),
            author: author.name().unwrap_or("unknown").to_string(),
            date: format_commit_time(&commit.time()),
        });
    }
    Ok(commits)
}

/// Render a git time as RFC 3339, preserving the author's UTC offset.
fn format_commit_time(time: &git2::Time) -> String {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset"));
    match offset.timestamp_opt(time.seconds(), 0).single() {
        Some(dt) => dt.to_rfc3339(),
        None => {
            let fallback: DateTime<Utc> = Utc
                .timestamp_opt(time.seconds(), 0)
                .single()
                .unwrap_or_default();
            fallback.to_rfc3339()
        }
    }
}
