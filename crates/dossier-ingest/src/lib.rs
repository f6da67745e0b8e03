//! Repository ingestion: file walking, commit reading, and content selection.
//!
//! Builds a [`RepositorySnapshot`] from a local directory or a shallow clone
//! of a GitHub URL: files with priority scores (README-like first), recent
//! commit history via git2, and a priority-ordered content digest for the
//! reasoning step.

pub mod content;
pub mod history;
pub mod snapshot;
pub mod walker;

pub use content::select_content;
pub use history::CommitRecord;
pub use snapshot::{ingest_local, ingest_repository, RepositorySnapshot};
pub use walker::{collect_files, file_priority, FileEntry};
