use crate::snapshot::RepositorySnapshot;

/// Concatenate file contents in priority order, up to `budget` characters.
///
/// The file that crosses the budget is truncated to fit and iteration stops.
/// Parts are joined with blank lines; separators do not count against the
/// budget.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dossier_ingest::content::select_content;
/// use dossier_ingest::walker::FileEntry;
/// use dossier_ingest::RepositorySnapshot;
///
/// let snapshot = RepositorySnapshot {
///     root_path: PathBuf::from("."),
///     files: vec![FileEntry {
///         path: PathBuf::from("README.md"),
///         content: "# Project".into(),
///         priority: 10,
///     }],
///     recent_commits: vec![],
///     is_version_controlled: false,
///     origin_url: None,
///     is_remote_clone: false,
/// };
/// assert_eq!(select_content(&snapshot, 100), "# Project");
/// ```
pub fn select_content(snapshot: &RepositorySnapshot, budget: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut total = 0usize;

    for file in &snapshot.files {
        let len = file.content.chars().count();
        if total + len > budget {
            let remaining = budget - total;
            parts.push(file.content.chars().take(remaining).collect());
            break;
        }
        parts.push(file.content.clone());
        total += len;
    }

    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::FileEntry;
    use std::path::PathBuf;

    fn snapshot_with(contents: &[&str]) -> RepositorySnapshot {
        RepositorySnapshot {
            root_path: PathBuf::from("."),
            files: contents
                .iter()
                .enumerate()
                .map(|(i, c)| FileEntry {
                    path: PathBuf::from(format!("f{i}")),
                    content: (*c).to_string(),
                    priority: 5,
                })
                .collect(),
            recent_commits: vec![],
            is_version_controlled: false,
            origin_url: None,
            is_remote_clone: false,
        }
    }

    #[test]
    fn concatenates_in_order_under_budget() {
        let snapshot = snapshot_with(&["first", "second"]);
        assert_eq!(select_content(&snapshot, 100), "first\n\nsecond");
    }

    #[test]
    fn truncates_file_that_crosses_budget() {
        let snapshot = snapshot_with(&["12345", "abcdefgh"]);
        let selected = select_content(&snapshot, 8);
        assert_eq!(selected, "12345\n\nabc");
    }

    #[test]
    fn stops_after_budget_is_hit() {
        let snapshot = snapshot_with(&["aaaa", "bbbb", "cccc"]);
        let selected = select_content(&snapshot, 6);
        assert_eq!(selected, "aaaa\n\nbb");
    }

    #[test]
    fn empty_snapshot_yields_empty_content() {
        let snapshot = snapshot_with(&[]);
        assert_eq!(select_content(&snapshot, 100), "");
    }

    #[test]
    fn truncation_is_char_safe() {
        let snapshot = snapshot_with(&["héllo wörld"]);
        let selected = select_content(&snapshot, 3);
        assert_eq!(selected, "hél");
    }
}
