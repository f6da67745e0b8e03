use std::path::{Path, PathBuf};

use tracing::debug;

/// Number of bytes to check for binary detection.
const BINARY_CHECK_SIZE: usize = 8192;

/// Directory names excluded from the walk: version-control metadata,
/// dependency caches, build output, and virtual environments.
const IGNORE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "target",
    "__pycache__",
    "venv",
    "env",
    ".venv",
    "build",
    "dist",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".idea",
    ".vscode",
];

/// README-like filenames, the highest-priority tier.
const README_NAMES: &[&str] = &["readme.md", "readme.txt", "readme.rst", "readme"];

/// Package manifests, build files, and license files.
const MANIFEST_NAMES: &[&str] = &[
    "cargo.toml",
    "requirements.txt",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "package.json",
    "tsconfig.json",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "gemfile",
    "dockerfile",
    "docker-compose.yml",
    "makefile",
    ".gitignore",
    "license",
    "license.txt",
    "license.md",
];

/// Source-code extensions (without the dot).
const SOURCE_EXTENSIONS: &[&str] = &["py", "js", "ts", "java", "cpp", "c", "h", "go", "rs", "rb"];

/// Documentation extensions (without the dot).
const DOC_EXTENSIONS: &[&str] = &["md", "txt", "rst"];

/// A file collected during repository walking.
///
/// Immutable once read; ordering within a snapshot is priority-descending.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dossier_ingest::walker::FileEntry;
///
/// let entry = FileEntry {
///     path: PathBuf::from("README.md"),
///     content: "# Hello".to_string(),
///     priority: 10,
/// };
/// assert_eq!(entry.priority, 10);
/// ```
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path relative to the repository root.
    pub path: PathBuf,
    /// File content, lossily decoded as UTF-8.
    pub content: String,
    /// Priority score; higher is more important.
    pub priority: u8,
}

/// Priority score for a file, higher is more important.
///
/// Precedence: README-like names (10) > manifests/config/licenses (8) >
/// documentation extensions (7) > source-code extensions (5) > everything
/// else (1). Name tiers are checked before extension tiers, so `LICENSE.md`
/// scores 8, not 7.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dossier_ingest::walker::file_priority;
///
/// assert_eq!(file_priority(Path::new("README.md")), 10);
/// assert_eq!(file_priority(Path::new("Cargo.toml")), 8);
/// assert_eq!(file_priority(Path::new("docs/guide.md")), 7);
/// assert_eq!(file_priority(Path::new("src/main.rs")), 5);
/// assert_eq!(file_priority(Path::new("assets/logo.svg")), 1);
/// ```
pub fn file_priority(path: &Path) -> u8 {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if README_NAMES.contains(&name.as_str()) {
        return 10;
    }
    if MANIFEST_NAMES.contains(&name.as_str()) {
        return 8;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if SOURCE_EXTENSIONS.contains(&ext.as_str()) {
        return 5;
    }
    if DOC_EXTENSIONS.contains(&ext.as_str()) {
        return 7;
    }
    1
}

/// Collect readable text files under `root`, priority-descending.
///
/// Skips the fixed ignore directories, files larger than `max_file_size`,
/// and binary files (NUL byte within the first 8 KiB). Unreadable files are
/// skipped at debug log level, never fatally. Content is decoded leniently:
/// invalid UTF-8 sequences are replaced, not rejected.
///
/// Ties between equal priorities are broken by path, so the output is
/// deterministic for identical input.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use dossier_ingest::walker::collect_files;
///
/// let files = collect_files(Path::new("."), 1_048_576);
/// for f in &files {
///     println!("{} (priority {})", f.path.display(), f.priority);
/// }
/// ```
pub fn collect_files(root: &Path, max_file_size: u64) -> Vec<FileEntry> {
    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().is_some_and(|t| t.is_dir())
                && IGNORE_DIRS.contains(&name.as_ref()))
        })
        .build();

    let mut files = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let path = entry.path();

        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                debug!("skipping unreadable file {}: {e}", path.display());
                continue;
            }
        };
        if metadata.len() > max_file_size {
            debug!("skipping oversized file {}", path.display());
            continue;
        }

        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                debug!("skipping unreadable file {}: {e}", path.display());
                continue;
            }
        };

        let check_len = bytes.len().min(BINARY_CHECK_SIZE);
        if bytes[..check_len].contains(&0) {
            debug!("skipping binary file {}", path.display());
            continue;
        }

        let content = String::from_utf8_lossy(&bytes).into_owned();

        let relative = match path.strip_prefix(root) {
            Ok(r) => r.to_path_buf(),
            Err(_) => path.to_path_buf(),
        };
        let priority = file_priority(&relative);

        files.push(FileEntry {
            path: relative,
            content,
            priority,
        });
    }

    files.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.path.cmp(&b.path)));
    files
}
