//! Signal extraction: languages, frameworks, project type, maturity, activity.
//!
//! Every function here is a pure, deterministic map from snapshot data to a
//! classification. Detection is keyword- and extension-based; the heuristics
//! are intentionally cheap and first-match-wins.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::debug;

use dossier_core::{ActivityLevel, ProjectStatus, ProjectType};
use dossier_ingest::{CommitRecord, FileEntry, RepositorySnapshot};

/// Extension → language table.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("py", "Python"),
    ("js", "JavaScript"),
    ("ts", "TypeScript"),
    ("java", "Java"),
    ("cpp", "C++"),
    ("c", "C"),
    ("h", "C"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("cs", "C#"),
    ("scala", "Scala"),
    ("kt", "Kotlin"),
    ("swift", "Swift"),
    ("dart", "Dart"),
];

/// Framework keyword → display name table, matched in manifests and imports.
const FRAMEWORK_KEYWORDS: &[(&str, &str)] = &[
    ("flask", "Flask"),
    ("django", "Django"),
    ("fastapi", "FastAPI"),
    ("typer", "Typer"),
    ("click", "Click"),
    ("streamlit", "Streamlit"),
    ("react", "React"),
    ("vue", "Vue"),
    ("angular", "Angular"),
    ("express", "Express"),
    ("spring", "Spring"),
    ("axum", "Axum"),
    ("actix", "Actix"),
    ("rocket", "Rocket"),
    ("rails", "Rails"),
    ("tensorflow", "TensorFlow"),
    ("pytorch", "PyTorch"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
];

/// Manifest files scanned for framework keywords by plain presence.
const FRAMEWORK_MANIFESTS: &[&str] = &[
    "requirements.txt",
    "pyproject.toml",
    "package.json",
    "cargo.toml",
    "gemfile",
];

/// Source extensions scanned for `import X` / `from X` framework references.
const IMPORT_SCAN_EXTENSIONS: &[&str] = &["py", "js", "ts"];

/// Technical signals derived from a repository snapshot.
///
/// Immutable; lists are sorted and de-duplicated.
#[derive(Debug, Clone, Serialize)]
pub struct TechnicalSignals {
    /// Detected languages, sorted.
    pub languages: Vec<String>,
    /// Detected frameworks, sorted.
    pub frameworks: Vec<String>,
    /// First-match project type.
    pub project_type: ProjectType,
    /// Maturity tier.
    pub maturity: ProjectStatus,
    /// Commit-recency bucket.
    pub activity: ActivityLevel,
    /// Sorted union of languages and frameworks.
    pub tech_stack: Vec<String>,
}

/// Detect languages from file extensions, sorted and de-duplicated.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dossier_ingest::FileEntry;
/// use dossier_signals::extract_languages;
///
/// let files = vec![
///     FileEntry { path: PathBuf::from("a.rs"), content: String::new(), priority: 5 },
///     FileEntry { path: PathBuf::from("b.py"), content: String::new(), priority: 5 },
///     FileEntry { path: PathBuf::from("c.rs"), content: String::new(), priority: 5 },
/// ];
/// assert_eq!(extract_languages(&files), vec!["Python", "Rust"]);
/// ```
pub fn extract_languages(files: &[FileEntry]) -> Vec<String> {
    let mut languages = BTreeSet::new();
    for file in files {
        let ext = file
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if let Some((_, name)) = LANGUAGE_EXTENSIONS.iter().find(|(e, _)| *e == ext) {
            languages.insert((*name).to_string());
        }
    }
    languages.into_iter().collect()
}

/// Detect frameworks from manifest contents and import statements.
///
/// A keyword counts when it appears anywhere in a known manifest file, or as
/// an `import keyword` / `from keyword` substring in a scannable source file.
pub fn extract_frameworks(files: &[FileEntry]) -> Vec<String> {
    let mut frameworks = BTreeSet::new();
    for file in files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let ext = file
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let content = file.content.to_lowercase();

        if FRAMEWORK_MANIFESTS.contains(&name.as_str()) {
            for (keyword, display) in FRAMEWORK_KEYWORDS {
                if content.contains(keyword) {
                    frameworks.insert((*display).to_string());
                }
            }
        } else if IMPORT_SCAN_EXTENSIONS.contains(&ext.as_str()) {
            for (keyword, display) in FRAMEWORK_KEYWORDS {
                if content.contains(&format!("import {keyword}"))
                    || content.contains(&format!("from {keyword}"))
                {
                    frameworks.insert((*display).to_string());
                }
            }
        }
    }
    frameworks.into_iter().collect()
}

/// Infer the project type from file structure.
///
/// Heuristics are evaluated in a fixed order and the first match wins:
/// CLI → API → web app → ML → automation → library → other. Markers match
/// path segments, so `config.toml` does not read as "ml".
pub fn infer_project_type(files: &[FileEntry]) -> ProjectType {
    let paths: Vec<Vec<String>> = files
        .iter()
        .map(|f| {
            f.path
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
                .collect()
        })
        .collect();
    let names: Vec<&String> = paths.iter().filter_map(|segments| segments.last()).collect();

    let segment = |pred: &dyn Fn(&str) -> bool| paths.iter().flatten().any(|s| pred(s));
    let named = |candidates: &[&str]| names.iter().any(|n| candidates.contains(&n.as_str()));

    if segment(&|s| s.contains("cli")) || named(&["main.py", "main.js", "main.rs"]) {
        return ProjectType::Cli;
    }
    if segment(&|s| s.contains("api")) || named(&["app.py", "server.js"]) {
        return ProjectType::Api;
    }
    if segment(&|s| s.contains("web")) || named(&["index.html"]) {
        return ProjectType::WebApp;
    }
    if segment(&|s| s == "ml" || s.contains("model")) {
        return ProjectType::Ml;
    }
    if segment(&|s| s.contains("script") || s.contains("automation")) {
        return ProjectType::Automation;
    }
    if segment(&|s| s == "lib" || s.contains("library")) || named(&["lib.rs"]) {
        return ProjectType::Library;
    }
    ProjectType::Other
}

/// Classify maturity from four structural booleans.
///
/// Production requires tests, CI, docs, and a version marker; MVP requires
/// tests and docs; everything else is a prototype. Adding a true predicate
/// can only raise the tier.
pub fn infer_maturity(files: &[FileEntry]) -> ProjectStatus {
    let paths: Vec<String> = files
        .iter()
        .map(|f| f.path.to_string_lossy().to_lowercase())
        .collect();

    let has_tests = paths.iter().any(|p| p.contains("test"));
    let has_ci = paths.iter().any(|p| p.contains("ci") || p.contains(".github"));
    let has_docs = paths.iter().any(|p| p.contains("doc") || p.contains("readme"));
    let has_version = files.iter().any(|f| {
        f.path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase().contains("version"))
            .unwrap_or(false)
    });

    if has_tests && has_ci && has_docs && has_version {
        ProjectStatus::Production
    } else if has_tests && has_docs {
        ProjectStatus::Mvp
    } else {
        ProjectStatus::Prototype
    }
}

/// Bucket activity by the age of the newest commit relative to `now`.
///
/// Under 30 days is high, under 90 medium, otherwise low. No commits is low;
/// an unparseable date is unknown.
pub fn infer_activity(commits: &[CommitRecord], now: DateTime<Utc>) -> ActivityLevel {
    let Some(newest) = commits.first() else {
        return ActivityLevel::Low;
    };

    let Some(date) = parse_commit_date(&newest.date) else {
        debug!("could not parse commit date: {}", newest.date);
        return ActivityLevel::Unknown;
    };

    let days = (now - date).num_days();
    if days < 30 {
        ActivityLevel::High
    } else if days < 90 {
        ActivityLevel::Medium
    } else {
        ActivityLevel::Low
    }
}

fn parse_commit_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.with_timezone(&Utc));
    }
    // Naive timestamps are assumed UTC.
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(date, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Sorted, de-duplicated union of languages and frameworks.
pub fn extract_tech_stack(languages: &[String], frameworks: &[String]) -> Vec<String> {
    let mut stack: BTreeSet<String> = languages.iter().cloned().collect();
    stack.extend(frameworks.iter().cloned());
    stack.into_iter().collect()
}

/// Extract all technical signals from a snapshot.
///
/// # Examples
///
/// ```no_run
/// use dossier_core::IngestConfig;
/// use dossier_ingest::ingest_local;
/// use dossier_signals::extract_signals;
/// use std::path::Path;
///
/// let snapshot = ingest_local(Path::new("."), &IngestConfig::default()).unwrap();
/// let signals = extract_signals(&snapshot);
/// println!("{}: {:?}", signals.project_type, signals.tech_stack);
/// ```
pub fn extract_signals(snapshot: &RepositorySnapshot) -> TechnicalSignals {
    let languages = extract_languages(&snapshot.files);
    let frameworks = extract_frameworks(&snapshot.files);
    let project_type = infer_project_type(&snapshot.files);
    let maturity = infer_maturity(&snapshot.files);
    let activity = infer_activity(&snapshot.recent_commits, Utc::now());
    let tech_stack = extract_tech_stack(&languages, &frameworks);

    TechnicalSignals {
        languages,
        frameworks,
        project_type,
        maturity,
        activity,
        tech_stack,
    }
}
