use serde::Deserialize;

use dossier_signals::TechnicalSignals;

use crate::Insights;

/// Maximum content characters embedded in a backend prompt.
const CONTENT_EXCERPT: usize = 8000;

/// System instruction shared by the hosted backends.
pub const SYSTEM_PROMPT: &str = "You are an expert software analyst. Analyze the provided \
repository information and generate structured insights in JSON format.";

/// Build the analysis prompt embedding signals and a content excerpt.
///
/// # Examples
///
/// ```
/// use dossier_core::{ActivityLevel, ProjectStatus, ProjectType};
/// use dossier_insight::prompt::build_prompt;
/// use dossier_signals::TechnicalSignals;
///
/// let signals = TechnicalSignals {
///     languages: vec!["Rust".into()],
///     frameworks: vec![],
///     project_type: ProjectType::Cli,
///     maturity: ProjectStatus::Mvp,
///     activity: ActivityLevel::High,
///     tech_stack: vec!["Rust".into()],
/// };
/// let prompt = build_prompt(&signals, "# readme");
/// assert!(prompt.contains("Languages: Rust"));
/// assert!(prompt.contains("# readme"));
/// ```
pub fn build_prompt(signals: &TechnicalSignals, content: &str) -> String {
    const RESPONSE_SHAPE: &str = r#"Respond with a JSON object containing:
{
    "problem": "What specific problem does this project solve? (1-2 sentences)",
    "solution": "How does this project solve the problem? (1-2 sentences)",
    "value_proposition": "What value does this provide to users? (1-2 sentences)",
    "target_users": "Who are the primary users of this project? (1 sentence)",
    "key_features": ["List 3-5 key features as short phrases"],
    "current_focus": "What is the current development focus? (1 sentence)",
    "future_plans": "What are likely future plans for this project? (1 sentence)"
}

Base your analysis on the actual code, documentation, and project structure. Be specific and accurate."#;

    let excerpt: String = content.chars().take(CONTENT_EXCERPT).collect();
    format!(
        "Analyze this software repository and provide structured insights.\n\n\
         TECHNICAL SIGNALS:\n\
         - Languages: {}\n\
         - Frameworks: {}\n\
         - Project Type: {}\n\
         - Maturity: {}\n\
         - Activity Level: {}\n\n\
         REPOSITORY CONTENT (first {CONTENT_EXCERPT} chars):\n\
         {excerpt}\n\n\
         {RESPONSE_SHAPE}",
        signals.languages.join(", "),
        signals.frameworks.join(", "),
        signals.project_type,
        signals.maturity,
        signals.activity,
    )
}

#[derive(Deserialize)]
struct RawInsights {
    problem: Option<String>,
    solution: Option<String>,
    value_proposition: Option<String>,
    target_users: Option<String>,
    key_features: Option<Vec<String>>,
    current_focus: Option<String>,
    future_plans: Option<String>,
}

/// Parse a backend reply into [`Insights`].
///
/// Handles replies that wrap the JSON object in a fenced code block. Missing
/// fields fall back to neutral defaults; an unparseable reply yields `None`
/// so the caller can substitute the fallback bundle.
///
/// # Examples
///
/// ```
/// use dossier_insight::prompt::parse_insights;
///
/// let reply = "```json\n{\"problem\": \"p\"}\n```";
/// let insights = parse_insights(reply).unwrap();
/// assert_eq!(insights.problem, "p");
///
/// assert!(parse_insights("not json at all").is_none());
/// ```
pub fn parse_insights(response: &str) -> Option<Insights> {
    let cleaned = extract_json(response);
    let raw: RawInsights = serde_json::from_str(cleaned).ok()?;

    Some(Insights {
        problem: raw
            .problem
            .unwrap_or_else(|| "Project addresses domain-specific challenges.".into()),
        solution: raw
            .solution
            .unwrap_or_else(|| "Implements comprehensive solution using modern practices.".into()),
        value_proposition: raw
            .value_proposition
            .unwrap_or_else(|| "Provides efficiency and reliability benefits.".into()),
        target_users: raw
            .target_users
            .unwrap_or_else(|| "Developers and technical professionals.".into()),
        key_features: raw.key_features.unwrap_or_else(|| {
            vec![
                "Modern architecture".into(),
                "Easy to use".into(),
                "Well documented".into(),
            ]
        }),
        current_focus: raw
            .current_focus
            .unwrap_or_else(|| "Improving core functionality and user experience.".into()),
        future_plans: raw
            .future_plans
            .unwrap_or_else(|| "Expanding features and community adoption.".into()),
    })
}

/// Pull the JSON payload out of a reply, stripping markdown fences.
fn extract_json(response: &str) -> &str {
    if let Some(start) = response.find("```json") {
        let rest = &response[start + 7..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }
    if let Some(start) = response.find("```") {
        let rest = &response[start + 3..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }
    response.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_core::{ActivityLevel, ProjectStatus, ProjectType};

    fn signals() -> TechnicalSignals {
        TechnicalSignals {
            languages: vec!["Python".into(), "Rust".into()],
            frameworks: vec!["Axum".into()],
            project_type: ProjectType::Api,
            maturity: ProjectStatus::Production,
            activity: ActivityLevel::Medium,
            tech_stack: vec!["Axum".into(), "Python".into(), "Rust".into()],
        }
    }

    #[test]
    fn prompt_embeds_signals_and_content() {
        let prompt = build_prompt(&signals(), "the readme body");
        assert!(prompt.contains("Languages: Python, Rust"));
        assert!(prompt.contains("Frameworks: Axum"));
        assert!(prompt.contains("Project Type: api"));
        assert!(prompt.contains("Maturity: production"));
        assert!(prompt.contains("the readme body"));
    }

    #[test]
    fn prompt_truncates_long_content() {
        let long = "x".repeat(20_000);
        let prompt = build_prompt(&signals(), &long);
        assert!(prompt.len() < 12_000);
    }

    #[test]
    fn parses_bare_json() {
        let reply = r#"{"problem":"p","solution":"s","value_proposition":"v",
            "target_users":"t","key_features":["a","b"],
            "current_focus":"c","future_plans":"f"}"#;
        let insights = parse_insights(reply).unwrap();
        assert_eq!(insights.solution, "s");
        assert_eq!(insights.key_features, vec!["a", "b"]);
    }

    #[test]
    fn parses_fenced_json_with_surrounding_prose() {
        let reply = "Here is my analysis:\n```json\n{\"problem\":\"p\"}\n```\nHope that helps!";
        let insights = parse_insights(reply).unwrap();
        assert_eq!(insights.problem, "p");
        // Missing fields take neutral defaults.
        assert_eq!(insights.key_features.len(), 3);
    }

    #[test]
    fn parses_plain_fence() {
        let reply = "```\n{\"problem\":\"p\"}\n```";
        assert_eq!(parse_insights(reply).unwrap().problem, "p");
    }

    #[test]
    fn garbage_yields_none() {
        assert!(parse_insights("I could not analyze this repository.").is_none());
        assert!(parse_insights("").is_none());
    }
}
