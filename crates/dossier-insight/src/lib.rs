//! Pluggable reasoning engines that turn signals + content into insights.
//!
//! One capability, several interchangeable implementations: a fixed-template
//! mock, a rule-based engine, and wrappers around hosted and local text
//! generation backends. Reasoning failures never escape an engine; every
//! variant degrades to the same fixed fallback bundle.

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod rules;
pub mod select;

pub use anthropic::AnthropicEngine;
pub use mock::MockEngine;
pub use ollama::OllamaEngine;
pub use openai::OpenAiEngine;
pub use rules::RuleEngine;
pub use select::{provider_status, select_engine, Credentials, ProviderStatus};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use dossier_signals::TechnicalSignals;

/// Generated insights about a project.
///
/// # Examples
///
/// ```
/// use dossier_insight::fallback_insights;
///
/// let insights = fallback_insights();
/// assert!(!insights.key_features.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    /// What problem the project solves.
    pub problem: String,
    /// How it solves the problem.
    pub solution: String,
    /// Why that matters to users.
    pub value_proposition: String,
    /// Who the project is for.
    pub target_users: String,
    /// Up to five short feature phrases.
    pub key_features: Vec<String>,
    /// One sentence on the current development focus.
    pub current_focus: String,
    /// One sentence on likely future plans.
    pub future_plans: String,
}

/// The single reasoning capability all engines implement.
///
/// `reason` is infallible by contract: implementations absorb network, auth,
/// and parse failures and return [`fallback_insights`] instead of erroring,
/// so a broken backend can never abort the pipeline.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Produce insights from extracted signals and selected content.
    async fn reason(&self, signals: &TechnicalSignals, content: &str) -> Insights;

    /// Short engine name for status output.
    fn name(&self) -> &'static str;
}

/// The fixed bundle every engine returns when its backend fails.
pub fn fallback_insights() -> Insights {
    Insights {
        problem: "This project addresses specific technical challenges in its domain.".into(),
        solution: "The project provides a comprehensive solution using modern development practices.".into(),
        value_proposition: "Offers improved efficiency, reliability, and user experience.".into(),
        target_users: "Developers, engineers, and technical professionals.".into(),
        key_features: vec![
            "Modern architecture and design".into(),
            "Comprehensive functionality".into(),
            "Developer-friendly interface".into(),
            "Reliable performance".into(),
        ],
        current_focus: "Enhancing core features and improving documentation.".into(),
        future_plans: "Expanding capabilities and growing the user community.".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_stable() {
        assert_eq!(fallback_insights(), fallback_insights());
        assert_eq!(fallback_insights().key_features.len(), 4);
    }

    #[test]
    fn insights_roundtrip_through_json() {
        let insights = fallback_insights();
        let json = serde_json::to_string(&insights).unwrap();
        let back: Insights = serde_json::from_str(&json).unwrap();
        assert_eq!(insights, back);
    }
}
