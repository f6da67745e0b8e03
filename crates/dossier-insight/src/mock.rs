use async_trait::async_trait;

use dossier_signals::TechnicalSignals;

use crate::{Insights, ReasoningEngine};

/// Fixed-template engine for tests and offline mode.
///
/// Ignores its input entirely.
///
/// # Examples
///
/// ```
/// use dossier_insight::{MockEngine, ReasoningEngine};
///
/// let engine = MockEngine;
/// assert_eq!(engine.name(), "mock");
/// ```
pub struct MockEngine;

#[async_trait]
impl ReasoningEngine for MockEngine {
    async fn reason(&self, _signals: &TechnicalSignals, _content: &str) -> Insights {
        Insights {
            problem: "This project addresses a significant challenge in its domain by providing innovative solutions to common pain points.".into(),
            solution: "The project implements a comprehensive approach using best practices and modern technologies to deliver reliable results.".into(),
            value_proposition: "Offers substantial benefits including improved efficiency, reduced complexity, and enhanced user experience.".into(),
            target_users: "Developers, engineers, and organizations looking to streamline their workflows and improve productivity.".into(),
            key_features: vec![
                "Modular architecture for easy customization".into(),
                "Comprehensive documentation and examples".into(),
                "Strong type safety and error handling".into(),
                "Extensible plugin system".into(),
                "High performance and scalability".into(),
            ],
            current_focus: "Enhancing core functionality, improving documentation, and gathering user feedback for future improvements.".into(),
            future_plans: "Expand platform support, add advanced features, and build a vibrant community ecosystem.".into(),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
