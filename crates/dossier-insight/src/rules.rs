use async_trait::async_trait;

use dossier_core::ProjectType;
use dossier_signals::TechnicalSignals;

use crate::{Insights, ReasoningEngine};

/// Rule-based engine that mimics backend reasoning without any network.
///
/// Project-type selects a pre-written problem/solution/value/target/plans
/// bundle; content keywords drive the feature list and current-focus line.
/// The keyword heuristics are illustrative defaults, not precision tools.
///
/// # Examples
///
/// ```
/// use dossier_insight::{ReasoningEngine, RuleEngine};
///
/// let engine = RuleEngine;
/// assert_eq!(engine.name(), "rules");
/// ```
pub struct RuleEngine;

struct TypeBundle {
    problem: &'static str,
    solution: &'static str,
    value_proposition: &'static str,
    target_users: &'static str,
    future_plans: &'static str,
}

fn bundle_for(project_type: ProjectType) -> TypeBundle {
    match project_type {
        ProjectType::WebApp => TypeBundle {
            problem: "Building modern web applications requires managing complex frontend and backend interactions, state management, and user experience optimization.",
            solution: "This web application provides a streamlined architecture with modern frameworks and best practices for scalable development.",
            value_proposition: "Delivers fast, responsive user experiences with maintainable code architecture.",
            target_users: "Web developers, frontend engineers, and product teams building user-facing applications.",
            future_plans: "Expanding cross-platform support and adding advanced user interface components.",
        },
        ProjectType::Cli => TypeBundle {
            problem: "Developers need efficient command-line tools that are easy to use, well-documented, and integrate seamlessly into existing workflows.",
            solution: "This CLI tool provides intuitive commands with comprehensive help documentation and robust error handling.",
            value_proposition: "Streamlines development workflows and automates repetitive tasks with reliable command-line interface.",
            target_users: "Software developers, DevOps engineers, and system administrators.",
            future_plans: "Adding more automation features and improving cross-platform compatibility.",
        },
        ProjectType::Api => TypeBundle {
            problem: "Creating robust APIs requires careful design of endpoints, data validation, authentication, and comprehensive documentation.",
            solution: "This API provides well-structured endpoints with automatic validation, clear documentation, and scalable architecture.",
            value_proposition: "Enables reliable data exchange and integration with comprehensive API documentation and testing tools.",
            target_users: "Backend developers, API consumers, and integration teams.",
            future_plans: "Expanding API endpoints and improving performance optimization.",
        },
        ProjectType::Library => TypeBundle {
            problem: "Developers need reusable, well-tested libraries that solve common problems without adding unnecessary complexity.",
            solution: "This library provides clean APIs, comprehensive documentation, and thorough testing for reliable integration.",
            value_proposition: "Accelerates development by providing tested, reusable components with clear documentation.",
            target_users: "Software developers and engineering teams building applications.",
            future_plans: "Adding new features and maintaining backward compatibility.",
        },
        _ => TypeBundle {
            problem: "This project addresses specific technical challenges in its domain with innovative solutions.",
            solution: "Implements comprehensive functionality using modern development practices and proven patterns.",
            value_proposition: "Provides reliable, efficient solutions that improve productivity and code quality.",
            target_users: "Developers, engineers, and technical professionals in the relevant domain.",
            future_plans: "Expanding capabilities and improving user experience based on community feedback.",
        },
    }
}

fn detect_features(content: &str) -> Vec<String> {
    let content = content.to_lowercase();
    let mut features = Vec::new();

    if content.contains("test") || content.contains("spec") {
        features.push("Comprehensive testing suite".to_string());
    }
    if content.contains("docker") {
        features.push("Containerized deployment".to_string());
    }
    if content.contains("api") || content.contains("endpoint") {
        features.push("RESTful API design".to_string());
    }
    if content.contains("react") || content.contains("vue") || content.contains("angular") {
        features.push("Modern frontend framework".to_string());
    }
    if content.contains("typescript") {
        features.push("Type-safe development".to_string());
    }
    if content.contains("auth") || content.contains("login") {
        features.push("Authentication system".to_string());
    }
    if content.contains("database") || content.contains("db") {
        features.push("Database integration".to_string());
    }

    if features.is_empty() {
        features = vec![
            "Clean, maintainable code architecture".to_string(),
            "Comprehensive documentation".to_string(),
            "User-friendly interface".to_string(),
            "Reliable performance".to_string(),
        ];
    }

    features.truncate(5);
    features
}

fn detect_focus(content: &str) -> String {
    let content = content.to_lowercase();
    if content.contains("todo") || content.contains("fixme") {
        "Addressing technical debt and implementing planned improvements.".to_string()
    } else if content.contains("beta") || content.contains("alpha") {
        "Stabilizing features and preparing for production release.".to_string()
    } else if content.contains("v1") || content.contains("release") {
        "Finalizing features and ensuring production readiness.".to_string()
    } else {
        "Improving core functionality and user experience.".to_string()
    }
}

#[async_trait]
impl ReasoningEngine for RuleEngine {
    async fn reason(&self, signals: &TechnicalSignals, content: &str) -> Insights {
        let bundle = bundle_for(signals.project_type);

        Insights {
            problem: bundle.problem.to_string(),
            solution: bundle.solution.to_string(),
            value_proposition: bundle.value_proposition.to_string(),
            target_users: bundle.target_users.to_string(),
            key_features: detect_features(content),
            current_focus: detect_focus(content),
            future_plans: bundle.future_plans.to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "rules"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_core::{ActivityLevel, ProjectStatus};

    fn signals(project_type: ProjectType) -> TechnicalSignals {
        TechnicalSignals {
            languages: vec!["Rust".into()],
            frameworks: vec![],
            project_type,
            maturity: ProjectStatus::Prototype,
            activity: ActivityLevel::Low,
            tech_stack: vec!["Rust".into()],
        }
    }

    #[tokio::test]
    async fn cli_bundle_mentions_command_line() {
        let engine = RuleEngine;
        let insights = engine.reason(&signals(ProjectType::Cli), "").await;
        assert!(insights.problem.contains("command-line"));
        assert!(insights.target_users.contains("DevOps"));
    }

    #[tokio::test]
    async fn unmatched_type_uses_default_bundle() {
        let engine = RuleEngine;
        let other = engine.reason(&signals(ProjectType::Other), "").await;
        let ml = engine.reason(&signals(ProjectType::Ml), "").await;
        assert_eq!(other.problem, ml.problem);
    }

    #[tokio::test]
    async fn features_come_from_content_keywords() {
        let engine = RuleEngine;
        let content = "We run tests in docker, expose an api endpoint, and use typescript.";
        let insights = engine.reason(&signals(ProjectType::Api), content).await;
        assert!(insights
            .key_features
            .contains(&"Comprehensive testing suite".to_string()));
        assert!(insights
            .key_features
            .contains(&"Containerized deployment".to_string()));
        assert!(insights
            .key_features
            .contains(&"RESTful API design".to_string()));
        assert!(insights
            .key_features
            .contains(&"Type-safe development".to_string()));
    }

    #[tokio::test]
    async fn features_cap_at_five() {
        let engine = RuleEngine;
        let content = "test docker api react typescript auth database";
        let insights = engine.reason(&signals(ProjectType::Other), content).await;
        assert_eq!(insights.key_features.len(), 5);
    }

    #[tokio::test]
    async fn generic_features_when_nothing_matches() {
        let engine = RuleEngine;
        let insights = engine
            .reason(&signals(ProjectType::Other), "nothing relevant here")
            .await;
        assert_eq!(insights.key_features.len(), 4);
        assert!(insights.key_features[0].contains("architecture"));
    }

    #[tokio::test]
    async fn focus_priority_todo_beats_release() {
        let engine = RuleEngine;
        let insights = engine
            .reason(&signals(ProjectType::Other), "TODO before the v1 release")
            .await;
        assert!(insights.current_focus.contains("technical debt"));

        let insights = engine
            .reason(&signals(ProjectType::Other), "beta feature for the release")
            .await;
        assert!(insights.current_focus.contains("Stabilizing"));

        let insights = engine
            .reason(&signals(ProjectType::Other), "shipping the v1 release")
            .await;
        assert!(insights.current_focus.contains("production readiness"));

        let insights = engine.reason(&signals(ProjectType::Other), "plain").await;
        assert!(insights.current_focus.contains("core functionality"));
    }
}
