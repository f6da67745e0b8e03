use serde::Serialize;
use tracing::{info, warn};

use dossier_core::LlmConfig;

use crate::{AnthropicEngine, MockEngine, OllamaEngine, OpenAiEngine, ReasoningEngine, RuleEngine};

/// Backend credentials resolved from the environment.
///
/// Captured once so engine selection is a pure function of explicit inputs.
///
/// # Examples
///
/// ```
/// use dossier_insight::Credentials;
///
/// let creds = Credentials {
///     openai_key: Some("sk-test".into()),
///     anthropic_key: None,
/// };
/// assert!(creds.openai_key.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// OpenAI API key.
    pub openai_key: Option<String>,
    /// Anthropic API key.
    pub anthropic_key: Option<String>,
}

impl Credentials {
    /// Snapshot credentials from `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            openai_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            anthropic_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        }
    }
}

/// Select a reasoning engine from configuration and credentials.
///
/// `auto` prefers openai, then anthropic, then the rule engine. An explicit
/// provider whose key is missing, or an unknown provider name, falls back to
/// the rule engine with a warning; selection never fails.
///
/// # Examples
///
/// ```
/// use dossier_core::LlmConfig;
/// use dossier_insight::{select_engine, Credentials};
///
/// let config = LlmConfig {
///     provider: "made-up-backend".into(),
///     ..LlmConfig::default()
/// };
/// let engine = select_engine(&config, &Credentials::default());
/// assert_eq!(engine.name(), "rules");
/// ```
pub fn select_engine(config: &LlmConfig, creds: &Credentials) -> Box<dyn ReasoningEngine> {
    let provider = if config.provider == "auto" {
        detect_provider(config, creds)
    } else {
        config.provider.clone()
    };

    match provider.as_str() {
        "mock" => Box::new(MockEngine),
        "rules" => Box::new(RuleEngine),
        "ollama" => Box::new(OllamaEngine::new(
            config.model.clone(),
            config.base_url.clone(),
        )),
        "openai" => {
            match config.api_key.clone().or_else(|| creds.openai_key.clone()) {
                Some(key) => Box::new(OpenAiEngine::new(
                    key,
                    config.model.clone(),
                    config.base_url.clone(),
                )),
                None => {
                    warn!("no OpenAI API key available, falling back to rule-based reasoning");
                    Box::new(RuleEngine)
                }
            }
        }
        "anthropic" => {
            match config
                .api_key
                .clone()
                .or_else(|| creds.anthropic_key.clone())
            {
                Some(key) => Box::new(AnthropicEngine::new(
                    key,
                    config.model.clone(),
                    config.base_url.clone(),
                )),
                None => {
                    warn!("no Anthropic API key available, falling back to rule-based reasoning");
                    Box::new(RuleEngine)
                }
            }
        }
        other => {
            warn!("unknown provider '{other}', falling back to rule-based reasoning");
            Box::new(RuleEngine)
        }
    }
}

fn detect_provider(config: &LlmConfig, creds: &Credentials) -> String {
    if config.api_key.is_some() || creds.openai_key.is_some() {
        info!("auto-selected openai reasoning engine");
        return "openai".into();
    }
    if creds.anthropic_key.is_some() {
        info!("auto-selected anthropic reasoning engine");
        return "anthropic".into();
    }
    info!("no backend credentials available, using rule-based reasoning");
    "rules".into()
}

/// Availability of one reasoning provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    /// Provider name as accepted by `--provider`.
    pub name: &'static str,
    /// Whether this provider needs an API key.
    pub requires_key: bool,
    /// Whether a usable key was found.
    pub has_key: bool,
    /// Human-readable readiness line.
    pub status: &'static str,
}

/// List every provider with its readiness, for the `providers` subcommand.
///
/// # Examples
///
/// ```
/// use dossier_insight::{provider_status, Credentials};
///
/// let statuses = provider_status(&Credentials::default());
/// assert!(statuses.iter().any(|s| s.name == "rules" && s.has_key));
/// ```
pub fn provider_status(creds: &Credentials) -> Vec<ProviderStatus> {
    vec![
        ProviderStatus {
            name: "openai",
            requires_key: true,
            has_key: creds.openai_key.is_some(),
            status: if creds.openai_key.is_some() {
                "ready to use"
            } else {
                "needs OPENAI_API_KEY"
            },
        },
        ProviderStatus {
            name: "anthropic",
            requires_key: true,
            has_key: creds.anthropic_key.is_some(),
            status: if creds.anthropic_key.is_some() {
                "ready to use"
            } else {
                "needs ANTHROPIC_API_KEY"
            },
        },
        ProviderStatus {
            name: "ollama",
            requires_key: false,
            has_key: true,
            status: "local models, needs a running daemon",
        },
        ProviderStatus {
            name: "rules",
            requires_key: false,
            has_key: true,
            status: "rule-based reasoning, works offline",
        },
        ProviderStatus {
            name: "mock",
            requires_key: false,
            has_key: true,
            status: "fixed templates",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.into(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn explicit_mock_and_rules() {
        assert_eq!(
            select_engine(&config("mock"), &Credentials::default()).name(),
            "mock"
        );
        assert_eq!(
            select_engine(&config("rules"), &Credentials::default()).name(),
            "rules"
        );
    }

    #[test]
    fn unknown_provider_falls_back_to_rules() {
        let engine = select_engine(&config("gpt-neo-self-hosted"), &Credentials::default());
        assert_eq!(engine.name(), "rules");
    }

    #[test]
    fn openai_without_key_falls_back_to_rules() {
        let engine = select_engine(&config("openai"), &Credentials::default());
        assert_eq!(engine.name(), "rules");
    }

    #[test]
    fn openai_with_key_is_selected() {
        let creds = Credentials {
            openai_key: Some("sk-test".into()),
            anthropic_key: None,
        };
        assert_eq!(select_engine(&config("openai"), &creds).name(), "openai");
    }

    #[test]
    fn explicit_key_overrides_missing_env() {
        let mut cfg = config("anthropic");
        cfg.api_key = Some("sk-ant-test".into());
        assert_eq!(
            select_engine(&cfg, &Credentials::default()).name(),
            "anthropic"
        );
    }

    #[test]
    fn auto_prefers_openai_then_anthropic_then_rules() {
        let both = Credentials {
            openai_key: Some("a".into()),
            anthropic_key: Some("b".into()),
        };
        assert_eq!(select_engine(&config("auto"), &both).name(), "openai");

        let anthropic_only = Credentials {
            openai_key: None,
            anthropic_key: Some("b".into()),
        };
        assert_eq!(
            select_engine(&config("auto"), &anthropic_only).name(),
            "anthropic"
        );

        assert_eq!(
            select_engine(&config("auto"), &Credentials::default()).name(),
            "rules"
        );
    }

    #[test]
    fn ollama_needs_no_key() {
        assert_eq!(
            select_engine(&config("ollama"), &Credentials::default()).name(),
            "ollama"
        );
    }

    #[test]
    fn provider_status_lists_all_backends() {
        let statuses = provider_status(&Credentials::default());
        let names: Vec<_> = statuses.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["openai", "anthropic", "ollama", "rules", "mock"]);
        assert!(statuses.iter().all(|s| !s.requires_key || !s.has_key));
    }
}
