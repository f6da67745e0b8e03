use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use dossier_signals::TechnicalSignals;

use crate::prompt::{build_prompt, parse_insights, SYSTEM_PROMPT};
use crate::{fallback_insights, Insights, ReasoningEngine};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A message in a chat conversation with the backend.
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// OpenAI-compatible chat completions wrapper.
///
/// Works with any provider that exposes the `/v1/chat/completions` endpoint.
/// Call failures, timeouts, and unparseable replies all collapse to the
/// fallback bundle; this engine never errors.
///
/// # Examples
///
/// ```
/// use dossier_insight::{OpenAiEngine, ReasoningEngine};
///
/// let engine = OpenAiEngine::new("sk-test".into(), None, None);
/// assert_eq!(engine.name(), "openai");
/// ```
pub struct OpenAiEngine {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiEngine {
    /// Create an engine with an API key and optional model / base URL.
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Model identifier in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, prompt: String) -> Result<String, String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let messages = vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ];
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.3,
            "max_tokens": 2000,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(format!("API error {status}: {body_text}"));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("failed to parse response: {e}"))?;

        response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(String::from)
            .ok_or_else(|| format!("unexpected response structure: {response_body}"))
    }
}

#[async_trait]
impl ReasoningEngine for OpenAiEngine {
    async fn reason(&self, signals: &TechnicalSignals, content: &str) -> Insights {
        let prompt = build_prompt(signals, content);
        match self.chat(prompt).await {
            Ok(reply) => parse_insights(&reply).unwrap_or_else(|| {
                warn!("openai reply was not parseable, using fallback insights");
                fallback_insights()
            }),
            Err(e) => {
                warn!("openai reasoning failed: {e}");
                fallback_insights()
            }
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_core::{ActivityLevel, ProjectStatus, ProjectType};

    fn signals() -> TechnicalSignals {
        TechnicalSignals {
            languages: vec!["Rust".into()],
            frameworks: vec![],
            project_type: ProjectType::Cli,
            maturity: ProjectStatus::Mvp,
            activity: ActivityLevel::High,
            tech_stack: vec!["Rust".into()],
        }
    }

    #[test]
    fn default_model_applies() {
        let engine = OpenAiEngine::new("key".into(), None, None);
        assert_eq!(engine.model(), "gpt-4o-mini");

        let engine = OpenAiEngine::new("key".into(), Some("gpt-4o".into()), None);
        assert_eq!(engine.model(), "gpt-4o");
    }

    #[tokio::test]
    async fn network_failure_yields_fallback() {
        // Port 1 refuses connections; the engine must absorb the failure.
        let engine = OpenAiEngine::new("key".into(), None, Some("http://127.0.0.1:1".into()));
        let insights = engine.reason(&signals(), "content").await;
        assert_eq!(insights, fallback_insights());
    }
}
