use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use dossier_signals::TechnicalSignals;

use crate::prompt::{build_prompt, parse_insights, SYSTEM_PROMPT};
use crate::{fallback_insights, Insights, ReasoningEngine};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Anthropic messages API wrapper.
///
/// Same contract as the other hosted wrappers: any call or parse failure
/// collapses to the fallback bundle.
///
/// # Examples
///
/// ```
/// use dossier_insight::{AnthropicEngine, ReasoningEngine};
///
/// let engine = AnthropicEngine::new("sk-ant-test".into(), None, None);
/// assert_eq!(engine.name(), "anthropic");
/// ```
pub struct AnthropicEngine {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicEngine {
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

    async fn complete(&self, prompt: String) -> Result<String, String> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 2000,
            "temperature": 0.3,
            "system": SYSTEM_PROMPT,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
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
            .get("content")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("text"))
            .and_then(|t| t.as_str())
            .map(String::from)
            .ok_or_else(|| format!("unexpected response structure: {response_body}"))
    }
}

#[async_trait]
impl ReasoningEngine for AnthropicEngine {
    async fn reason(&self, signals: &TechnicalSignals, content: &str) -> Insights {
        let prompt = build_prompt(signals, content);
        match self.complete(prompt).await {
            Ok(reply) => parse_insights(&reply).unwrap_or_else(|| {
                warn!("anthropic reply was not parseable, using fallback insights");
                fallback_insights()
            }),
            Err(e) => {
                warn!("anthropic reasoning failed: {e}");
                fallback_insights()
            }
        }
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
