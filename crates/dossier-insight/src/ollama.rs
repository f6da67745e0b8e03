use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use dossier_signals::TechnicalSignals;

use crate::prompt::{build_prompt, parse_insights};
use crate::{fallback_insights, Insights, ReasoningEngine};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3:latest";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Locally-hosted model wrapper using the Ollama generate API.
///
/// No key required. Shares the fail-to-fallback contract with the hosted
/// wrappers; a missing Ollama daemon degrades, it does not abort.
///
/// # Examples
///
/// ```
/// use dossier_insight::{OllamaEngine, ReasoningEngine};
///
/// let engine = OllamaEngine::new(None, None);
/// assert_eq!(engine.name(), "ollama");
/// assert_eq!(engine.model(), "llama3:latest");
/// ```
pub struct OllamaEngine {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl OllamaEngine {
    /// Create an engine with an optional model and base URL.
    pub fn new(model: Option<String>, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Model identifier in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: String) -> Result<String, String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
            format: "json",
            options: GenerateOptions { temperature: 0.3 },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    format!(
                        "failed to connect to Ollama at {}; is the daemon running?",
                        self.base_url
                    )
                } else {
                    format!("request failed: {e}")
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error {status}: {body}"));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map(|r| r.response)
            .map_err(|e| format!("failed to parse response: {e}"))
    }
}

#[async_trait]
impl ReasoningEngine for OllamaEngine {
    async fn reason(&self, signals: &TechnicalSignals, content: &str) -> Insights {
        let prompt = build_prompt(signals, content);
        match self.generate(prompt).await {
            Ok(reply) => parse_insights(&reply).unwrap_or_else(|| {
                warn!("ollama reply was not parseable, using fallback insights");
                fallback_insights()
            }),
            Err(e) => {
                warn!("ollama reasoning failed: {e}");
                fallback_insights()
            }
        }
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
