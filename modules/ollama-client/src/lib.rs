//! Async client for a local Ollama text-generation endpoint.
//!
//! The endpoint is unreliable by nature: models time out, return non-JSON
//! despite `format: "json"`, or wrap output in Markdown fences. The client
//! absorbs all of that: every failure mode retries immediately up to the
//! attempt bound, and exhaustion yields `None` instead of an error. Callers
//! only ever see a parsed JSON object or absence.

pub mod types;

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, warn};

pub use types::{GenerateRequest, GenerateResponse};

/// Per-attempt deadline for one generation call.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Send a prompt and return the parsed JSON object, or `None` once all
    /// attempts are exhausted. Transport errors, non-200 statuses, and
    /// unparseable response text all burn an attempt; nothing propagates as
    /// an error past this boundary.
    pub async fn generate_json(&self, prompt: &str, max_retries: u32) -> Option<Value> {
        let url = format!("{}/api/generate", self.base_url);
        let payload = GenerateRequest {
            model: &self.model,
            prompt,
            format: "json",
            stream: false,
        };

        for attempt in 1..=max_retries {
            debug!(attempt, max_retries, model = %self.model, "Ollama generate request");

            let response = match self
                .http
                .post(&url)
                .timeout(GENERATE_TIMEOUT)
                .json(&payload)
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    error!(attempt, max_retries, error = %err, "Ollama connection error");
                    continue;
                }
            };

            if response.status() != reqwest::StatusCode::OK {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!(attempt, max_retries, status = %status, body = %body, "Ollama HTTP error");
                continue;
            }

            let parsed: GenerateResponse = match response.json().await {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(attempt, max_retries, error = %err, "Malformed Ollama response body");
                    continue;
                }
            };

            let text = strip_code_fences(&parsed.response);
            match serde_json::from_str(text) {
                Ok(value) => return Some(value),
                Err(err) => {
                    let preview: String = text.chars().take(200).collect();
                    warn!(
                        attempt,
                        max_retries,
                        error = %err,
                        preview = %preview,
                        "Ollama response text is not valid JSON"
                    );
                    continue;
                }
            }
        }

        None
    }

    /// Sentiment/intent/keyword extraction for one comment. Returns the
    /// parsed object or `None`.
    pub async fn enrich_comment(&self, text: &str) -> Option<Value> {
        let prompt = format!(
            "Analyze the following Instagram comment and return a JSON with:\n\
             - sentiment_label: \"positive\", \"negative\", \"neutral\" or \"mixed\"\n\
             - sentiment_score: float number between -1.0 and 1.0\n\
             - intent: \"praise\", \"complaint\", \"question\", \"mention\", \"spam\" or \"other\"\n\
             - keywords: list of strings with main topics mentioned\n\n\
             Comment: {text}\n\n\
             Return ONLY the JSON, without additional text."
        );

        self.generate_json(&prompt, DEFAULT_MAX_RETRIES).await
    }

    /// Topic/tone/call-to-action extraction for one post caption. Returns
    /// the parsed object or `None`.
    pub async fn enrich_post(&self, caption: &str) -> Option<Value> {
        let prompt = format!(
            "Analyze the following Instagram post caption and return a JSON with:\n\
             - content_topic: \"sales\", \"educational\", \"lifestyle\" or \"humor\"\n\
             - tone: string describing the tone (e.g., \"professional\", \"urgent\", \"funny\")\n\
             - call_to_action_type: string describing the call to action type (e.g., \"link_bio\", \"comment\", \"none\")\n\n\
             Caption: {caption}\n\n\
             Return ONLY the JSON, without additional text."
        );

        self.generate_json(&prompt, DEFAULT_MAX_RETRIES).await
    }
}

/// Strip leading/trailing Markdown code-fence markers the model sometimes
/// wraps its JSON in.
fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}
