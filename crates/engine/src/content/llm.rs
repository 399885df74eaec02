//! Language-model client for product copy.
//!
//! OpenAI-style chat completions, JSON mode, single request. The generator
//! gives this backend exactly one attempt per product - on any failure it
//! falls back to the templated copy, so this client carries no retry logic.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

/// Default chat completions endpoint base.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model for copy generation.
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 700;

/// Language-model backend configuration.
#[derive(Clone)]
pub struct LlmConfig {
    /// API key for the backend.
    pub api_key: SecretString,
    /// Model name.
    pub model: String,
    /// API base URL (override for tests or proxies).
    pub base_url: String,
}

impl LlmConfig {
    /// Config with default model and endpoint.
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Errors from the language-model backend.
///
/// All of them route the caller to the templated fallback; none are retried.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-2xx response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Completion was missing or not the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Chat-completions client for product copy generation.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

/// Title/description pair produced by the model.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmCopy {
    pub title: String,
    #[serde(rename = "description")]
    pub description_html: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl LlmClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Parse`] if the API key cannot be used as a header
    /// value, or [`LlmError::Http`] if the HTTP client fails to build.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.expose_secret());
        let mut auth = HeaderValue::from_str(&auth)
            .map_err(|e| LlmError::Parse(format!("invalid API key for header: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Generate a title and HTML description for one product. Single attempt.
    ///
    /// # Errors
    ///
    /// Returns an error on any HTTP failure, non-2xx status, or response
    /// that is not the expected `{"title", "description"}` JSON object.
    #[instrument(skip(self), fields(model = %self.model))]
    pub async fn generate_copy(
        &self,
        niche: &str,
        index: usize,
        store_style: Option<&str>,
    ) -> Result<LlmCopy, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let style = store_style.unwrap_or("modern and trustworthy");
        let body = serde_json::json!({
            "model": self.model,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "response_format": {"type": "json_object"},
            "messages": [
                {
                    "role": "system",
                    "content": "You write concise, high-converting e-commerce product copy. \
                                Respond with a JSON object: {\"title\": string, \"description\": string}. \
                                The description is HTML (paragraphs, one list, one blockquote).",
                },
                {
                    "role": "user",
                    "content": format!(
                        "Write product #{index} for an online store in the '{niche}' niche. \
                         Brand voice: {style}. Keep the title under 70 characters."
                    ),
                },
            ],
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("completion had no choices".to_string()))?;

        let copy: LlmCopy = serde_json::from_str(&content)
            .map_err(|e| LlmError::Parse(format!("completion was not copy JSON: {e}")))?;

        if copy.title.trim().is_empty() || copy.description_html.trim().is_empty() {
            return Err(LlmError::Parse("completion had empty title or description".to_string()));
        }

        Ok(copy)
    }
}
