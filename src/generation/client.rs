//! Generation client trait and the OpenAI-compatible HTTP implementation.
//!
//! The trait is the seam between the feed machinery and the hosted model:
//! the scheduler and the agent-creation path only ever see
//! [`GenerationClient`], so tests can substitute a scripted client and the
//! binary injects a single shared [`OpenAiCompatClient`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::{EchoError, Result};
use crate::generation::prompts;

/// A generated post candidate: content plus the generation timestamp.
///
/// The timestamp is stamped when the generation completes and becomes the
/// post's sole sort key.
#[derive(Debug, Clone)]
pub struct PostDraft {
    /// Generated post text.
    pub content: String,
    /// Generation completion time.
    pub timestamp: DateTime<Utc>,
}

/// Trait for persona/post generation backends.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Turn a free-text user prompt into a persona description.
    async fn create_persona(&self, prompt: &str) -> Result<String>;

    /// Generate one short post for the given persona description.
    async fn generate_post(&self, agent_prompt: &str) -> Result<PostDraft>;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible implementation
// ---------------------------------------------------------------------------

/// Minimal chat completion response shape.
///
/// Only the fields the client reads are deserialized.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Generation client backed by an OpenAI-compatible chat completions API.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiCompatClient {
    /// Create a client from the generation config section.
    ///
    /// The per-request timeout from the config is applied to every call,
    /// bounding worst-case cycle latency.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key reference cannot be resolved or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let api_key = config.api_key.resolve_or_empty()?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EchoError::Generation(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            model: config.api_model.clone(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Issue one non-streaming completion and return the assistant text.
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = completions_url(&self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let mut request = self.http.post(&url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EchoError::Generation(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EchoError::Generation(format!(
                "provider returned {status}: {}",
                truncate(&detail, 200)
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| EchoError::Generation(format!("invalid completion body: {e}")))?;

        // Empty or missing content is treated the same as a request failure.
        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(EchoError::Generation(
                "provider returned empty completion".to_owned(),
            ));
        }

        Ok(text.to_owned())
    }
}

#[async_trait]
impl GenerationClient for OpenAiCompatClient {
    async fn create_persona(&self, prompt: &str) -> Result<String> {
        debug!("creating persona from prompt ({} chars)", prompt.len());
        self.complete(
            prompts::PERSONA_SYSTEM_PROMPT,
            &prompts::persona_request(prompt),
        )
        .await
    }

    async fn generate_post(&self, agent_prompt: &str) -> Result<PostDraft> {
        let content = self
            .complete(prompts::POST_SYSTEM_PROMPT, &prompts::post_request(agent_prompt))
            .await?;
        Ok(PostDraft {
            content,
            timestamp: Utc::now(),
        })
    }
}

/// Build the completions endpoint URL from a configured base.
///
/// Accepts bases with or without a trailing `/v1` or slash.
fn completions_url(base_url: &str) -> String {
    let base = base_url.strip_suffix("/v1").unwrap_or(base_url);
    let base = base.trim_end_matches('/');
    format!("{base}/v1/chat/completions")
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
