/// Region summaries from an LLM chat-completions API.
///
/// Each region prompt is sent as a single user message; the reply is expected
/// to be one HTML paragraph. Models like to wrap HTML in markdown fences, so
/// replies are cleaned before use. A failed region gets an inline error
/// paragraph and the other regions are still summarized.
///
/// Configuration comes from the environment (`.env` is honored):
///   OPENAI_API_KEY  required
///   OPENAI_MODEL    optional, defaults to gpt-4o

use html_escape::encode_text;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{info, warn};

use crate::logging::DataSource;

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_MODEL";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 400;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^```(?:html)?\s*|\s*```\s*$").expect("code fence pattern is valid")
});

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("summarizer request timed out after {0:?}")]
    Timeout(Duration),
    #[error("summarizer request failed: {0}")]
    Transport(String),
    #[error("summarizer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("summarizer returned no content")]
    EmptyResponse,
}

// ---------------------------------------------------------------------------
// Summarizer
// ---------------------------------------------------------------------------

#[allow(async_fn_in_trait)]
pub trait Summarizer {
    /// Returns the HTML paragraph for one prompt.
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

pub struct OpenAiSummarizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self, ServiceError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ServiceError::MissingApiKey)?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: model.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            url: OPENAI_CHAT_URL.to_string(),
        })
    }

    /// Reads `OPENAI_API_KEY` and `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::new(std::env::var(API_KEY_ENV).ok(), std::env::var(MODEL_ENV).ok())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                ServiceError::Timeout(REQUEST_TIMEOUT)
            } else {
                ServiceError::Transport(e.to_string())
            }
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status { status: status.as_u16(), body });
        }

        let reply: ChatResponse = response.json().await.map_err(classify)?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ServiceError::EmptyResponse)?;

        let cleaned = clean_summary(&content);
        if cleaned.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(cleaned)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strips markdown code fences and surrounding whitespace from a reply.
pub fn clean_summary(raw: &str) -> String {
    CODE_FENCE.replace_all(raw, "").trim().to_string()
}

/// Inline paragraph shown in place of a region summary that failed.
pub fn error_paragraph(err: &ServiceError) -> String {
    format!(
        "<p><strong>Error:</strong> Could not generate summary. {}</p>",
        encode_text(&err.to_string())
    )
}

/// Summarizes every prompt in order. Never fails: a region whose request
/// fails gets `error_paragraph` instead.
pub async fn summarize_all<S: Summarizer>(
    summarizer: &S,
    prompts: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut summaries = IndexMap::with_capacity(prompts.len());
    for (region, prompt) in prompts {
        let summary = match summarizer.summarize(prompt).await {
            Ok(summary) => {
                info!(region = %region, "summary generated");
                summary
            }
            Err(err) => {
                warn!(source = %DataSource::Llm, region = %region, "summary failed: {}", err);
                error_paragraph(&err)
            }
        };
        summaries.insert(region.clone(), summary);
    }
    summaries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
