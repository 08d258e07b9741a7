//! Suggestion and chat lookups over HTTP

use crate::config::AssistConfig;
use crate::error::{AssistError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client seam for the assist endpoints.
///
/// The editor core only ever talks to this trait, so tests can substitute a
/// scripted implementation and the host application can swap transports
/// without touching the completion pipeline.
#[async_trait]
pub trait SuggestionClient: Send + Sync {
    /// Request an inline continuation of `text`.
    ///
    /// Returns the raw continuation, which may be empty or whitespace-only
    /// when the service has nothing useful to add. Callers decide whether a
    /// blank continuation is worth showing.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable response body.
    async fn suggest(&self, text: &str) -> Result<String>;

    /// Send one free-form chat message and return the reply.
    ///
    /// # Errors
    ///
    /// Same failure surface as [`suggest`](Self::suggest).
    async fn chat(&self, message: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct SuggestRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    suggestion: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    reply: String,
}

/// HTTP implementation of [`SuggestionClient`]
pub struct HttpAssistClient {
    client: reqwest::Client,
    config: AssistConfig,
    timeout: Duration,
}

impl HttpAssistClient {
    /// Create a client from a validated configuration
    pub fn new(config: AssistConfig) -> Result<Self> {
        config.validate().map_err(AssistError::ConfigError)?;

        Ok(Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(config.timeout_secs),
            config,
        })
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        tracing::debug!("Requesting {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AssistError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistError::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| AssistError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl SuggestionClient for HttpAssistClient {
    async fn suggest(&self, text: &str) -> Result<String> {
        let response: SuggestResponse = self
            .post_json(&self.config.suggest_url, &SuggestRequest { text })
            .await?;

        Ok(response.suggestion)
    }

    async fn chat(&self, message: &str) -> Result<String> {
        let response: ChatResponse = self
            .post_json(&self.config.chat_url, &ChatRequest { message })
            .await?;

        Ok(response.reply)
    }
}
