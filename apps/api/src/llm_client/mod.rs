/// LLM Client: the single point of entry for generative model calls.
///
/// No other module calls the Anthropic API directly. The pipeline depends on
/// the `TextModel` trait so the backend can be swapped or scripted in tests.
///
/// One attempt per call: failures fall through to the fallback record, and the
/// caller may re-submit.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model for proposal analysis.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("API key rejected by upstream")]
    Unauthorized,

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Credential misconfiguration is the one upstream failure worth surfacing.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, LlmError::Unauthorized)
    }
}

/// Generation parameters sent with every call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on a single call, enforced by the caller.
    pub timeout: Duration,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.5,
            max_tokens: 3000,
            timeout: Duration::from_secs(60),
        }
    }
}

/// A generative text backend: one prompt in, free-form text out.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str, params: &ModelParams) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API backend.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
        })
    }

    /// Makes a single call to the Messages API, returning the full response object.
    pub async fn call(&self, prompt: &str, params: &ModelParams) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &params.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(params.timeout)
                } else {
                    LlmError::Http(e)
                }
            })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(LlmError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: model={}, input_tokens={}, output_tokens={}",
            params.model, llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl TextModel for LlmClient {
    async fn generate(&self, prompt: &str, params: &ModelParams) -> Result<String, LlmError> {
        let response = self.call(prompt, params).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Scripted backends for pipeline and router tests.
#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, Clone)]
    pub enum Script {
        Reply(String),
        Status(u16),
        Unauthorized,
        /// Never answers within any reasonable timeout.
        Hang,
    }

    pub struct ScriptedModel {
        script: Script,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        pub fn new(script: Script) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn reply(text: impl Into<String>) -> Self {
            Self::new(Script::Reply(text.into()))
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        async fn generate(&self, _prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Script::Reply(text) => Ok(text.clone()),
                Script::Status(status) => Err(LlmError::Api {
                    status: *status,
                    message: "scripted failure".to_string(),
                }),
                Script::Unauthorized => Err(LlmError::Unauthorized),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(LlmError::EmptyContent)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_picks_first_text_block() {
        let json = r#"{
            "content": [
                {"type": "tool_use", "text": null},
                {"type": "text", "text": "{\"key\": \"value\"}"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("{\"key\": \"value\"}"));
    }

    #[test]
    fn test_response_blank_text_is_none() {
        let json = r#"{
            "content": [{"type": "text", "text": "   "}],
            "usage": {"input_tokens": 10, "output_tokens": 0}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_request_carries_generation_params() {
        let params = ModelParams::default();
        let body = AnthropicRequest {
            model: &params.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: "hello",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], DEFAULT_MODEL);
        assert_eq!(value["max_tokens"], 3000);
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn test_only_unauthorized_is_credential_error() {
        assert!(LlmError::Unauthorized.is_credential_error());
        assert!(!LlmError::EmptyContent.is_credential_error());
        assert!(!LlmError::Api {
            status: 500,
            message: String::new()
        }
        .is_credential_error());
    }
}
