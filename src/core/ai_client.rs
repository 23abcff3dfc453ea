//! OpenRouter chat completions 客戶端
//!
//! 每次 `generate` 只發一次請求，不重試。缺 API key 時在送出請求前就回
//! `MissingCredential`。

use crate::domain::model::body_snippet;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{ItweetError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

const REFERER: &str = "https://github.com/itweet/itweet";
const APP_TITLE: &str = "iTweet";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenRouterClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    timeout: Duration,
}

impl OpenRouterClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            endpoint: OPENROUTER_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call_api(&self, api_key: &str, prompt: &str) -> Result<String> {
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!("🤖 Calling {} with model {}", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("🤖 Response status: {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(ItweetError::RemoteRejection {
                status: status.as_u16(),
                body: body_snippet(&body),
            });
        }

        parse_completion(&body)
    }
}

/// 取第一個 choice 的內容並去掉前後空白
fn parse_completion(body: &str) -> Result<String> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| ItweetError::MalformedResponse {
            message: format!("Failed to parse API response: {}", e),
        })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ItweetError::MalformedResponse {
            message: "Unexpected API response format".to_string(),
        })
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(ItweetError::MissingCredential)?;
        self.call_api(api_key, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> OpenRouterClient {
        OpenRouterClient::new(Some("test-key".to_string()))
            .with_endpoint(server.url("/api/v1/chat/completions"))
            .with_model("test/model")
    }

    #[tokio::test]
    async fn test_generate_returns_trimmed_first_choice() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .header("x-title", "iTweet")
                .json_body(json!({
                    "model": "test/model",
                    "messages": [{"role": "user", "content": "hello"}]
                }));
            then.status(200).json_body(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "  Hi there!\n"}},
                    {"message": {"role": "assistant", "content": "ignored"}}
                ]
            }));
        });

        let text = client_for(&server).generate("hello").await.unwrap();

        api_mock.assert();
        assert_eq!(text, "Hi there!");
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let client = OpenRouterClient::new(Some("   ".to_string()))
            .with_endpoint(server.url("/api/v1/chat/completions"));
        let err = client.generate("hello").await.unwrap_err();

        assert!(matches!(err, ItweetError::MissingCredential));
        api_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_non_2xx_is_remote_rejection_with_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(401).body(r#"{"error":{"message":"No auth credentials found"}}"#);
        });

        let err = client_for(&server).generate("hello").await.unwrap_err();

        match err {
            ItweetError::RemoteRejection { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("No auth credentials found"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_choices_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200).json_body(json!({"choices": []}));
        });

        let err = client_for(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, ItweetError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200).body("<html>gateway</html>");
        });

        let err = client_for(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, ItweetError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!({"choices": [{"message": {"content": "late"}}]}));
        });

        let client = client_for(&server).with_timeout(Duration::from_millis(100));
        let err = client.generate("hello").await.unwrap_err();

        assert!(matches!(err, ItweetError::TransportFailure { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let client = OpenRouterClient::new(Some("test-key".to_string()))
            .with_endpoint("http://127.0.0.1:1/v1/chat/completions");
        let err = client.generate("hello").await.unwrap_err();

        assert!(matches!(err, ItweetError::TransportFailure { .. }));
    }

    #[test]
    fn test_parse_completion_without_content_is_malformed() {
        let err = parse_completion(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap_err();
        assert!(matches!(err, ItweetError::MalformedResponse { .. }));
    }
}
