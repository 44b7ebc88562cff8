//! OpenAI-compatible chat-completion client.
//!
//! Works against any server exposing `POST {base_url}/chat/completions` with
//! bearer authentication.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{
  Error, Result,
  model::{ChatModel, CompletionRequest},
};

fn default_base_url() -> String { "https://api.openai.com/v1".to_owned() }
fn default_model() -> String { "gpt-5".to_owned() }
fn default_timeout_secs() -> u64 { 60 }

#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
  /// May be left empty in the config file and supplied through the
  /// environment instead.
  #[serde(default)]
  pub api_key:      String,
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  #[serde(default = "default_model")]
  pub model:        String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl OpenAiConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:      api_key.into(),
      base_url:     default_base_url(),
      model:        default_model(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl fmt::Debug for OpenAiConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OpenAiConfig")
      .field("api_key", &"<redacted>")
      .field("base_url", &self.base_url)
      .field("model", &self.model)
      .field("timeout_secs", &self.timeout_secs)
      .finish()
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Completion {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
  content: Option<String>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenAiClient {
  http:   reqwest::Client,
  config: OpenAiConfig,
}

impl OpenAiClient {
  pub fn new(config: OpenAiConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { http, config })
  }

  fn endpoint(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

#[async_trait]
impl ChatModel for OpenAiClient {
  async fn complete(&self, request: CompletionRequest) -> Result<String> {
    let messages: Vec<_> = request
      .messages
      .iter()
      .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
      .collect();

    let mut body = json!({
      "model": self.config.model,
      "messages": messages,
    });
    if request.json_response {
      body["response_format"] = json!({ "type": "json_object" });
    }

    tracing::debug!(
      model = %self.config.model,
      json = request.json_response,
      "chat completion request"
    );

    let response = self
      .http
      .post(self.endpoint())
      .bearer_auth(&self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(Error::Api { status: status.as_u16(), body });
    }

    let completion: Completion = response
      .json()
      .await
      .map_err(|e| Error::MalformedResponse(e.to_string()))?;

    Ok(
      completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default(),
    )
  }
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
  };

  use super::*;
  use crate::model::PromptMessage;

  fn client(server: &MockServer) -> OpenAiClient {
    let mut config = OpenAiConfig::new("sk-test");
    config.base_url = server.uri();
    OpenAiClient::new(config).unwrap()
  }

  fn request(json_response: bool) -> CompletionRequest {
    CompletionRequest {
      messages: vec![PromptMessage::system("sys"), PromptMessage::user("hi")],
      json_response,
    }
  }

  #[tokio::test]
  async fn sends_bearer_and_json_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .and(header("authorization", "Bearer sk-test"))
      .and(body_partial_json(json!({
        "model": "gpt-5",
        "response_format": { "type": "json_object" },
        "messages": [
          { "role": "system", "content": "sys" },
          { "role": "user", "content": "hi" },
        ],
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": "{\"ok\":true}" } }]
      })))
      .expect(1)
      .mount(&server)
      .await;

    let reply = client(&server).complete(request(true)).await.unwrap();
    assert_eq!(reply, "{\"ok\":true}");
  }

  #[tokio::test]
  async fn null_content_becomes_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": null } }]
      })))
      .mount(&server)
      .await;

    let reply = client(&server).complete(request(false)).await.unwrap();
    assert!(reply.is_empty());
  }

  #[tokio::test]
  async fn non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
      .mount(&server)
      .await;

    let err = client(&server).complete(request(false)).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 429, ref body } if body == "slow down"));
  }

  #[tokio::test]
  async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
      .mount(&server)
      .await;

    let err = client(&server).complete(request(false)).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
  }

  #[test]
  fn debug_redacts_key() {
    let shown = format!("{:?}", OpenAiConfig::new("sk-secret"));
    assert!(!shown.contains("sk-secret"));
  }
}
