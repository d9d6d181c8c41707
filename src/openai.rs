//! Minimal OpenAI-compatible client, used as the text oracle.
//!
//! We only call chat.completions and request plain text; the pair extractor
//! deals with whatever shape comes back. Calls are instrumented and log model
//! names, latencies and token usage (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::error::OracleError;
use crate::oracle::TextOracle;
use crate::util::trunc_for_log;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub default_model: Option<String>,
  pub system_prompt: String,
  pub temperature: f32,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env(system_prompt: &str) -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let default_model = std::env::var("OPENAI_MODEL").ok().filter(|m| !m.trim().is_empty());
    let timeout = std::env::var("OPENAI_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout))
      .build()
      .ok()?;

    Some(Self {
      client,
      api_key,
      base_url: base_url.trim_end_matches('/').to_string(),
      default_model,
      system_prompt: system_prompt.to_string(),
      temperature: 0.7,
    })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  async fn chat_plain(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<String, OracleError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      max_tokens: None,
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "termatch-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| OracleError::Transport(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(OracleError::Http { status, message });
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| OracleError::Transport(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .unwrap_or_default().trim().to_string();

    if text.is_empty() {
      return Err(OracleError::EmptyCompletion);
    }
    Ok(text)
  }
}

#[async_trait]
impl TextOracle for OpenAI {
  #[instrument(level = "info", skip(self, instruction), fields(%model, instruction_len = instruction.len()))]
  async fn complete(&self, model: &str, instruction: &str) -> Result<String, OracleError> {
    let start = Instant::now();
    let result = self.chat_plain(model, &self.system_prompt, instruction, self.temperature).await;
    let elapsed = start.elapsed();
    match &result {
      Ok(text) => {
        info!(?elapsed, response_len = text.len(), "Model response received");
        debug!(preview = %trunc_for_log(text, 120), "Model response preview");
      }
      Err(e) => error!(?elapsed, error = %e, "Model call failed"),
    }
    result
  }

  fn describe(&self) -> String {
    format!("openai-compatible @ {}", self.base_url)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_body_message_is_extracted() {
    let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("Incorrect API key provided"));
    assert_eq!(extract_openai_error("<html>bad gateway</html>"), None);
  }

  #[test]
  fn request_omits_unset_max_tokens() {
    let req = ChatCompletionRequest {
      model: "gpt-4o-mini".into(),
      messages: vec![ChatMessageReq { role: "user".into(), content: "oi".into() }],
      temperature: 0.7,
      max_tokens: None,
    };
    let v = serde_json::to_value(&req).unwrap();
    assert!(v.get("max_tokens").is_none());
    assert_eq!(v["messages"][0]["role"], "user");
  }

  #[test]
  fn response_content_is_read_from_first_choice() {
    let body = r#"{"choices":[{"message":{"content":"  [] "}}],"usage":{"total_tokens":3}}"#;
    let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.choices[0].message.content.as_deref(), Some("  [] "));
    assert_eq!(parsed.usage.and_then(|u| u.total_tokens), Some(3));
  }
}
