//! OpenAI-compatible chat completion client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use finder_core::config::OracleConfig;
use finder_core::{Error, OracleClient, Result};

/// HTTP client for the classification oracle.
///
/// Speaks the chat-completions wire format with the response content type
/// forced to a single JSON object. The request timeout configured here is the
/// client's own contract: a hung endpoint fails the call instead of pinning a
/// worker slot.
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<Secret<String>>,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!("no oracle API key configured (FINDER__ORACLE__API_KEY or OPENROUTER_API_KEY)");
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::oracle_transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            timeout: config.timeout(),
        })
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Pull the first choice's content out of a completion response.
///
/// An empty choice list is an oracle failure, not a dispatcher bug.
fn extract_content(response: ChatCompletionResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::oracle_format("oracle returned no choices"))?;
    Ok(choice.message.content.trim().to_string())
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl OracleClient for CompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        tracing::debug!(
            model = %self.model,
            user_len = user.len(),
            "Calling classification oracle"
        );

        let mut request = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("oracle call exceeded {:?}", self.timeout))
            } else {
                Error::oracle_transport(format!("oracle request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::oracle_transport(format!(
                "oracle returned {}: {}",
                status,
                truncate(&body, 200)
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::oracle_format(format!("unparseable oracle response: {}", e)))?;

        extract_content(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_content_trims_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "  {\"service_id\": \"3\"}  "}}]}"#,
        )
        .unwrap();

        let content = extract_content(response).unwrap();
        assert_eq!(content, r#"{"service_id": "3"}"#);
    }

    #[test]
    fn empty_choices_is_format_error() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let result = extract_content(response);
        assert!(matches!(result, Err(Error::OracleFormat(_))));
    }

    #[test]
    fn missing_choices_field_is_format_error() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_content(response).is_err());
    }

    #[test]
    fn request_body_carries_json_object_format() {
        let body = ChatCompletionRequest {
            model: "openai/gpt-4o-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "classify",
                },
                ChatMessage {
                    role: "user",
                    content: "help me",
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "help me");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("cartão", 5), "cartã");
        assert_eq!(truncate("ok", 200), "ok");
    }
}
