//! Anthropic Messages API adapter.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::{user_message_json, SYSTEM_PROMPT};
use super::{send, MAX_OUTPUT_TOKENS};
use crate::catalog::Provider;
use crate::errors::AdapterError;
use crate::settings::ProviderConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
pub(crate) struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    /// Text of the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

pub(crate) fn build_request<'a>(model: &'a str, user_content: &'a str) -> AnthropicRequest<'a> {
    AnthropicRequest {
        model,
        max_tokens: MAX_OUTPUT_TOKENS,
        temperature: 0.0,
        system: SYSTEM_PROMPT,
        messages: vec![AnthropicMessage {
            role: "user",
            content: user_content,
        }],
    }
}

pub(crate) async fn complete(
    client: &Client,
    base_url: &str,
    config: &ProviderConfig,
    job_description: &str,
) -> Result<String, AdapterError> {
    let user_content = user_message_json(job_description);
    let body = build_request(&config.model, &user_content);

    let request = client
        .post(format!("{base_url}/v1/messages"))
        .header("x-api-key", &config.api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&body);

    let response: MessagesResponse = send(request).await?.json().await?;

    if let Some(usage) = &response.usage {
        debug!(
            "Anthropic call succeeded: model={}, input_tokens={}, output_tokens={}",
            config.model, usage.input_tokens, usage.output_tokens
        );
    }

    response
        .text()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(AdapterError::EmptyContent(Provider::Anthropic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(build_request("claude-4.5-sonnet", "jd")).unwrap();
        assert_eq!(body["model"], "claude-4.5-sonnet");
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["temperature"].as_f64(), Some(0.0));
        assert_eq!(body["system"], SYSTEM_PROMPT);
        assert_eq!(body["messages"], json!([{"role": "user", "content": "jd"}]));
    }

    #[tokio::test]
    async fn test_complete_returns_first_text_block() {
        let mut server = mockito::Server::new_async().await;
        let reply = json!({
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "Here you go: {\"summary\":\"s\",\"technologies\":[],\"roadmap\":[]}"}
            ],
            "usage": {"input_tokens": 1200, "output_tokens": 60}
        });
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "sk-ant")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-4.5-opus",
                "max_tokens": 4000
            })))
            .with_status(200)
            .with_body(reply.to_string())
            .create_async()
            .await;

        let config = ProviderConfig::new(Provider::Anthropic, "sk-ant");
        let text = complete(&Client::new(), &server.url(), &config, "Go developer")
            .await
            .unwrap();

        assert!(text.starts_with("Here you go: {"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_without_text_block_is_empty_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content":[{"type":"tool_use","id":"t1","name":"x","input":{}}]}"#)
            .create_async()
            .await;

        let config = ProviderConfig::new(Provider::Anthropic, "k");
        let err = complete(&Client::new(), &server.url(), &config, "jd")
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::EmptyContent(Provider::Anthropic)));
    }

    #[tokio::test]
    async fn test_complete_rate_limited_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(429)
            .with_body(r#"{"type":"error","error":{"type":"rate_limit_error","message":"Rate limited"}}"#)
            .expect(1)
            .create_async()
            .await;

        let config = ProviderConfig::new(Provider::Anthropic, "k");
        let err = complete(&Client::new(), &server.url(), &config, "jd")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AdapterError::Api { status: 429, ref message } if message == "Rate limited"
        ));
        mock.assert_async().await;
    }
}
