//! OpenAI Chat Completions adapter.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::{user_message, SYSTEM_PROMPT};
use super::{send, MAX_OUTPUT_TOKENS};
use crate::catalog::{self, Provider, TokenLimitParam};
use crate::errors::AdapterError;
use crate::settings::ProviderConfig;

/// Fixed sampling seed, sent alongside `temperature: 0`.
const SEED: u64 = 42;

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Builds the request body. Reasoning-class models reject `temperature` and
/// take `max_completion_tokens` instead of `max_tokens`.
pub(crate) fn build_request<'a>(model: &'a str, user_content: &'a str) -> ChatRequest<'a> {
    let caps = catalog::capabilities(Provider::OpenAi, model);

    let (temperature, seed) = if caps.supports_temperature {
        (Some(0.0), Some(SEED))
    } else {
        (None, None)
    };
    let (max_tokens, max_completion_tokens) = match caps.token_limit {
        TokenLimitParam::MaxTokens => (Some(MAX_OUTPUT_TOKENS), None),
        TokenLimitParam::MaxCompletionTokens => (None, Some(MAX_OUTPUT_TOKENS)),
    };

    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: user_content,
            },
        ],
        response_format: ResponseFormat {
            kind: "json_object",
        },
        temperature,
        seed,
        max_tokens,
        max_completion_tokens,
    }
}

pub(crate) async fn complete(
    client: &Client,
    base_url: &str,
    config: &ProviderConfig,
    job_description: &str,
) -> Result<String, AdapterError> {
    let user_content = user_message(job_description);
    let body = build_request(&config.model, &user_content);

    let request = client
        .post(format!("{base_url}/v1/chat/completions"))
        .bearer_auth(&config.api_key)
        .json(&body);

    let response: ChatResponse = send(request).await?.json().await?;

    if let Some(usage) = &response.usage {
        debug!(
            "OpenAI call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
            config.model, usage.prompt_tokens, usage.completion_tokens
        );
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.is_empty())
        .ok_or(AdapterError::EmptyContent(Provider::OpenAi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::{json, Value};

    fn body_for(model: &str) -> Value {
        serde_json::to_value(build_request(model, "jd")).unwrap()
    }

    #[test]
    fn test_gpt5_uses_completion_tokens_without_temperature() {
        for model in ["gpt-5", "gpt-5-mini", "gpt-5-nano"] {
            let body = body_for(model);
            assert_eq!(body["max_completion_tokens"], 4000, "{model}");
            assert!(body.get("max_tokens").is_none(), "{model}");
            assert!(body.get("temperature").is_none(), "{model}");
            assert!(body.get("seed").is_none(), "{model}");
        }
    }

    #[test]
    fn test_o3_uses_completion_tokens_without_temperature() {
        for model in ["o3", "o3-mini", "o3-pro"] {
            let body = body_for(model);
            assert_eq!(body["max_completion_tokens"], 4000, "{model}");
            assert!(body.get("max_tokens").is_none(), "{model}");
            assert!(body.get("temperature").is_none(), "{model}");
        }
    }

    #[test]
    fn test_gpt4o_uses_max_tokens_and_zero_temperature() {
        let body = body_for("gpt-4o");
        assert_eq!(body["max_tokens"], 4000);
        assert!(body.get("max_completion_tokens").is_none());
        assert_eq!(body["temperature"].as_f64(), Some(0.0));
        assert_eq!(body["seed"], 42);
    }

    #[test]
    fn test_request_shape() {
        let body = body_for("gpt-4o");
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "jd"}));
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let reply = json!({
            "choices": [{"message": {"role": "assistant",
                "content": "{\"summary\":\"s\",\"technologies\":[],\"roadmap\":[]}"}}],
            "usage": {"prompt_tokens": 900, "completion_tokens": 40}
        });
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-5",
                "max_completion_tokens": 4000
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply.to_string())
            .create_async()
            .await;

        let config = ProviderConfig::new(Provider::OpenAi, "sk-test");
        let text = complete(&Client::new(), &server.url(), &config, "Rust engineer")
            .await
            .unwrap();

        assert_eq!(text, r#"{"summary":"s","technologies":[],"roadmap":[]}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_passes_vendor_error_message_through() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#)
            .create_async()
            .await;

        let config = ProviderConfig::new(Provider::OpenAi, "bad");
        let err = complete(&Client::new(), &server.url(), &config, "jd")
            .await
            .unwrap_err();

        match err {
            AdapterError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let config = ProviderConfig::new(Provider::OpenAi, "k");
        let err = complete(&Client::new(), &server.url(), &config, "jd")
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::EmptyContent(Provider::OpenAi)));
    }
}
