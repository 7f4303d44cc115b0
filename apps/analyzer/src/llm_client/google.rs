//! Google Gemini `generateContent` adapter.
//!
//! Gemini gets the instruction inlined into a single user turn.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::combined_prompt;
use super::{send, MAX_OUTPUT_TOKENS};
use crate::catalog::Provider;
use crate::errors::AdapterError;
use crate::settings::ProviderConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

pub(crate) fn build_request(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.0,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}

pub(crate) async fn complete(
    client: &Client,
    base_url: &str,
    config: &ProviderConfig,
    job_description: &str,
) -> Result<String, AdapterError> {
    let prompt = combined_prompt(job_description);
    let body = build_request(&prompt);

    // Key goes in a header so it never shows up in a logged URL
    let request = client
        .post(format!(
            "{base_url}/v1beta/models/{}:generateContent",
            config.model
        ))
        .header("x-goog-api-key", &config.api_key)
        .json(&body);

    let response: GenerateResponse = send(request).await?.json().await?;

    if let Some(usage) = &response.usage_metadata {
        debug!(
            "Gemini call succeeded: model={}, prompt_tokens={}, candidate_tokens={}",
            config.model, usage.prompt_token_count, usage.candidates_token_count
        );
    }

    let text = response.text();
    if text.is_empty() {
        return Err(AdapterError::EmptyContent(Provider::Google));
    }
    Ok(text)
}
