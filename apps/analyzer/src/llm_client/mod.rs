/// LLM client: the single point of entry for all AI vendor calls in the analyzer.
///
/// ARCHITECTURAL RULE: No other module may call a vendor API directly.
/// One adapter per provider lives in this module; each turns a `ProviderConfig`
/// plus a job description into one outbound request and returns the reply text.
///
/// Clients are built per call and dropped afterwards. No retries: a failed call
/// is reported to the caller as-is.
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::analysis::AnalysisResult;
use crate::catalog::Provider;
use crate::errors::AdapterError;
use crate::settings::ProviderConfig;

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod prompts;

/// Output cap sent to every vendor.
pub const MAX_OUTPUT_TOKENS: u32 = 4000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Base URLs for the three vendor APIs. Overridable for proxies and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub openai: String,
    pub anthropic: String,
    pub google: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: "https://api.openai.com".to_string(),
            anthropic: "https://api.anthropic.com".to_string(),
            google: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl Endpoints {
    fn base_url(&self, provider: Provider) -> &str {
        let url = match provider {
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
            Provider::Google => &self.google,
        };
        url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub endpoints: Endpoints,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client bound to one set of vendor endpoints.
pub struct LlmClient {
    client: Client,
    endpoints: Endpoints,
}

impl LlmClient {
    pub fn new(options: &ClientOptions) -> Result<Self, AdapterError> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            client,
            endpoints: options.endpoints.clone(),
        })
    }

    /// Sends the analysis request to the configured provider and returns the
    /// raw reply text.
    pub async fn complete(
        &self,
        config: &ProviderConfig,
        job_description: &str,
    ) -> Result<String, AdapterError> {
        let base_url = self.endpoints.base_url(config.provider);
        match config.provider {
            Provider::OpenAi => {
                openai::complete(&self.client, base_url, config, job_description).await
            }
            Provider::Anthropic => {
                anthropic::complete(&self.client, base_url, config, job_description).await
            }
            Provider::Google => {
                google::complete(&self.client, base_url, config, job_description).await
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct VendorError {
    error: VendorErrorBody,
}

#[derive(Debug, Deserialize)]
struct VendorErrorBody {
    message: String,
}

/// Sends a prepared request. Non-2xx statuses become `AdapterError::Api`,
/// carrying the vendor's own error message when the body has one.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, AdapterError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("Vendor API returned {}: {}", status, body);
        // All three vendors nest the message under `error.message`
        let message = serde_json::from_str::<VendorError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(AdapterError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

/// Returns the balanced `{...}` span in `text` that starts earliest.
///
/// Braces inside JSON string literals are ignored. A `{` that never closes is
/// skipped in favour of the next one that does. Single pass over the text.
pub fn extract_json_object(text: &str) -> Option<&str> {
    // Positions of the `{`s still open, innermost last
    let mut open: Vec<usize> = Vec::new();
    // Earliest-starting span closed so far while an outer `{` stays open
    let mut best: Option<(usize, usize)> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                let Some(start) = open.pop() else { continue };
                if open.is_empty() {
                    return Some(&text[start..=i]);
                }
                if best.map_or(true, |(s, _)| start < s) {
                    best = Some((start, i));
                }
            }
            _ => {}
        }
    }

    best.map(|(start, end)| &text[start..=end])
}

/// Locates the JSON object in a model reply and validates it as an analysis.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AdapterError> {
    let json = extract_json_object(text).ok_or(AdapterError::NoJson)?;
    let value: Value = serde_json::from_str(json)?;
    AnalysisResult::from_value(value)
}
