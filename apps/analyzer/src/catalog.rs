//! Model catalog: the providers and models the analyzer can talk to.
//!
//! Pure data. The first entry of each provider's list is its default model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// One of the three supported AI vendors.
///
/// Serialized as its wire id. Deserializing goes through `FromStr`, so an
/// unknown id fails with "Unsupported provider: <id>".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Anthropic, Provider::Google];

    /// Wire identifier, as persisted in settings and read from the environment.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Google => "Google AI",
        }
    }

    /// Where a user creates an API key for this provider.
    pub fn key_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://platform.openai.com/api-keys",
            Provider::Anthropic => "https://console.anthropic.com/settings/keys",
            Provider::Google => "https://makersuite.google.com/app/apikey",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        provider.id().to_string()
    }
}

impl TryFrom<String> for Provider {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Provider {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "google" => Ok(Provider::Google),
            _ => Err(AnalysisError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// Which request field carries the output-length cap on OpenAI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimitParam {
    MaxTokens,
    /// Required by the GPT-5 and o-series reasoning models.
    MaxCompletionTokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCapabilities {
    pub supports_temperature: bool,
    pub token_limit: TokenLimitParam,
}

impl ModelCapabilities {
    const CLASSIC: Self = Self {
        supports_temperature: true,
        token_limit: TokenLimitParam::MaxTokens,
    };
    const REASONING: Self = Self {
        supports_temperature: false,
        token_limit: TokenLimitParam::MaxCompletionTokens,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: ModelCapabilities,
}

const fn model(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    capabilities: ModelCapabilities,
) -> ModelInfo {
    ModelInfo {
        id,
        name,
        description,
        capabilities,
    }
}

const OPENAI_MODELS: &[ModelInfo] = &[
    model("gpt-5", "GPT-5", "Most advanced OpenAI model", ModelCapabilities::REASONING),
    model("gpt-5-mini", "GPT-5 Mini", "Efficient GPT-5 variant", ModelCapabilities::REASONING),
    model("o3", "o3", "Advanced reasoning model", ModelCapabilities::REASONING),
    model("o3-mini", "o3 Mini", "Compact reasoning model", ModelCapabilities::REASONING),
    model("gpt-4o", "GPT-4o", "Previous generation multimodal", ModelCapabilities::CLASSIC),
];

const ANTHROPIC_MODELS: &[ModelInfo] = &[
    model(
        "claude-4.5-opus",
        "Claude 4.5 Opus",
        "Most powerful Claude model",
        ModelCapabilities::CLASSIC,
    ),
    model(
        "claude-4.5-sonnet",
        "Claude 4.5 Sonnet",
        "Balanced performance",
        ModelCapabilities::CLASSIC,
    ),
    model("claude-4-opus", "Claude 4 Opus", "Previous flagship", ModelCapabilities::CLASSIC),
    model(
        "claude-3-5-sonnet-20241022",
        "Claude 3.5 Sonnet",
        "Still highly capable",
        ModelCapabilities::CLASSIC,
    ),
];

const GOOGLE_MODELS: &[ModelInfo] = &[
    model(
        "gemini-2.5-pro",
        "Gemini 2.5 Pro",
        "Most advanced Gemini model",
        ModelCapabilities::CLASSIC,
    ),
    model("gemini-2.5-flash", "Gemini 2.5 Flash", "Fast and efficient", ModelCapabilities::CLASSIC),
    model("gemini-2.0-pro", "Gemini 2.0 Pro", "Powerful reasoning", ModelCapabilities::CLASSIC),
    model(
        "gemini-1.5-pro-latest",
        "Gemini 1.5 Pro",
        "Previous generation",
        ModelCapabilities::CLASSIC,
    ),
];

/// Ordered model list for a provider. Never empty.
pub fn models(provider: Provider) -> &'static [ModelInfo] {
    match provider {
        Provider::OpenAi => OPENAI_MODELS,
        Provider::Anthropic => ANTHROPIC_MODELS,
        Provider::Google => GOOGLE_MODELS,
    }
}

pub fn default_model(provider: Provider) -> &'static ModelInfo {
    &models(provider)[0]
}

pub fn find_model(provider: Provider, id: &str) -> Option<&'static ModelInfo> {
    models(provider).iter().find(|m| m.id == id)
}

pub fn is_supported(provider: Provider, id: &str) -> bool {
    find_model(provider, id).is_some()
}

/// Request-shape capabilities for a model id.
///
/// Catalog entries answer from the table. Ids the catalog doesn't know
/// (caller overrides such as `gpt-5-nano`) fall back to family rules.
pub fn capabilities(provider: Provider, id: &str) -> ModelCapabilities {
    if let Some(info) = find_model(provider, id) {
        return info.capabilities;
    }

    let uses_completion_tokens = id.contains("gpt-5") || id.contains("o3");
    let rejects_temperature = id.contains("gpt-5") || id.contains("o1") || id.contains("o3");

    ModelCapabilities {
        supports_temperature: !rejects_temperature,
        token_limit: if uses_completion_tokens {
            TokenLimitParam::MaxCompletionTokens
        } else {
            TokenLimitParam::MaxTokens
        },
    }
}
