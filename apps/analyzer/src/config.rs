use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::catalog::Provider;
use crate::llm_client::{ClientOptions, Endpoints, DEFAULT_TIMEOUT};
use crate::errors::AnalysisError;
use crate::settings::ProviderConfig;

const DEFAULT_SETTINGS_PATH: &str = "analyzer-settings.json";

/// Runtime configuration loaded from environment variables (and `.env`).
///
/// Everything is optional: values given here override the saved settings
/// file, which in turn overrides the built-in defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub keys: ApiKeys,
    pub settings_path: PathBuf,
    pub save_settings: bool,
    pub http_timeout: Duration,
    pub endpoints: Endpoints,
    pub rust_log: String,
}

/// API keys found in the environment. `explicit` (`ANALYZER_API_KEY`) wins
/// over the vendors' conventional variables.
#[derive(Clone, Default)]
pub struct ApiKeys {
    pub explicit: Option<String>,
    pub openai: Option<String>,
    pub anthropic: Option<String>,
    pub google: Option<String>,
}

impl ApiKeys {
    fn for_provider(&self, provider: Provider) -> Option<&str> {
        let vendor = match provider {
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
            Provider::Google => &self.google,
        };
        self.explicit.as_deref().or(vendor.as_deref())
    }
}

/// Environment variable conventionally holding a vendor's key.
pub fn vendor_key_var(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => "OPENAI_API_KEY",
        Provider::Anthropic => "ANTHROPIC_API_KEY",
        Provider::Google => "GEMINI_API_KEY",
    }
}

/// User-facing message for a run that had no key: where to put one and
/// where to get one.
pub fn missing_key_hint(provider: Provider) -> String {
    format!(
        "{} Set ANALYZER_API_KEY or {}. Create a {} key at {}",
        AnalysisError::MissingApiKey,
        vendor_key_var(provider),
        provider,
        provider.key_url()
    )
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("explicit", &self.explicit.is_some())
            .field("openai", &self.openai.is_some())
            .field("anthropic", &self.anthropic.is_some())
            .field("google", &self.google.is_some())
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let defaults = Endpoints::default();

        Ok(Config {
            provider: var("ANALYZER_PROVIDER")
                .map(|p| p.parse::<Provider>())
                .transpose()
                .context("ANALYZER_PROVIDER must be one of: openai, anthropic, google")?,
            model: var("ANALYZER_MODEL"),
            keys: ApiKeys {
                explicit: var("ANALYZER_API_KEY"),
                openai: var("OPENAI_API_KEY"),
                anthropic: var("ANTHROPIC_API_KEY"),
                google: var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")),
            },
            settings_path: var("ANALYZER_SETTINGS_PATH")
                .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string())
                .into(),
            save_settings: var("ANALYZER_SAVE_SETTINGS")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            http_timeout: var("HTTP_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>().map(Duration::from_secs))
                .transpose()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?
                .unwrap_or(DEFAULT_TIMEOUT),
            endpoints: Endpoints {
                openai: var("OPENAI_BASE_URL").unwrap_or(defaults.openai),
                anthropic: var("ANTHROPIC_BASE_URL").unwrap_or(defaults.anthropic),
                google: var("GEMINI_BASE_URL").unwrap_or(defaults.google),
            },
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            endpoints: self.endpoints.clone(),
            timeout: self.http_timeout,
        }
    }

    /// Layers the environment over previously saved settings.
    ///
    /// Switching provider through the environment resets the model to that
    /// provider's default unless `ANALYZER_MODEL` is also set.
    pub fn resolve(&self, saved: Option<ProviderConfig>) -> ProviderConfig {
        let mut config = saved.unwrap_or_default();

        if let Some(provider) = self.provider {
            if provider != config.provider {
                config = config.with_provider(provider);
            }
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }

        if let Some(key) = self.keys.for_provider(config.provider) {
            config = config.with_api_key(key);
        }

        config
    }
}
