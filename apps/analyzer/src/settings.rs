//! Provider settings and their client-local store.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::{self, Provider};
use crate::errors::AnalysisError;

/// Which vendor, key and model an analysis runs against.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
}

impl ProviderConfig {
    /// New config on the provider's default model.
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: catalog::default_model(provider).id.to_string(),
        }
    }

    /// Switches provider, keeping the key and resetting the model to the
    /// new provider's default.
    pub fn with_provider(self, provider: Provider) -> Self {
        Self {
            provider,
            model: catalog::default_model(provider).id.to_string(),
            ..self
        }
    }

    /// Overrides the model. Not checked against the catalog, so callers can
    /// target model ids the catalog doesn't list yet.
    pub fn with_model(self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..self
        }
    }

    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..self
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// True when the provider/model pair is declared in the catalog.
    pub fn is_catalog_pair(&self) -> bool {
        catalog::is_supported(self.provider, &self.model)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(Provider::OpenAi, "")
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "<empty>" })
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path}: {source}")]
    Provider {
        path: PathBuf,
        #[source]
        source: AnalysisError,
    },

    #[error("settings file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk shape of a saved config. The provider stays a plain string until
/// it is parsed, so an unknown id surfaces as `UnsupportedProvider`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredConfig {
    provider: String,
    api_key: String,
    model: String,
}

/// JSON file holding the last-used [`ProviderConfig`] on this machine.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<ProviderConfig>, SettingsError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let stored: StoredConfig =
            serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
                path: self.path.clone(),
                source,
            })?;
        let provider = stored
            .provider
            .parse::<Provider>()
            .map_err(|source| SettingsError::Provider {
                path: self.path.clone(),
                source,
            })?;
        let config = ProviderConfig {
            provider,
            api_key: stored.api_key,
            model: stored.model,
        };
        debug!("Loaded settings from {}", self.path.display());
        Ok(Some(config))
    }

    pub fn save(&self, config: &ProviderConfig) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(config).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Removes the saved settings. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<(), SettingsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SettingsError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_openai_default_model_without_key() {
        let config = ProviderConfig::default();
        assert_eq!(config.provider, Provider::OpenAi);
        assert_eq!(config.model, "gpt-5");
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_switching_provider_resets_model_for_every_catalog_pair() {
        for from in Provider::ALL {
            for info in catalog::models(from) {
                for to in Provider::ALL {
                    let switched = ProviderConfig::new(from, "sk-test")
                        .with_model(info.id)
                        .with_provider(to);
                    assert_eq!(switched.provider, to);
                    assert_eq!(switched.model, catalog::default_model(to).id);
                    assert_eq!(switched.api_key, "sk-test");
                    assert!(switched.is_catalog_pair());
                }
            }
        }
    }

    #[test]
    fn test_explicit_model_override_survives_switch() {
        let config = ProviderConfig::new(Provider::OpenAi, "k")
            .with_provider(Provider::Google)
            .with_model("gemini-2.5-flash");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.is_catalog_pair());
    }

    #[test]
    fn test_whitespace_key_is_not_a_key() {
        assert!(!ProviderConfig::new(Provider::Anthropic, "   ").has_api_key());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderConfig::new(Provider::Anthropic, "sk-ant-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(ProviderConfig::new(Provider::Google, "k")).unwrap();
        assert_eq!(json["provider"], "google");
        assert_eq!(json["apiKey"], "k");
        assert_eq!(json["model"], "gemini-2.5-pro");
    }

    #[test]
    fn test_store_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_store_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested/settings.json"));
        let config = ProviderConfig::new(Provider::Anthropic, "sk-ant").with_model("claude-4-opus");

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), Some(config));
    }

    #[test]
    fn test_store_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        store.save(&ProviderConfig::default()).unwrap();

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = SettingsStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SettingsError::Json { .. }));
    }

    #[test]
    fn test_store_unknown_provider_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"provider":"mistral","apiKey":"k","model":"mistral-large"}"#,
        )
        .unwrap();

        let err = SettingsStore::new(&path).load().unwrap_err();
        assert!(err.to_string().ends_with("Unsupported provider: mistral"));
        assert!(matches!(
            err,
            SettingsError::Provider {
                source: AnalysisError::UnsupportedProvider(ref p),
                ..
            } if p == "mistral"
        ));
    }
}
