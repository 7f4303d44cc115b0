//! Dispatcher: the single entry point for running an analysis.
//!
//! Checks the configuration, hands the request to the provider's adapter,
//! validates the reply and folds every adapter failure into
//! `AnalysisError::Failed`.
//!
//! The adapter sits behind `CompletionBackend`. Production code uses
//! `HttpBackend`; tests swap in a canned backend without touching callers.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::analysis::AnalysisResult;
use crate::errors::{AdapterError, AnalysisError};
use crate::llm_client::{parse_analysis, ClientOptions, LlmClient};
use crate::settings::ProviderConfig;

/// Produces the raw reply text for one analysis request.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        config: &ProviderConfig,
        job_description: &str,
    ) -> Result<String, AdapterError>;
}

/// Calls the real vendor APIs. A fresh HTTP client is built for every call.
#[derive(Debug, Clone, Default)]
pub struct HttpBackend {
    options: ClientOptions,
}

impl HttpBackend {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(
        &self,
        config: &ProviderConfig,
        job_description: &str,
    ) -> Result<String, AdapterError> {
        LlmClient::new(&self.options)?
            .complete(config, job_description)
            .await
    }
}

pub struct Analyzer<B = HttpBackend> {
    backend: B,
}

impl<B: CompletionBackend> Analyzer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Analyzes a job description with the configured provider.
    ///
    /// An empty API key fails before any network call is made.
    pub async fn analyze_tech_stack(
        &self,
        config: &ProviderConfig,
        job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        if !config.has_api_key() {
            return Err(AnalysisError::MissingApiKey);
        }

        if !config.is_catalog_pair() {
            warn!(
                "Model '{}' is not in the {} catalog; sending it as-is",
                config.model, config.provider
            );
        }

        info!(
            "Analyzing job description with {} ({})",
            config.provider, config.model
        );

        let result = self.run(config, job_description).await.map_err(|e| {
            warn!("Analysis with {} failed: {e}", config.provider);
            AnalysisError::Failed(e)
        })?;

        info!(
            "Analysis complete: {} technologies, {} roadmap phases",
            result.technologies.len(),
            result.roadmap.len()
        );
        Ok(result)
    }

    async fn run(
        &self,
        config: &ProviderConfig,
        job_description: &str,
    ) -> Result<AnalysisResult, AdapterError> {
        let text = self.backend.complete(config, job_description).await?;
        parse_analysis(&text)
    }
}

/// Analyzes a job description against the live vendor APIs.
pub async fn analyze_tech_stack(
    config: &ProviderConfig,
    job_description: &str,
) -> Result<AnalysisResult, AnalysisError> {
    Analyzer::new(HttpBackend::default())
        .analyze_tech_stack(config, job_description)
        .await
}
