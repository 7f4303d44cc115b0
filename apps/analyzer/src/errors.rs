use thiserror::Error;

use crate::catalog::Provider;

/// Failures raised inside a provider adapter or while reading its reply.
///
/// Never surfaces on its own: the dispatcher wraps it in [`AnalysisError::Failed`].
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No response from {0}")]
    EmptyContent(Provider),

    #[error("No JSON found in response")]
    NoJson,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid response format from AI model: missing `{0}`")]
    InvalidResponse(&'static str),
}

/// The one error shape callers of `analyze_tech_stack` handle.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key is required. Please configure your API key in settings.")]
    MissingApiKey,

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Analysis failed: {0}")]
    Failed(#[from] AdapterError),
}

/// Coarse failure category, for callers that branch on what went wrong
/// rather than on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    UnsupportedProvider,
    VendorCall,
    Parse,
    InvalidResponse,
}

impl AdapterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::Http(_) | AdapterError::Api { .. } | AdapterError::EmptyContent(_) => {
                ErrorKind::VendorCall
            }
            AdapterError::NoJson | AdapterError::Parse(_) => ErrorKind::Parse,
            AdapterError::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::MissingApiKey => ErrorKind::Configuration,
            AnalysisError::UnsupportedProvider(_) => ErrorKind::UnsupportedProvider,
            AnalysisError::Failed(inner) => inner.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_preserves_inner_message() {
        let err = AnalysisError::from(AdapterError::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Analysis failed: API error (status 401): Incorrect API key provided"
        );
        assert_eq!(err.kind(), ErrorKind::VendorCall);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AnalysisError::MissingApiKey.kind(), ErrorKind::Configuration);
        assert_eq!(
            AnalysisError::UnsupportedProvider("x".into()).kind(),
            ErrorKind::UnsupportedProvider
        );
        assert_eq!(AnalysisError::from(AdapterError::NoJson).kind(), ErrorKind::Parse);
        assert_eq!(
            AnalysisError::from(AdapterError::InvalidResponse("roadmap")).kind(),
            ErrorKind::InvalidResponse
        );
        assert_eq!(
            AnalysisError::from(AdapterError::EmptyContent(Provider::Google)).to_string(),
            "Analysis failed: No response from Google AI"
        );
    }
}
