//! Tech stack analyzer.
//!
//! Sends a job description to one of three AI providers and returns a
//! structured breakdown of the technologies it asks for plus a learning
//! roadmap. All vendor calls go through `llm_client`; callers use
//! [`analyze_tech_stack`] or an [`Analyzer`] over their own backend.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod llm_client;
pub mod settings;

pub use analysis::{AnalysisResult, Importance, RoadmapPhase, Technology};
pub use catalog::{ModelInfo, Provider};
pub use dispatcher::{analyze_tech_stack, Analyzer, CompletionBackend, HttpBackend};
pub use errors::{AdapterError, AnalysisError, ErrorKind};
pub use settings::{ProviderConfig, SettingsStore};
