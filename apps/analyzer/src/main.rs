use std::io::Read;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use analyzer::config::{missing_key_hint, Config};
use analyzer::{AnalysisError, Analyzer, HttpBackend, SettingsStore};

/// Headless front end: reads a job description from the file named on the
/// command line (or stdin), prints the analysis as JSON on stdout.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting tech stack analyzer v{}", env!("CARGO_PKG_VERSION"));

    let store = SettingsStore::new(&config.settings_path);
    // A stale or hand-edited settings file must not stop the run
    let saved = store.load().unwrap_or_else(|e| {
        warn!("Ignoring saved settings: {e}");
        None
    });
    let provider_config = config.resolve(saved);
    info!(
        "Using {} with model {}",
        provider_config.provider, provider_config.model
    );

    let job_description = read_job_description()?;
    if job_description.trim().is_empty() {
        anyhow::bail!("Job description is empty");
    }

    let analyzer = Analyzer::new(HttpBackend::new(config.client_options()));
    let result = match analyzer
        .analyze_tech_stack(&provider_config, &job_description)
        .await
    {
        Ok(result) => result,
        Err(AnalysisError::MissingApiKey) => {
            anyhow::bail!("{}", missing_key_hint(provider_config.provider))
        }
        Err(e) => return Err(e.into()),
    };

    if config.save_settings {
        store.save(&provider_config)?;
        info!("Settings saved to {}", store.path().display());
    }

    for (category, techs) in result.by_category() {
        info!("{category}: {}", techs.len());
    }
    if result.roadmap.is_empty() {
        warn!("Model returned an empty roadmap");
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn read_job_description() -> Result<String> {
    match std::env::args().nth(1) {
        Some(path) if path != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read job description from '{path}'")),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read job description from stdin")?;
            Ok(buf)
        }
    }
}
