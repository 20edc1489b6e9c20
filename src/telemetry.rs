use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;
use crate::workflow::CallTarget;

/// Initialize structured logging on stderr.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.log_level, e))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    result.map_err(|e| anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::debug!("Mood music telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking the log lines of one action
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one controller action
pub fn create_action_span(target: CallTarget, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "pipeline_action",
        call = %target,
        correlation.id = correlation_id,
        otel.kind = "internal"
    )
}
