//! Structured logging setup.
//!
//! The object store adapter talks HTTP through the AWS SDK, whose stack logs
//! every request and connection at `debug`. Those targets are pinned to `warn` unless the
//! filter names them explicitly.

use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Targets demoted to `warn` by default.
pub const NOISY_DEPENDENCIES: &[&str] = &[
    "aws_config",
    "aws_smithy_runtime",
    "aws_sdk_s3",
    "hyper",
    "hyper_util",
    "rustls",
    "h2",
];

/// Build the log filter for `log_level`, adding `warn` directives for
/// [`NOISY_DEPENDENCIES`] the level does not mention itself.
pub fn build_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let mut filter =
        EnvFilter::try_new(log_level).map_err(|e| TelemetryError::Config(e.to_string()))?;

    for target in NOISY_DEPENDENCIES {
        let mentioned = log_level
            .split(',')
            .any(|d| d.trim().split('=').next() == Some(*target));
        if mentioned {
            continue;
        }
        let directive: Directive = format!("{target}=warn")
            .parse()
            .map_err(|e: tracing_subscriber::filter::ParseError| {
                TelemetryError::Config(e.to_string())
            })?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(&config.log_level)?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.source_location)
            .with_line_number(config.source_location);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.source_location)
            .with_line_number(config.source_location)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json = config.json_logs,
        "Logging initialized"
    );

    Ok(())
}
