/*!
 * Telemetry
 * Tracing subscriber setup for embedders and test harnesses
 */

use crate::config::TelemetryConfig;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Install the global subscriber described by `config`
///
/// RUST_LOG takes precedence over `config.filter`. Returns false if a global
/// subscriber was already installed.
pub fn init_tracing(config: &TelemetryConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = config.json, "Withdrawal tracing initialized");
    }
    installed
}

/// Shorthand reading RUST_LOG and WITHDRAWAL_TRACE_JSON only
pub fn init_tracing_from_env() -> bool {
    let json = std::env::var(crate::config::TRACE_JSON_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    init_tracing(&TelemetryConfig {
        json,
        ..TelemetryConfig::default()
    })
}
