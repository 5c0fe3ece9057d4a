/*!
 * Workflow Configuration
 *
 * Action table and telemetry options, loadable from JSON or the environment.
 *
 * Environment variables:
 * - WITHDRAWAL_POLICY_PATH: JSON file holding a full `WithdrawalConfig` or
 *   just its `policy` table (default: built-in table)
 * - WITHDRAWAL_TRACE_JSON: Enable JSON log output (`1` or `true`)
 * - RUST_LOG: Log filter (default: info)
 */

use crate::permissions::ActionPolicy;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const POLICY_PATH_ENV: &str = "WITHDRAWAL_POLICY_PATH";
pub const TRACE_JSON_ENV: &str = "WITHDRAWAL_TRACE_JSON";

/// Configuration loading errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {}", path.display())]
    #[diagnostic(code(config::io), help("Check that the file exists and is readable."))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    #[diagnostic(
        code(config::parse),
        help("Expected a JSON object with `policy` and optional `telemetry` keys, or a bare action table.")
    )]
    Parse(#[from] serde_json::Error),
}

/// Log output options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// JSON lines instead of compact human-readable output
    pub json: bool,
    /// Filter used when RUST_LOG is unset
    pub filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: "info".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WithdrawalConfig {
    pub policy: ActionPolicy,
    pub telemetry: TelemetryConfig,
}

impl WithdrawalConfig {
    /// Parse either a full config document or a bare action table
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let is_full = value
            .as_object()
            .map(|map| map.contains_key("policy") || map.contains_key("telemetry"))
            .unwrap_or(false);

        if is_full {
            return Ok(serde_json::from_value(value)?);
        }
        Ok(Self {
            policy: serde_json::from_value(value)?,
            ..Self::default()
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(path = %path.display(), actions = config.policy.len(), "Loaded withdrawal config");
        Ok(config)
    }

    /// Built-in defaults overridden by the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(POLICY_PATH_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(flag) = std::env::var(TRACE_JSON_ENV) {
            config.telemetry.json = flag == "1" || flag.eq_ignore_ascii_case("true");
        }

        Ok(config)
    }
}
