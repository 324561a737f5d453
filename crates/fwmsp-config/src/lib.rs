//! Environment-driven configuration for the fwmsp server.
//!
//! The MSP connection is configured entirely through `FIREWALLA_*`
//! environment variables; the two required values are a startup
//! precondition — the binary reports and exits nonzero before serving
//! any request when either is missing.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {var} is not set")]
    MissingVar { var: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// MSP connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MspConfig {
    /// MSP domain (e.g. "acme.firewalla.net") or full base URL.
    /// `FIREWALLA_MSP_DOMAIN` — required.
    #[serde(default)]
    pub msp_domain: String,

    /// MSP personal access token. `FIREWALLA_MSP_TOKEN` — required.
    #[serde(default)]
    pub msp_token: String,

    /// Outbound request timeout in seconds. `FIREWALLA_TIMEOUT_SECS`.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for MspConfig {
    fn default() -> Self {
        Self {
            msp_domain: String::new(),
            msp_token: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl MspConfig {
    /// Load from `FIREWALLA_*` environment variables over defaults,
    /// then validate the required values.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("FIREWALLA_"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the startup preconditions without touching the environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.msp_domain.trim().is_empty() {
            return Err(ConfigError::MissingVar {
                var: "FIREWALLA_MSP_DOMAIN",
            });
        }
        if self.msp_token.trim().is_empty() {
            return Err(ConfigError::MissingVar {
                var: "FIREWALLA_MSP_TOKEN",
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
