//! Top-level configuration for a ledger service.
//!
//! This module aggregates configuration for the pieces of a ledger
//! service that live in this crate:
//!
//! - metrics exporter (enable flag + listen address).
//!
//! The goal is to have a single `LedgerConfig` struct that higher-level
//! binaries can construct from defaults and then override from the
//! environment via [`LedgerConfig::from_env`].

use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::ConfigError;

/// Environment variable toggling the metrics exporter (`true`/`false`).
pub const ENV_METRICS_ENABLED: &str = "CERTLEDGER_METRICS_ENABLED";
/// Environment variable overriding the metrics listen address.
pub const ENV_METRICS_ADDR: &str = "CERTLEDGER_METRICS_ADDR";

/// Configuration for the Prometheus metrics exporter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether to run a `/metrics` HTTP exporter.
    pub enabled: bool,
    /// Address to bind the metrics HTTP server to.
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 9898)),
        }
    }
}

/// Top-level configuration for a ledger service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    pub metrics: MetricsConfig,
}

impl LedgerConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each known key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(enabled) = parse_var(&lookup, ENV_METRICS_ENABLED)? {
            cfg.metrics.enabled = enabled;
        }
        if let Some(addr) = parse_var(&lookup, ENV_METRICS_ADDR)? {
            cfg.metrics.listen_addr = addr;
        }
        Ok(cfg)
    }
}

/// Parses `key` from `lookup`, if set.
///
/// Exposed so binaries layering their own settings on top report bad
/// values the same way.
pub fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim().parse().map(Some).map_err(|e: T::Err| ConfigError {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
