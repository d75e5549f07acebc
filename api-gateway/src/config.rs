//! API gateway configuration.
//!
//! This configures the HTTP listen address; the ledger-level settings
//! (metrics exporter) come from `ledger::LedgerConfig`. Both start from
//! defaults and can be overridden through the environment.

use std::net::SocketAddr;

use ledger::ConfigError;
use ledger::config::parse_var;

/// Environment variable overriding the HTTP listen address.
pub const ENV_LISTEN_ADDR: &str = "CERTLEDGER_LISTEN_ADDR";

/// Configuration for the API gateway HTTP server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        // Bind to all interfaces so a container port mapping (5000→5000) is
        // reachable from the host.
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
        }
    }
}

impl ApiConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(addr) = parse_var(&lookup, ENV_LISTEN_ADDR)? {
            cfg.listen_addr = addr;
        }
        Ok(cfg)
    }
}
