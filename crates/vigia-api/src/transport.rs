// Shared transport configuration for building reqwest::Client instances.
//
// The monitor client and any future consumers share timeout and TLS
// settings through this module, avoiding duplicated builder logic.

use std::time::Duration;

use crate::error::Error;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. Bounds how long a single hung system check can
    /// stall the cycle.
    pub timeout: Duration,
    /// Accept invalid TLS certificates (for backends behind self-signed
    /// reverse proxies).
    pub danger_accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            danger_accept_invalid_certs: false,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("vigia/0.1.0");

        if self.danger_accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(Error::Transport)
    }
}
