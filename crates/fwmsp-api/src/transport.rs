// Shared transport configuration for building the reqwest::Client.
//
// The MSP client is constructed once at process start and reused read-only
// for the process lifetime; the explicit timeout replaces reqwest's
// library default.

use std::time::Duration;

/// Transport configuration for the MSP HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Create a config with a custom request timeout in seconds.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(secs),
        }
    }

    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by `MspClient` to inject the `Authorization` bearer header.
    pub fn build_client_with_headers(
        &self,
        headers: reqwest::header::HeaderMap,
    ) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("fwmsp/0.1.0")
            .default_headers(headers)
            .build()
            .map_err(|e| crate::error::Error::Client(e.to_string()))
    }
}
