use thiserror::Error;

/// Top-level error type for the `fwmsp-api` crate.
///
/// Upstream HTTP failures are inspected once, at the response-handling
/// boundary, and classified into one of the status-specific variants.
/// No retries or backoff happen at this layer — every failure is final
/// for the call that produced it.
#[derive(Debug, Error)]
pub enum Error {
    // ── Upstream status classes ─────────────────────────────────────
    /// HTTP 401 — the MSP rejected the bearer token.
    #[error("Authentication failed: invalid or expired MSP token -- verify FIREWALLA_MSP_TOKEN")]
    InvalidToken,

    /// HTTP 404 — the addressed resource does not exist.
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// HTTP 400 — the MSP rejected the request; message passed through verbatim.
    #[error("MSP API rejected the request: {message}")]
    Validation { message: String },

    /// Any other non-success status.
    #[error("MSP API error (HTTP {status}): {message}")]
    Msp { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client construction failed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` for errors caused by the caller's input or
    /// credentials rather than the MSP service itself.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken | Self::NotFound { .. } | Self::Validation { .. }
        )
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::NotFound { .. } => true,
            _ => false,
        }
    }
}
