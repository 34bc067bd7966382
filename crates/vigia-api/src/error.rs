use thiserror::Error;

/// Top-level error type for the `vigia-api` crate.
///
/// Covers every failure mode of the three backend endpoints. `vigia-core`
/// decides what each failure means for the cycle: a list-fetch error is
/// fatal to the cycle, a status-check error degrades one card, a summary
/// error is logged and ignored.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The backend answered with a non-success status code.
    #[error("Unexpected HTTP {status} from {endpoint}")]
    Http { endpoint: String, status: u16 },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient transport problem (the next
    /// scheduled cycle may well succeed).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
