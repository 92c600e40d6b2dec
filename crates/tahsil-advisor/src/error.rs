//! Advisor error types.

use thiserror::Error;

/// Errors that can occur when talking to the advisor backend.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The backend rejected the bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The backend returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The backend URL or token is missing from the configuration.
    #[error("advisor not configured: {0}")]
    NotConfigured(String),
}

impl AdvisorError {
    /// Whether retrying the same request cannot help.
    pub fn is_permanent(&self) -> bool {
        match self {
            AdvisorError::Unauthorized(_)
            | AdvisorError::InvalidResponse(_)
            | AdvisorError::NotConfigured(_) => true,
            AdvisorError::Api { status, .. } => *status < 500,
            AdvisorError::RateLimited { .. }
            | AdvisorError::Timeout(_)
            | AdvisorError::Network(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence() {
        assert!(AdvisorError::Unauthorized("bad token".into()).is_permanent());
        assert!(AdvisorError::Api {
            status: 400,
            message: "bad".into()
        }
        .is_permanent());
        assert!(!AdvisorError::Api {
            status: 503,
            message: "down".into()
        }
        .is_permanent());
        assert!(!AdvisorError::RateLimited { retry_after_ms: 10 }.is_permanent());
        assert!(!AdvisorError::Timeout(30).is_permanent());
    }
}
