//! Broker error types.

/// Errors that can occur during broker operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("rate limit exceeded")]
    RateLimit,

    /// The service answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("order error: {0}")]
    Order(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl BrokerError {
    /// True for failures caused by credentials rather than the request itself.
    pub fn is_auth(&self) -> bool {
        matches!(self, BrokerError::Auth(_))
    }
}
