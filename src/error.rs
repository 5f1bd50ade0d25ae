// Error kinds surfaced by the fetcher and the history store.
// Neither component retries; callers decide based on the kind.

use thiserror::Error;

/// Inventory fetch failures.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Profile could not be resolved against the provider (bad or missing credentials).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The provider rejected the call.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Network fault, timeout, throttling or provider-side error. Safe to retry.
    #[error("transient provider error: {0}")]
    Transient(String),

    /// Provider answered with a payload we cannot interpret.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

/// History store failures. Open, read and write errors all map to one kind.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Unavailable(sqlx::Error::Io(e))
    }
}
