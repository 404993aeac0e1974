use pixm_core::ResolveError;
use thiserror::Error;

/// Errors returned by a PIXm lookup. None of them are retried.
#[derive(Debug, Error)]
pub enum PixmError {
    /// A required input was missing or unusable; no request was sent
    #[error("Invalid PIXm request: {0}")]
    Validation(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// No response was obtained from the PIXm endpoint
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("PIXm request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("PIXm request failed: {0}")]
    Network(#[source] reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err)
    }
}
