use thiserror::Error;

/// Errors raised while resolving a PIXm response into patient records
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The body carried the server's `Error` marker. Displays the body verbatim.
    #[error("{body}")]
    ServerReported { body: String },

    #[error("Malformed PIXm response: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Malformed PIXm response entry {index}: {reason}")]
    MalformedEntry { index: usize, reason: String },
}

impl ResolveError {
    /// True for both malformed variants
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ResolveError::MalformedBody(_) | ResolveError::MalformedEntry { .. }
        )
    }

    pub(crate) fn entry(index: usize, reason: impl Into<String>) -> Self {
        ResolveError::MalformedEntry {
            index,
            reason: reason.into(),
        }
    }
}
