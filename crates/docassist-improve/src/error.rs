//! Error types for text improvement

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImproveError {
    /// The backend could not be reached or does not serve the model
    #[error("Backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    /// The backend answered, but not with what was asked for
    #[error("Malformed response from {backend}: {reason}")]
    MalformedResponse { backend: String, reason: String },

    #[error("Backend {backend} timed out after {seconds}s")]
    BackendTimeout { backend: String, seconds: u64 },

    #[error("Request to {backend} failed: {source}")]
    Request {
        backend: String,
        #[source]
        source: reqwest::Error,
    },

    /// Every backend in the chain failed; `last` is the final failure
    #[error("All {attempts} AI backends failed to process text; last error: {last}")]
    AllBackendsFailed {
        attempts: usize,
        #[source]
        last: Box<ImproveError>,
    },

    /// The blocking suggestion task panicked or was cancelled
    #[error("Suggestion task failed: {0}")]
    Task(String),

    #[error("No AI backends could be initialized")]
    NoBackends,
}

pub type Result<T> = std::result::Result<T, ImproveError>;

impl ImproveError {
    pub fn unavailable(backend: impl Into<String>, reason: impl ToString) -> Self {
        Self::BackendUnavailable {
            backend: backend.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(backend: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedResponse {
            backend: backend.into(),
            reason: reason.to_string(),
        }
    }

    pub fn request(backend: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            backend: backend.into(),
            source,
        }
    }
}
