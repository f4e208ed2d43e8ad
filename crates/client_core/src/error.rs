use thiserror::Error;

/// The single failure kind surfaced by gateway operations. Transport,
/// HTTP-status, and decode failures all collapse into one human-readable
/// message; there are no error codes and no retry guidance.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}
