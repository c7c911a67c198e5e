use thiserror::Error;

/// A single failed translation attempt.
///
/// The engine recovers from these locally; they only surface as the
/// `last_error` message of a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {code}")]
    Status { code: u16 },

    #[error("provider returned no translation")]
    EmptyResult,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("no translation providers configured")]
    NoProviders,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ProviderError::Status {
                code: status.as_u16(),
            }
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

/// Failure reading or writing the durable string store.
#[derive(Error, Debug)]
pub enum CacheIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
