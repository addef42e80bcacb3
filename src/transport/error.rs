use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unauthorized (HTTP {0})")]
    Unauthorized(u16),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to build request: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() || err.is_body() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;
