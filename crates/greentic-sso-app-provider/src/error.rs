use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the remote application API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The application does not exist (404, or the server ended the
    /// response without a body).
    #[error("application `{id}` not found")]
    NotFound { id: String },
    #[error("server responded with {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid application id `{0}`")]
    InvalidId(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub(crate) fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// Errors surfaced to the host by lifecycle operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The operation needs a remote object but the record is absent.
    #[error("cannot {operation} an application that is {state}")]
    NotPresent {
        operation: &'static str,
        state: &'static str,
    },
}

impl ProviderError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ProviderError::Api(err) => Some(err),
            ProviderError::NotPresent { .. } => None,
        }
    }
}
