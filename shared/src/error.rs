use lambda_http::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("unknown handler {0:?}")]
    UnknownHandler(String),
}

/// Failures raised by the table and object store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table store request failed: {0}")]
    Table(String),

    #[error("object store request failed: {0}")]
    Object(String),

    #[error("failed to convert item: {0}")]
    Conversion(#[from] serde_dynamo::Error),
}

/// Outcome of a handler that did not produce its success response.
///
/// The client-facing variants carry the message that is returned verbatim;
/// everything else becomes a 500 with the handler's generic failure message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build response: {0}")]
    Http(#[from] lambda_http::http::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Json(_) | Self::Http(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the message may be shown to the caller
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}
