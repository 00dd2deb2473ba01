//! Error types for the catalog front end

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Text shown to the user when the server gave no usable detail
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Authorization failed: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("API error (HTTP {status})")]
    Api { status: u16, detail: Option<String> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body returned by the catalog API.
///
/// The backend reports either a plain message or a list of field errors
/// under the same `detail` key.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldDetail>),
}

#[derive(Debug, Deserialize)]
struct FieldDetail {
    msg: String,
}

impl ErrorDetail {
    fn into_message(self) -> Option<String> {
        match self {
            ErrorDetail::Message(msg) => Some(msg),
            ErrorDetail::Fields(fields) => fields.into_iter().next().map(|f| f.msg),
        }
    }
}

impl AppError {
    /// Build an error from a non-success API response
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail.into_message())
            .filter(|msg| !msg.trim().is_empty());

        let text = detail.clone().unwrap_or_default();

        match status {
            StatusCode::BAD_REQUEST => AppError::BadRequest(text),
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(text),
            StatusCode::FORBIDDEN => AppError::Forbidden(text),
            StatusCode::NOT_FOUND => AppError::NotFound(text),
            StatusCode::CONFLICT => AppError::Conflict(text),
            StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(text),
            _ => AppError::Api {
                status: status.as_u16(),
                detail,
            },
        }
    }

    /// Message suitable for a notification: the server detail when there is
    /// one, the generic fallback otherwise.
    pub fn user_message(&self) -> String {
        let detail = match self {
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg) => Some(msg.as_str()),
            AppError::Api { detail, .. } => detail.as_deref(),
            AppError::Network(_)
            | AppError::Decode(_)
            | AppError::Config(_)
            | AppError::Internal(_) => None,
        };

        match detail {
            Some(msg) if !msg.trim().is_empty() => msg.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the error means the caller lacks a session or the rights for it
    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Unauthorized(_) | AppError::Forbidden(_))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
