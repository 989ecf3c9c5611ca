// src/errors.rs
//! Error taxonomy for calls to the remote API and their user-facing messages.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

pub mod messages {
    pub const NETWORK_ERROR: &str = "Network error. Please check your connection.";
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
    pub const VALIDATION_ERROR: &str = "Please check your input and try again.";
    pub const SERVER_ERROR: &str = "Server error. Please try again later.";
    pub const UNKNOWN_ERROR: &str = "An unexpected error occurred.";
    pub const TOKEN_EXPIRED: &str = "Your session has expired. Please login again.";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
    Auth,
    Server,
    Unknown,
}

/// Body shape the API uses for failures. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ErrorBody {
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// `message` is the body's `message` field, the only one shown to users.
    /// `error` keeps the body's `error` field for callers that want raw detail.
    #[error("Validation failed ({status})")]
    Validation {
        status: u16,
        message: Option<String>,
        error: Option<String>,
        field_errors: Option<Value>,
    },

    #[error("Unauthorized")]
    Unauthorized {
        message: Option<String>,
        error: Option<String>,
    },

    #[error("Server error {status}")]
    Server {
        status: u16,
        message: Option<String>,
        error: Option<String>,
    },

    #[error("Unexpected status {status}")]
    Status {
        status: u16,
        message: Option<String>,
        error: Option<String>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build the error for a non-2xx response
    pub fn from_status(status: u16, body: &str) -> Self {
        let ErrorBody {
            message,
            error,
            errors,
        } = ErrorBody::parse(body);

        match status {
            400 => ApiError::Validation {
                status,
                message,
                error,
                field_errors: errors,
            },
            401 => ApiError::Unauthorized { message, error },
            500..=599 => ApiError::Server {
                status,
                message,
                error,
            },
            _ => ApiError::Status {
                status,
                message,
                error,
            },
        }
    }

    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) | ApiError::Timeout => ErrorKind::Network,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Unauthorized { .. } => ErrorKind::Auth,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Status { .. } | ApiError::Decode(_) => ErrorKind::Unknown,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Raw message the server sent, if any, falling back to its `error` field
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Validation { message, error, .. }
            | ApiError::Unauthorized { message, error }
            | ApiError::Server { message, error, .. }
            | ApiError::Status { message, error, .. } => {
                message.as_deref().or(error.as_deref())
            }
            _ => None,
        }
    }

    /// Field-level validation details from a 400 response
    pub fn field_errors(&self) -> Option<&Value> {
        match self {
            ApiError::Validation { field_errors, .. } => field_errors.as_ref(),
            _ => None,
        }
    }

    /// Single display string for the UI
    pub fn ui_message(&self) -> String {
        match self {
            ApiError::Network(_) | ApiError::Timeout => messages::NETWORK_ERROR.to_string(),
            ApiError::Validation {
                field_errors: Some(_),
                ..
            } => messages::VALIDATION_ERROR.to_string(),
            ApiError::Validation {
                message: Some(message),
                ..
            } => parse_bilingual(message),
            ApiError::Unauthorized {
                message: Some(message),
                ..
            } => parse_bilingual(message),
            ApiError::Unauthorized { message: None, .. } => {
                messages::INVALID_CREDENTIALS.to_string()
            }
            ApiError::Server { .. } => messages::SERVER_ERROR.to_string(),
            _ => messages::UNKNOWN_ERROR.to_string(),
        }
    }
}

/// The API answers with "English | العربية"; show the first segment
pub fn parse_bilingual(message: &str) -> String {
    let first = message.split('|').next().unwrap_or_default().trim();
    if first.is_empty() {
        messages::UNKNOWN_ERROR.to_string()
    } else {
        first.to_string()
    }
}

/// Log an API failure with the call site that observed it
pub fn log_error(context: &str, err: &ApiError) {
    error!(
        context = context,
        status = ?err.status(),
        kind = ?err.kind(),
        details = ?err.field_errors(),
        "[{}] {}",
        context,
        err.ui_message()
    );
}
