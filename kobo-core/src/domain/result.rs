//! Library error, `Result` alias and the JSON envelope

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything kobo-core can fail with
///
/// Both remote systems report failures as a non-2xx status plus an optional
/// `message` in the body. Those all land in `Api`; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(String),

    #[error("Not logged in. Run 'kobo login' first.")]
    NotAuthenticated,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("A transfer is already in progress")]
    TransferInProgress,

    #[error("Payment {0} is already being verified")]
    VerificationInProgress(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an API error from a status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Stable snake_case name for scripts reading `--json` output
    pub fn code(&self) -> &'static str {
        match self {
            Self::Api { .. } => "api",
            Self::Http(_) => "http",
            Self::NotAuthenticated => "not_authenticated",
            Self::Validation(_) => "validation",
            Self::Config(_) => "config",
            Self::TransferInProgress => "transfer_in_progress",
            Self::VerificationInProgress(_) => "verification_in_progress",
            Self::NotFound(_) => "not_found",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }

    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Envelope printed by `--json` commands
///
/// Exactly one of `data` and `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Failure half of [`OperationResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failure with a free-form code, for errors raised outside the library
    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
                status: None,
            }),
        }
    }
}

impl<T> From<&Error> for OperationResult<T> {
    fn from(err: &Error) -> Self {
        let mut result = Self::failed(err.code(), err.to_string());
        if let Some(body) = result.error.as_mut() {
            body.status = err.status();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_server_message() {
        let err = Error::api(400, "Account number is invalid");
        assert_eq!(err.to_string(), "Account number is invalid");
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.code(), "api");
    }

    #[test]
    fn test_ok_envelope_omits_error() {
        let json = serde_json::to_value(OperationResult::ok(7)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 7 }));
    }

    #[test]
    fn test_error_envelope_carries_code_and_status() {
        let result: OperationResult<()> = (&Error::api(422, "Insufficient funds")).into();
        assert!(!result.success);
        let body = result.error.unwrap();
        assert_eq!(body.code, "api");
        assert_eq!(body.status, Some(422));

        let result: OperationResult<()> = (&Error::NotAuthenticated).into();
        let body = result.error.unwrap();
        assert_eq!(body.code, "not_authenticated");
        assert_eq!(body.status, None);
    }
}
