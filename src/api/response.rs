//! Response envelope and request error taxonomy

use crate::parse::ParsedAccount;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Outcome of a request, serialized as `{status, data?, message?, raw?}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// Account created, trialed or renewed
    Account(ParsedAccount),
    /// Operation without a record to report, e.g. deletion
    Done(String),
    /// Failure, with the CLI output when there was one
    Error {
        message: String,
        raw: Option<String>,
    },
}

#[derive(Serialize)]
struct Envelope<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a ParsedAccount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<&'a str>,
}

impl Serialize for ApiResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let envelope = match self {
            ApiResponse::Account(account) => Envelope {
                status: "success",
                data: Some(account),
                message: None,
                raw: None,
            },
            ApiResponse::Done(message) => Envelope {
                status: "success",
                data: None,
                message: Some(message),
                raw: None,
            },
            ApiResponse::Error { message, raw } => Envelope {
                status: "error",
                data: None,
                message: Some(message),
                raw: raw.as_deref(),
            },
        };
        envelope.serialize(serializer)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Request failures; only `Unauthorized` changes the status code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),
    #[error("{message}")]
    CommandFailed { message: String, raw: String },
    #[error("{0}")]
    Fault(String),
    #[error("Invalid endpoint")]
    InvalidEndpoint,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::OK,
        }
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        let raw = match err {
            ApiError::CommandFailed { raw, .. } => Some(raw),
            _ => None,
        };
        ApiResponse::Error { message, raw }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ApiResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_envelope() {
        let account = ParsedAccount {
            username: Some("bob".into()),
            port: Some("5667".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(ApiResponse::Account(account)).unwrap();
        assert_eq!(
            value,
            json!({"status": "success", "data": {"username": "bob", "port": "5667"}})
        );
    }

    #[test]
    fn test_done_envelope() {
        let value = serde_json::to_value(ApiResponse::Done("User bob processed".into())).unwrap();
        assert_eq!(
            value,
            json!({"status": "success", "message": "User bob processed"})
        );
    }

    #[test]
    fn test_error_envelopes() {
        let value = serde_json::to_value(ApiResponse::from(ApiError::MissingParameter("user")))
            .unwrap();
        assert_eq!(
            value,
            json!({"status": "error", "message": "Missing user parameter"})
        );

        let failed = ApiError::CommandFailed {
            message: "Failed to renew".into(),
            raw: "User not found".into(),
        };
        let value = serde_json::to_value(ApiResponse::from(failed)).unwrap();
        assert_eq!(
            value,
            json!({"status": "error", "message": "Failed to renew", "raw": "User not found"})
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidEndpoint.status_code(), StatusCode::OK);
        assert_eq!(ApiError::Fault("boom".into()).status_code(), StatusCode::OK);
        assert_eq!(ApiError::MissingParameter("user").status_code(), StatusCode::OK);
    }
}
