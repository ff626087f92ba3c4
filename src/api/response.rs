//! JSON envelopes and error responses for the HTTP API

use axum::Json;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::version::types::VersionRecord;

/// Value of the `status` field every JSON body carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Success envelope: `{status: "success", message?, ...record}`
#[derive(Debug, Serialize)]
pub struct RecordBody {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(flatten)]
    pub record: VersionRecord,
}

impl RecordBody {
    pub fn new(record: VersionRecord) -> Self {
        Self {
            status: Status::Success,
            message: None,
            record,
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl IntoResponse for RecordBody {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Error envelope: `{status: "error", message, error?}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Errors returned by the HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    MethodNotAllowed { allowed: Method },
    Unauthorized,
    /// Unexpected failure; `error` is passed through to the client unchanged
    Internal {
        message: &'static str,
        error: String,
    },
}

impl ApiError {
    pub fn internal(message: &'static str, error: impl ToString) -> Self {
        Self::Internal {
            message,
            error: error.to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::NotFound => ErrorBody {
                status: Status::Error,
                message: "Not Found".to_string(),
                error: None,
            },
            Self::MethodNotAllowed { allowed } => ErrorBody {
                status: Status::Error,
                message: format!("Method Not Allowed. Use {} request.", allowed),
                error: None,
            },
            Self::Unauthorized => ErrorBody {
                status: Status::Error,
                message: "Unauthorized. Invalid or missing secret key.".to_string(),
                error: None,
            },
            Self::Internal { message, error } => {
                error!("{}: {}", message, error);
                ErrorBody {
                    status: Status::Error,
                    message: message.to_string(),
                    error: Some(error),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
