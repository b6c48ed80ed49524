//! Response envelope and error mapping.
//!
//! Every response body is one of
//! `{"success": true, "result": ...}` or
//! `{"success": false, "error": {"kind": ..., "message": ...}}`.
//! HTTP status codes are derived from the error kind here and nowhere else.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::portal::{ErrorKind, PortalError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> Envelope<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(ErrorBody {
                kind,
                message: message.into(),
            }),
        }
    }
}

/// Successful response with its status code.
#[derive(Debug)]
pub struct Success<T> {
    status: StatusCode,
    result: T,
}

impl<T> Success<T> {
    pub fn ok(result: T) -> Self {
        Self {
            status: StatusCode::OK,
            result,
        }
    }

    pub fn created(result: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            result,
        }
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        (self.status, Json(Envelope::ok(self.result))).into_response()
    }
}

/// A portal failure on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub PortalError);

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let body: Envelope<()> = Envelope::err(kind, self.0.to_string());
        (status_for(kind), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Success<T>, ApiError>;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyRegistered => StatusCode::CONFLICT,
        ErrorKind::InsufficientFunds => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Unavailable => StatusCode::BAD_GATEWAY,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
    }
}
