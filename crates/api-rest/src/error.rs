//! Mapping of core and auth failures to HTTP responses.

use api_shared::auth::AuthError;
use api_shared::ErrorRes;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use rotation_core::{ErrorKind, SchedulingError};

#[derive(Debug)]
pub enum ApiError {
    Scheduling(SchedulingError),
    Auth(AuthError),
    /// The request body was not a JSON object of the expected shape.
    Body(JsonRejection),
}

impl From<SchedulingError> for ApiError {
    fn from(e: SchedulingError) -> Self {
        Self::Scheduling(e)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Body(e)
    }
}

impl ApiError {
    /// Status code and caller-facing message. Upstream and internal details stay in the logs.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Auth(e @ AuthError::UnknownRole(_)) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Auth(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            Self::Body(e) => (
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {}", e.body_text()),
            ),
            Self::Scheduling(e) => match e.kind() {
                ErrorKind::Validation => (StatusCode::BAD_REQUEST, e.to_string()),
                ErrorKind::Forbidden => (StatusCode::FORBIDDEN, e.to_string()),
                ErrorKind::Upstream => (
                    StatusCode::BAD_GATEWAY,
                    "Requirements or slot data unavailable".into(),
                ),
                ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::warn!("request rejected ({}): {}", status, message);
        }
        (status, Json(ErrorRes { error: message })).into_response()
    }
}
