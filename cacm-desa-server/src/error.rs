//! HTTP rendering of workflow errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use cacm_desa_api::error::{ApiError, AuthError};
use serde::Serialize;

use crate::session::SessionError;

/// Handler error; wraps [`ApiError`] so it can become a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError(pub ApiError);

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        Self(ApiError::InternalError(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ApiError::Unauthorized | ApiError::LoginFailed(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The body sent to the client. Server-side details stay in the logs.
    pub fn body(&self) -> ErrorBody {
        let (error, message, field) = match &self.0 {
            ApiError::Unauthorized => ("unauthorized", "authentication required".to_string(), None),
            ApiError::LoginFailed(message) => ("login_failed", message.clone(), None),
            ApiError::Forbidden => ("forbidden", "access denied".to_string(), None),
            ApiError::NotFound(what) => ("not_found", format!("{what} not found"), None),
            ApiError::Conflict(reason) => ("conflict", reason.clone(), None),
            ApiError::ValidationError { field, message } => {
                ("validation_error", message.clone(), Some(field.clone()))
            }
            ApiError::UpstreamFailure(_) => (
                "upstream_failure",
                "the legacy database did not complete the request".to_string(),
                None,
            ),
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                ("internal_error", "internal server error".to_string(), None)
            }
        };
        ErrorBody { error, message, field }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self.0 {
            ApiError::UpstreamFailure(detail) => tracing::error!(%detail, "upstream failure"),
            ApiError::DatabaseError(detail) => tracing::error!(%detail, "database error"),
            ApiError::InternalError(detail) => tracing::error!(%detail, "internal error"),
            _ => {}
        }
        (self.status(), Json(self.body())).into_response()
    }
}

pub type HandlerResult<T> = Result<T, AppError>;
