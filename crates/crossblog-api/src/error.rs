//! Error responses
//!
//! Repository failures reach the client as `{"code", "message"}` with a
//! status chosen from the error kind. "Article not found" never comes through
//! here; handlers render it as a bare 404.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crossblog_core::errors::{ExError, ExErrorKind};
use crossblog_core_types::RequestContext;
use serde::{Deserialize, Serialize};

/// Body of error responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Handler error wrapping the structured error facility
#[derive(Debug)]
pub struct ApiError(ExError);

impl ApiError {
    /// Attach the request's correlation id
    pub fn in_context(err: ExError, ctx: &RequestContext) -> Self {
        Self(err.with_request_id(ctx.request_id.clone()))
    }

    pub fn error(&self) -> &ExError {
        &self.0
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.0.kind())
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ExErrorKind) -> StatusCode {
    match kind {
        ExErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ExErrorKind::NotFound => StatusCode::NOT_FOUND,
        ExErrorKind::Io
        | ExErrorKind::Serialization
        | ExErrorKind::Persistence
        | ExErrorKind::Concurrency
        | ExErrorKind::Config
        | ExErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(err_code = self.0.code(), err = %self.0, "request failed");
        }

        let body = ErrorResponse {
            code: self.0.code().to_string(),
            message: self.0.message().to_string(),
            request_id: self.0.request_id().map(|id| id.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
