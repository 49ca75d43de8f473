//! API error responses.
//!
//! Every error leaves the service as `{"error": "..."}` with a status code
//! derived from the error kind. Validation failures add a `fields` array.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::editor::{EditorError, ValidationErrors};
use crate::repository::ConfigError;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing {0} header")]
    Unauthorized(String),

    #[error("admin privileges required")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("validation failed")]
    Invalid(ValidationErrors),

    /// Object storage rejected or failed a write.
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = match &self {
            ApiError::Invalid(errors) => json!({ "error": self.to_string(), "fields": errors }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::ReadOnly => ApiError::Forbidden,
            SessionError::NotLoaded | SessionError::AlreadyInitialized => ApiError::Conflict(err.to_string()),
            SessionError::Config(e) => e.into(),
        }
    }
}

impl From<EditorError> for ApiError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::ReadOnly => ApiError::Forbidden,
            EditorError::Busy => ApiError::Conflict(err.to_string()),
            EditorError::Invalid(errors) => ApiError::Invalid(errors),
            EditorError::Save(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FieldError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(SessionError::ReadOnly).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(SessionError::NotLoaded).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(SessionError::AlreadyInitialized).status(), StatusCode::CONFLICT);

        let upload = ConfigError::Upload {
            message: "quota exceeded".into(),
        };
        let err = ApiError::from(EditorError::Save(SessionError::Config(upload)));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Failed to upload config: quota exceeded");

        let invalid = ApiError::from(EditorError::Invalid(ValidationErrors(vec![FieldError::new(
            "theme.brandColor",
            "must be a hex color like #10B981",
        )])));
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
