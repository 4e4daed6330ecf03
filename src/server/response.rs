/// JSON error envelope and error-to-status mapping
use crate::error::CrudError;
use crate::validation::ValidationError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// `{"error": {"code": 404, "message": "..."}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: status.as_u16(),
                message: message.into(),
            },
        }
    }
}

/// Everything a handler can fail with
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Crud(#[from] CrudError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Status code and client-facing message
    pub fn classify(&self) -> (StatusCode, String) {
        match self {
            ApiError::Crud(CrudError::NotFound { .. }) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Crud(CrudError::Repository(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unable to process request. Please try again later.".to_string(),
            ),
            ApiError::Validation(_) | ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(ErrorBody::new(status, message))).into_response()
    }
}
