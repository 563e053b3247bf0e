use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum CareError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Too many verification attempts; try again later")]
    RateLimited,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mail delivery failed: {0}")]
    MailDelivery(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CareError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CareError::Validation(_) => StatusCode::BAD_REQUEST,
            CareError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CareError::Forbidden(_) => StatusCode::FORBIDDEN,
            CareError::NotFound(_) => StatusCode::NOT_FOUND,
            CareError::Conflict(_) => StatusCode::CONFLICT,
            CareError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            CareError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            CareError::DatabaseError(_)
            | CareError::Reqwest(_)
            | CareError::Json(_)
            | CareError::MailDelivery(_)
            | CareError::RactorError(_)
            | CareError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the row insert failed on a UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            CareError::DatabaseError(SqlxError::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

impl IntoResponse for CareError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiErrorResponse { error: message })).into_response()
    }
}

/// Error body shared by every endpoint: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
