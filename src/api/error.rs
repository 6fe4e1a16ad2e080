use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::tmdb::TmdbError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors returned by the API handlers. Each one renders as `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing required query parameter `query` or `q`")]
    MissingQuery,
    #[error("{message}")]
    Upstream { status: StatusCode, message: &'static str },
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Map a TMDB failure onto the client-facing error. A non-OK upstream
    /// status is relayed as-is with a generic message.
    pub fn from_tmdb(err: TmdbError, message: &'static str) -> Self {
        match err {
            TmdbError::Status { status, .. } => match StatusCode::from_u16(status) {
                Ok(status) => ApiError::Upstream { status, message },
                Err(_) => ApiError::Internal,
            },
            _ => ApiError::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingQuery => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
