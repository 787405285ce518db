//! Request-level errors and their JSON rendering.
//!
//! Every failure a handler can produce ends up as `{"error": "<message>"}`
//! with a status code chosen by the variant. The message is the variant's
//! `Display` output.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid JSON body")]
    InvalidJson,

    #[error("invalid id")]
    InvalidId,

    #[error("method not allowed")]
    MethodNotAllowed,

    /// No route matches the request path.
    #[error("not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::NotFound) | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::InvalidJson | ApiError::InvalidId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
