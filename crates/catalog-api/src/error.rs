//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  InvalidIdentifier(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<catalog_core::Error> for ApiError {
  fn from(err: catalog_core::Error) -> Self {
    use catalog_core::Error;
    match err {
      Error::InvalidIdentifier(_) => ApiError::InvalidIdentifier(err.to_string()),
      Error::NotFound { .. } | Error::NoMatch { .. } => {
        ApiError::NotFound(err.to_string())
      }
      Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::InvalidIdentifier(m) | ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, m.clone())
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Store(e) => {
        tracing::warn!(error = %e, "request failed in the store");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
