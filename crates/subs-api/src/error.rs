//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is answered with `400 Bad Request` and the message in the
//! `data` envelope, whatever its kind.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::Envelope;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request could not be decoded (body, path or query string).
  #[error("{0}")]
  BadRequest(String),

  #[error(transparent)]
  Service(#[from] subs_core::Error),
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

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    tracing::warn!(error = %message, "request rejected");
    (StatusCode::BAD_REQUEST, Json(Envelope::new(message))).into_response()
  }
}
