//! Error types for `subs-core`.
//!
//! Every layer (normalizer, store, service) reports failures with this one
//! taxonomy so the dispatcher can render them uniformly.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A `MM-YYYY` value did not parse, or a derived date fell out of range.
  #[error("invalid date: {0}")]
  InvalidDate(String),

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("no fields to update for sub with id {0}")]
  NoFields(i64),

  #[error("sub with id {0} not found")]
  NotFound(i64),

  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("operation cancelled")]
  Cancelled,
}

impl Error {
  /// Reject a non-positive record id.
  pub fn check_id(id: i64) -> Result<()> {
    if id <= 0 {
      return Err(Self::InvalidArgument(format!("sub ID must be positive, got {id}")));
    }
    Ok(())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
