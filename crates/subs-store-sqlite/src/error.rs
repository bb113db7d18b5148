//! Error type for `subs-store-sqlite`.
//!
//! These are backend plumbing failures. They leave the crate as
//! [`subs_core::Error`]: an elapsed deadline becomes `Cancelled`, everything
//! else becomes `Persistence`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("query exceeded deadline of {0:?}")]
  Timeout(Duration),
}

impl From<Error> for subs_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Timeout(_) => subs_core::Error::Cancelled,
      other => subs_core::Error::Persistence(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
