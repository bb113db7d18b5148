//! The `{"data": ...}` wrapper every response body is sent in.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub data: T,
}

impl<T> Envelope<T> {
  pub fn new(data: T) -> Self { Self { data } }
}

/// The body of a successful write: `{"data":"OK"}`.
pub fn ok() -> Envelope<&'static str> { Envelope::new("OK") }
