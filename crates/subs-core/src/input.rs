//! Loosely-typed web input, exactly as it arrives from clients.
//!
//! Every field is defaulted: an absent key deserialises to the zero value,
//! which the normalizer then reads as "not supplied".

use serde::Deserialize;

/// JSON body of a create request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddSubscription {
  pub service_name: String,
  pub price:        i64,
  pub user_id:      String,
  /// `MM-YYYY`.
  pub start_date:   String,
  /// Duration in months; `<= 0` means one month.
  pub month:        i32,
}

/// JSON body of a partial-update request. Zero price and empty strings mean
/// "unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSubscription {
  pub id:           i64,
  pub service_name: String,
  pub price:        i64,
  pub user_id:      String,
  /// `MM-YYYY`; empty leaves both dates untouched.
  pub start_date:   String,
  /// Only consulted when `start_date` is present.
  pub month:        i32,
}

/// Query string of the price aggregation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PriceQuery {
  /// Service name.
  pub serv:  String,
  /// User id.
  pub uuid:  String,
  /// Range start, `MM-YYYY`.
  pub sdate: String,
  /// Range end, `MM-YYYY`, inclusive.
  pub edate: String,
}
