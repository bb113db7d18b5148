//! Subscription: the sole entity of the service, plus the canonical records
//! derived from it for writes and aggregation.
//!
//! All dates are month-granular: they are [`NaiveDate`]s pinned to the 1st of
//! the month. Only month and year carry meaning.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Subscription ────────────────────────────────────────────────────────────

/// A persisted subscription record, as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
  /// Store-assigned; never reused after deletion.
  pub id:           i64,
  pub service_name: String,
  /// Amount in the minor currency unit.
  pub price:        i64,
  /// Opaque identifier of the owning user, typically a UUID.
  pub user_id:      String,
  pub start_date:   NaiveDate,
  /// Always `start_date` plus the subscribed number of months.
  pub end_date:     NaiveDate,
}

// ─── NewSubscription ─────────────────────────────────────────────────────────

/// Input to [`crate::store::SubscriptionStore::insert`]. The `id` is always
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
  pub service_name: String,
  pub price:        i64,
  pub user_id:      String,
  pub start_date:   NaiveDate,
  pub end_date:     NaiveDate,
}

// ─── SubscriptionPatch ───────────────────────────────────────────────────────

/// A partial update keyed by `id`. `None` means "leave this column unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
  pub id:           i64,
  pub service_name: Option<String>,
  pub price:        Option<i64>,
  pub user_id:      Option<String>,
  pub start_date:   Option<NaiveDate>,
  pub end_date:     Option<NaiveDate>,
}

impl SubscriptionPatch {
  /// A patch for `id` that changes nothing.
  pub fn new(id: i64) -> Self {
    Self {
      id,
      ..Self::default()
    }
  }

  /// `true` if no column would be written.
  pub fn is_empty(&self) -> bool {
    self.service_name.is_none()
      && self.price.is_none()
      && self.user_id.is_none()
      && self.start_date.is_none()
      && self.end_date.is_none()
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::SubscriptionStore::sum_price`].
///
/// Matches records with exactly this service and user whose `start_date`
/// falls within `start_date..=end_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFilter {
  pub service_name: String,
  pub user_id:      String,
  pub start_date:   NaiveDate,
  pub end_date:     NaiveDate,
}

/// The summed price of every record matching a [`PriceFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTotal {
  pub price: i64,
}
