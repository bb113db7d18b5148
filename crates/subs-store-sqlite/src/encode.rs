//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Month-granular dates are stored as RFC 3339 timestamps at midnight UTC.
//! The format is fixed-width for four-digit years, so string comparison in
//! SQL (`BETWEEN`, `ORDER BY`) agrees with chronological order.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use subs_core::subscription::Subscription;

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.and_time(NaiveTime::MIN).and_utc().to_rfc3339()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc).date_naive())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` that yields [`RawSubscription`]s.
pub const SELECT_COLUMNS: &str =
  "id, service_name, price, user_id, start_date, end_date";

/// Raw values read directly from a `subs` row.
pub struct RawSubscription {
  pub id:           i64,
  pub service_name: String,
  pub price:        i64,
  pub user_id:      String,
  pub start_date:   String,
  pub end_date:     String,
}

impl RawSubscription {
  /// Map a row selected with [`SELECT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      service_name: row.get(1)?,
      price:        row.get(2)?,
      user_id:      row.get(3)?,
      start_date:   row.get(4)?,
      end_date:     row.get(5)?,
    })
  }

  pub fn into_subscription(self) -> Result<Subscription> {
    Ok(Subscription {
      id:           self.id,
      service_name: self.service_name,
      price:        self.price,
      user_id:      self.user_id,
      start_date:   decode_date(&self.start_date)?,
      end_date:     decode_date(&self.end_date)?,
    })
  }
}
