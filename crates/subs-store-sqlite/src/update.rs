//! Dynamic `UPDATE` construction for partial updates.
//!
//! Only column names and placeholder ordinals are assembled into the SQL
//! text. Every value travels as a bound parameter.

use rusqlite::types::Value;
use subs_core::subscription::SubscriptionPatch;

use crate::encode::encode_date;

/// Updatable columns, in the order their `SET` entries are emitted.
const COLUMNS: [&str; 5] =
  ["service_name", "price", "user_id", "start_date", "end_date"];

/// A ready-to-run `UPDATE ... RETURNING id` with its positional parameters.
#[derive(Debug, PartialEq)]
pub struct UpdateStatement {
  pub sql:    String,
  pub params: Vec<Value>,
}

/// Build the statement for `patch`, or `None` if no column is present.
pub fn build_update(patch: &SubscriptionPatch) -> Option<UpdateStatement> {
  if patch.is_empty() {
    return None;
  }

  let values: [Option<Value>; 5] = [
    patch.service_name.clone().map(Value::Text),
    patch.price.map(Value::Integer),
    patch.user_id.clone().map(Value::Text),
    patch.start_date.map(|d| Value::Text(encode_date(d))),
    patch.end_date.map(|d| Value::Text(encode_date(d))),
  ];

  let mut set_clauses = Vec::with_capacity(COLUMNS.len());
  let mut params = Vec::with_capacity(COLUMNS.len() + 1);
  for (column, value) in COLUMNS.into_iter().zip(values) {
    if let Some(value) = value {
      params.push(value);
      set_clauses.push(format!("{column} = ?{}", params.len()));
    }
  }

  params.push(Value::Integer(patch.id));
  let sql = format!(
    "UPDATE subs SET {} WHERE id = ?{} RETURNING id",
    set_clauses.join(", "),
    params.len()
  );

  Some(UpdateStatement { sql, params })
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn empty_patch_builds_nothing() {
    assert_eq!(build_update(&SubscriptionPatch::new(3)), None);
  }

  #[test]
  fn price_only_patch_sets_only_price() {
    let mut patch = SubscriptionPatch::new(3);
    patch.price = Some(250);

    let stmt = build_update(&patch).unwrap();
    assert_eq!(stmt.sql, "UPDATE subs SET price = ?1 WHERE id = ?2 RETURNING id");
    assert_eq!(stmt.params, vec![Value::Integer(250), Value::Integer(3)]);
  }

  #[test]
  fn placeholders_follow_present_columns() {
    let mut patch = SubscriptionPatch::new(11);
    patch.service_name = Some("Netflix'; DROP TABLE subs; --".into());
    patch.start_date = NaiveDate::from_ymd_opt(2024, 2, 1);
    patch.end_date = NaiveDate::from_ymd_opt(2024, 5, 1);

    let stmt = build_update(&patch).unwrap();
    assert_eq!(
      stmt.sql,
      "UPDATE subs SET service_name = ?1, start_date = ?2, end_date = ?3 \
       WHERE id = ?4 RETURNING id"
    );
    assert!(!stmt.sql.contains("Netflix"));
    assert_eq!(stmt.params.len(), 4);
    assert_eq!(stmt.params[3], Value::Integer(11));
  }
}
