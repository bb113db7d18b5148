//! [`SqliteStore`], the SQLite implementation of [`SubscriptionStore`].

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use rusqlite::OptionalExtension as _;

use subs_core::{
  store::SubscriptionStore,
  subscription::{
    NewSubscription, PriceFilter, PriceTotal, Subscription, SubscriptionPatch,
  },
};

use crate::{
  Error, Result,
  encode::{RawSubscription, SELECT_COLUMNS, encode_date},
  schema::SCHEMA,
  update::build_update,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A subscription store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:          tokio_rusqlite::Connection,
  query_timeout: Option<Duration>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, query_timeout: None };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, query_timeout: None };
    store.init_schema().await?;
    Ok(store)
  }

  /// Bound every subsequent call by `limit`. A call that overruns fails with
  /// [`subs_core::Error::Cancelled`].
  pub fn with_query_timeout(mut self, limit: Duration) -> Self {
    self.query_timeout = Some(limit);
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection thread, honouring the query deadline.
  ///
  /// A call that times out before the connection thread picks it up is
  /// skipped and reported as [`Error::Timeout`]. A call that has already
  /// started runs to completion and its own outcome is returned.
  pub(crate) async fn call<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R>
      + Send
      + 'static,
    R: Send + 'static,
  {
    let Some(limit) = self.query_timeout else {
      return Ok(self.conn.call(f).await?);
    };

    // Whoever sets `claimed` first owns the call.
    let claimed = Arc::new(AtomicBool::new(false));
    let worker_claim = Arc::clone(&claimed);
    let call = self.conn.call(move |conn| {
      if worker_claim.swap(true, Ordering::AcqRel) {
        return Err(tokio_rusqlite::Error::Other(
          "query abandoned after deadline".into(),
        ));
      }
      f(conn)
    });
    tokio::pin!(call);

    match tokio::time::timeout(limit, &mut call).await {
      Ok(outcome) => Ok(outcome?),
      Err(_) if !claimed.swap(true, Ordering::AcqRel) => {
        tracing::debug!(?limit, "query skipped after deadline");
        Err(Error::Timeout(limit))
      }
      Err(_) => Ok(call.await?),
    }
  }

  async fn select_many(
    &self,
    sql: String,
    param: Option<String>,
  ) -> Result<Vec<Subscription>> {
    let raws: Vec<RawSubscription> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt
            .query_map(rusqlite::params![p], RawSubscription::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawSubscription::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubscription::into_subscription).collect()
  }
}

// ─── SubscriptionStore impl ──────────────────────────────────────────────────

impl SubscriptionStore for SqliteStore {
  async fn insert(&self, record: NewSubscription) -> subs_core::Result<()> {
    if record.service_name.is_empty() {
      return Err(subs_core::Error::MissingField("service_name"));
    }
    if record.user_id.is_empty() {
      return Err(subs_core::Error::MissingField("user_id"));
    }

    let start_str = encode_date(record.start_date);
    let end_str   = encode_date(record.end_date);

    let id = self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subs (service_name, price, user_id, start_date, end_date)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            record.service_name,
            record.price,
            record.user_id,
            start_str,
            end_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "inserted subscription");
    Ok(())
  }

  async fn find_by_id(&self, id: i64) -> subs_core::Result<Subscription> {
    subs_core::Error::check_id(id)?;

    let raw: Option<RawSubscription> = self
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM subs WHERE id = ?1"),
            rusqlite::params![id],
            RawSubscription::from_row,
          )
          .optional()?)
      })
      .await?;

    let raw = raw.ok_or(subs_core::Error::NotFound(id))?;
    Ok(raw.into_subscription()?)
  }

  async fn find_all(&self) -> subs_core::Result<Vec<Subscription>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM subs ORDER BY id");
    Ok(self.select_many(sql, None).await?)
  }

  async fn find_by_user<'a>(
    &'a self,
    user_id: &'a str,
  ) -> subs_core::Result<Vec<Subscription>> {
    if user_id.is_empty() {
      return Err(subs_core::Error::InvalidArgument(
        "invalid user ID: empty".to_owned(),
      ));
    }

    let sql =
      format!("SELECT {SELECT_COLUMNS} FROM subs WHERE user_id = ?1 ORDER BY id");
    Ok(self.select_many(sql, Some(user_id.to_owned())).await?)
  }

  async fn sum_price<'a>(
    &'a self,
    filter: &'a PriceFilter,
  ) -> subs_core::Result<PriceTotal> {
    let service_name = filter.service_name.clone();
    let user_id      = filter.user_id.clone();
    let start_str    = encode_date(filter.start_date);
    let end_str      = encode_date(filter.end_date);

    // SUM over zero rows is NULL, which reads back as `None`.
    let sum: Option<i64> = self
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT SUM(price) FROM subs
           WHERE service_name = ?1 AND user_id = ?2
             AND start_date BETWEEN ?3 AND ?4",
          rusqlite::params![service_name, user_id, start_str, end_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(PriceTotal { price: sum.unwrap_or(0) })
  }

  async fn update_by_id(&self, patch: SubscriptionPatch) -> subs_core::Result<()> {
    subs_core::Error::check_id(patch.id)?;

    let id = patch.id;
    let stmt = build_update(&patch).ok_or(subs_core::Error::NoFields(id))?;

    let updated: Option<i64> = self
      .call(move |conn| {
        Ok(conn
          .query_row(
            &stmt.sql,
            rusqlite::params_from_iter(stmt.params),
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    updated.ok_or(subs_core::Error::NotFound(id))?;
    tracing::debug!(id, "updated subscription");
    Ok(())
  }

  async fn delete_by_id(&self, id: i64) -> subs_core::Result<()> {
    subs_core::Error::check_id(id)?;

    let affected = self
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM subs WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if affected == 0 {
      return Err(subs_core::Error::NotFound(id));
    }
    tracing::debug!(id, "deleted subscription");
    Ok(())
  }
}
